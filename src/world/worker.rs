//! Async mesh generation worker
//!
//! Chunk snapshots are handed off to a tokio-driven worker that runs mesh
//! generation on blocking tasks, capped at a configured concurrency. Queued
//! jobs are served closest-first; completed buffers come back over a channel
//! and are polled without blocking the owning tick.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::mesh::{MeshData, MeshStrategy};
use crate::voxel::{ChunkCoord, ChunkData};

/// One queued mesh generation
pub struct MeshJob {
    pub coord: ChunkCoord,
    /// Chunk revision at enqueue time, echoed back in the result
    pub revision: u64,
    /// Higher = served first
    pub priority: f32,
    /// Snapshot of the chunk's voxels; the worker owns it exclusively
    pub data: ChunkData,
    pub voxel_size: f32,
}

/// Outcome of one mesh generation, delivered on the owner's thread
#[derive(Debug)]
pub enum MeshResult {
    /// Buffers built and validated
    Built {
        coord: ChunkCoord,
        revision: u64,
        mesh: MeshData,
    },
    /// Generation produced inconsistent buffers or the task failed
    Failed {
        coord: ChunkCoord,
        revision: u64,
        error: String,
    },
}

impl MeshResult {
    pub fn coord(&self) -> ChunkCoord {
        match self {
            MeshResult::Built { coord, .. } | MeshResult::Failed { coord, .. } => *coord,
        }
    }
}

/// Concurrency-limited mesh generation worker
pub struct MeshWorker {
    request_tx: mpsc::UnboundedSender<MeshJob>,
    result_rx: mpsc::UnboundedReceiver<MeshResult>,
    /// Chunks with a job queued or running
    pending: HashSet<ChunkCoord>,
    #[allow(dead_code)]
    runtime: Option<Runtime>,
}

impl MeshWorker {
    /// Create a worker on a dedicated runtime
    pub fn new(strategy: Arc<dyn MeshStrategy>, max_concurrent: usize) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<MeshJob>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<MeshResult>();

        let runtime = Runtime::new().expect("failed to create tokio runtime");
        runtime.spawn(async move {
            Self::worker_loop(strategy, max_concurrent, &mut request_rx, result_tx).await;
        });

        Self {
            request_tx,
            result_rx,
            pending: HashSet::new(),
            runtime: Some(runtime),
        }
    }

    /// Create a worker on the caller's tokio runtime
    ///
    /// Panics outside a runtime context.
    pub fn new_with_current_runtime(strategy: Arc<dyn MeshStrategy>, max_concurrent: usize) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<MeshJob>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<MeshResult>();

        tokio::spawn(async move {
            Self::worker_loop(strategy, max_concurrent, &mut request_rx, result_tx).await;
        });

        Self {
            request_tx,
            result_rx,
            pending: HashSet::new(),
            runtime: None,
        }
    }

    async fn worker_loop(
        strategy: Arc<dyn MeshStrategy>,
        max_concurrent: usize,
        request_rx: &mut mpsc::UnboundedReceiver<MeshJob>,
        result_tx: mpsc::UnboundedSender<MeshResult>,
    ) {
        use tokio::task::JoinSet;

        let mut active_tasks = JoinSet::new();
        let mut queued: Vec<MeshJob> = Vec::new();

        loop {
            tokio::select! {
                Some(job) = request_rx.recv() => {
                    queued.push(job);
                }

                Some(joined) = active_tasks.join_next(), if !active_tasks.is_empty() => {
                    match joined {
                        Ok(result) => {
                            let _ = result_tx.send(result);
                        }
                        Err(e) => {
                            log::error!("mesh worker task panicked: {e}");
                        }
                    }
                }

                else => {
                    if queued.is_empty() && active_tasks.is_empty() {
                        break;
                    }
                }
            }

            while active_tasks.len() < max_concurrent && !queued.is_empty() {
                queued.sort_by(|a, b| b.priority.total_cmp(&a.priority));
                let job = queued.remove(0);
                let strategy = Arc::clone(&strategy);
                active_tasks.spawn_blocking(move || Self::run_job(&*strategy, job));
            }
        }
    }

    fn run_job(strategy: &dyn MeshStrategy, job: MeshJob) -> MeshResult {
        let mesh = strategy.build(&job.data, job.voxel_size);
        // Corrupt buffers never reach the sink; the owner logs and retries
        match mesh.validate() {
            Ok(()) => MeshResult::Built {
                coord: job.coord,
                revision: job.revision,
                mesh,
            },
            Err(e) => MeshResult::Failed {
                coord: job.coord,
                revision: job.revision,
                error: e.to_string(),
            },
        }
    }

    /// Queue a mesh job; returns false if one is already pending for the
    /// chunk
    pub fn request(&mut self, job: MeshJob) -> bool {
        if self.pending.contains(&job.coord) {
            return false;
        }
        self.pending.insert(job.coord);
        self.request_tx.send(job).expect("mesh worker stopped");
        true
    }

    /// Drain completed results without blocking
    pub fn poll_results(&mut self) -> Vec<MeshResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            self.pending.remove(&result.coord());
            results.push(result);
        }
        results
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(&coord)
    }

    /// Best-effort cancel: a job already running still delivers its result,
    /// which the owner must treat as stale
    pub fn cancel(&mut self, coord: ChunkCoord) {
        self.pending.remove(&coord);
    }
}
