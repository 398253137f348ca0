//! Performance counters for the streaming controller
//!
//! Explicitly constructed and owned by the world; feeds the memory budget
//! decisions and surfaces timing numbers for logs.

/// Number of recent generation timings retained for the rolling average
const SAMPLE_WINDOW: usize = 64;

/// Timing and memory counters
#[derive(Default)]
pub struct PerfMonitor {
    samples_ms: Vec<f32>,
    next_sample: usize,
    /// Meshes generated and applied since construction
    pub meshes_applied: u64,
    /// Results dropped because the chunk was evicted or re-enqueued first
    pub stale_results: u64,
    /// Mesh generations that returned a failure
    pub failed_generations: u64,
    /// Chunks removed by the memory budget
    pub chunks_evicted: u64,
    /// Latest resident-memory estimate in bytes
    pub estimated_memory_bytes: usize,
    /// Highest resident-memory estimate observed
    pub peak_memory_bytes: usize,
    /// Vertices across all currently applied meshes is not tracked; these
    /// are lifetime totals for throughput logging
    pub total_vertices: u64,
    pub total_triangles: u64,
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed mesh generation
    pub fn record_generation(&mut self, duration_ms: f32, vertices: usize, triangles: usize) {
        if self.samples_ms.len() < SAMPLE_WINDOW {
            self.samples_ms.push(duration_ms);
        } else {
            self.samples_ms[self.next_sample] = duration_ms;
            self.next_sample = (self.next_sample + 1) % SAMPLE_WINDOW;
        }
        self.meshes_applied += 1;
        self.total_vertices += vertices as u64;
        self.total_triangles += triangles as u64;
    }

    /// Rolling average generation time in milliseconds
    pub fn average_generation_ms(&self) -> f32 {
        if self.samples_ms.is_empty() {
            return 0.0;
        }
        self.samples_ms.iter().sum::<f32>() / self.samples_ms.len() as f32
    }

    /// Record the latest memory estimate
    pub fn record_memory(&mut self, bytes: usize) {
        self.estimated_memory_bytes = bytes;
        self.peak_memory_bytes = self.peak_memory_bytes.max(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_no_samples_is_zero() {
        assert_eq!(PerfMonitor::new().average_generation_ms(), 0.0);
    }

    #[test]
    fn test_rolling_average() {
        let mut stats = PerfMonitor::new();
        stats.record_generation(2.0, 40, 20);
        stats.record_generation(4.0, 60, 30);
        assert!((stats.average_generation_ms() - 3.0).abs() < 1e-6);
        assert_eq!(stats.meshes_applied, 2);
    }

    #[test]
    fn test_window_wraps() {
        let mut stats = PerfMonitor::new();
        for _ in 0..SAMPLE_WINDOW {
            stats.record_generation(10.0, 8, 4);
        }
        // Overwrites the oldest samples instead of growing
        for _ in 0..SAMPLE_WINDOW {
            stats.record_generation(2.0, 8, 4);
        }
        assert_eq!(stats.samples_ms.len(), SAMPLE_WINDOW);
        assert!((stats.average_generation_ms() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_peak_memory_tracks_maximum() {
        let mut stats = PerfMonitor::new();
        stats.record_memory(100);
        stats.record_memory(500);
        stats.record_memory(200);
        assert_eq!(stats.estimated_memory_bytes, 200);
        assert_eq!(stats.peak_memory_bytes, 500);
    }
}
