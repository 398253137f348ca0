//! Prints naive vs greedy meshing statistics for a generated chunk

use voxterra::core::logging;
use voxterra::mesh::{GreedyMesher, MeshStrategy, NaiveMesher};
use voxterra::terrain::{HeightmapTerrain, TerrainParams, TerrainSource};
use voxterra::voxel::{CHUNK_SIZE, ChunkCoord, ChunkData, ChunkSize, VOXEL_SIZE};

fn main() {
    logging::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(12345);

    let terrain = HeightmapTerrain::new(TerrainParams {
        seed,
        ..TerrainParams::default()
    });
    let coord = ChunkCoord::new(0, 0, 0);
    let mut chunk = ChunkData::new(coord, ChunkSize::cubic(CHUNK_SIZE as i32));
    terrain.fill(coord, &mut chunk);

    log::info!(
        "chunk {}^3, seed {}, {} solid voxels",
        CHUNK_SIZE,
        seed,
        chunk.solid_count()
    );

    for strategy in [&NaiveMesher as &dyn MeshStrategy, &GreedyMesher] {
        let mesh = strategy.build(&chunk, VOXEL_SIZE);
        log::info!(
            "{:>6}: {} vertices, {} triangles, {} sections, {:.2} ms",
            strategy.name(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.sections.len(),
            mesh.generation_time_ms
        );
    }
}
