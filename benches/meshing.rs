use criterion::{Criterion, black_box, criterion_group, criterion_main};

use voxterra::mesh::assembly::build_mesh;
use voxterra::mesh::{GreedyMesher, MeshStrategy, NaiveMesher, generate_quads};
use voxterra::terrain::{HeightmapTerrain, TerrainParams, TerrainSource};
use voxterra::voxel::{ChunkCoord, ChunkData, ChunkSize, VOXEL_SIZE, Voxel, VoxelMaterial};

fn solid_chunk(size: i32) -> ChunkData {
    let mut chunk = ChunkData::new(ChunkCoord::new(0, 0, 0), ChunkSize::cubic(size));
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                chunk.set(x, y, z, Voxel::new(VoxelMaterial::Stone));
            }
        }
    }
    chunk
}

fn terrain_chunk(size: i32) -> ChunkData {
    let terrain = HeightmapTerrain::new(TerrainParams::default());
    let coord = ChunkCoord::new(0, 0, 0);
    let mut chunk = ChunkData::new(coord, ChunkSize::cubic(size));
    terrain.fill(coord, &mut chunk);
    chunk
}

fn bench_greedy_solid_32(c: &mut Criterion) {
    let chunk = solid_chunk(32);
    c.bench_function("greedy_solid_32", |b| {
        b.iter(|| generate_quads(black_box(&chunk)));
    });
}

fn bench_greedy_terrain_32(c: &mut Criterion) {
    let chunk = terrain_chunk(32);
    c.bench_function("greedy_terrain_32", |b| {
        b.iter(|| generate_quads(black_box(&chunk)));
    });
}

fn bench_naive_vs_greedy_full_build(c: &mut Criterion) {
    let chunk = terrain_chunk(32);

    c.bench_function("full_build_naive_32", |b| {
        b.iter(|| NaiveMesher.build(black_box(&chunk), VOXEL_SIZE));
    });
    c.bench_function("full_build_greedy_32", |b| {
        b.iter(|| GreedyMesher.build(black_box(&chunk), VOXEL_SIZE));
    });
}

fn bench_assembly(c: &mut Criterion) {
    let chunk = terrain_chunk(32);
    let quads = generate_quads(&chunk);

    c.bench_function("assembly_terrain_32", |b| {
        b.iter(|| build_mesh(black_box(&quads), VOXEL_SIZE));
    });
}

criterion_group!(
    benches,
    bench_greedy_solid_32,
    bench_greedy_terrain_32,
    bench_naive_vs_greedy_full_build,
    bench_assembly
);
criterion_main!(benches);
