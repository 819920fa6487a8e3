use criterion::{Criterion, criterion_group, criterion_main};
use gridbench_core::{OccupancyGrid, Point, Terrain};
use gridbench_paths::{Algorithm, Corners, GridMoves, SearchSpace};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::hint::black_box;

const SIZE: i32 = 256;

fn scattered_map() -> OccupancyGrid {
    let mut rng = StdRng::seed_from_u64(42);
    OccupancyGrid::from_fn(SIZE, SIZE, |_| {
        if rng.random_range(0..100) < 20 {
            Terrain::Tree
        } else {
            Terrain::Ground
        }
    })
}

fn queries(grid: &OccupancyGrid) -> Vec<(Point, Point)> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut out = Vec::new();
    while out.len() < 64 {
        let from = Point::new(rng.random_range(0..SIZE), rng.random_range(0..SIZE));
        let to = Point::new(rng.random_range(0..SIZE), rng.random_range(0..SIZE));
        if grid.is_passable(from) && grid.is_passable(to) {
            out.push((from, to));
        }
    }
    out
}

fn bench_variants(c: &mut Criterion) {
    let grid = scattered_map();
    let queries = queries(&grid);
    let moves = GridMoves::new(&grid, Corners::Forbid);
    let mut space = SearchSpace::for_grid(&grid);

    for algorithm in Algorithm::ALL {
        c.bench_function(&format!("{algorithm} 256x256 scattered"), |b| {
            b.iter(|| {
                for &(from, to) in &queries {
                    black_box(space.search(&moves, algorithm, from, to, None).ok());
                }
            })
        });
    }
}

criterion_group!(benches, bench_variants);
criterion_main!(benches);
