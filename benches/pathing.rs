use criterion::{
    Criterion,
    criterion_group,
    criterion_main
};
use maze_voxels::cells::Coordinate;
use maze_voxels::generators;
use maze_voxels::maze::Maze;
use maze_voxels::pathing;
use maze_voxels::randomness::seeded_rng;
use maze_voxels::units::{Height, Width};

fn large_maze() -> Maze {
    generators::generate(Width(350), Height(350), &mut seeded_rng(350)).unwrap()
}

fn bench_solve_from_entrance(c: &mut Criterion) {
    c.bench_function("solve_from_entrance", |b| {
        let m = large_maze();
        b.iter(|| pathing::solve_from_entrance(&m))
    });
}

fn bench_solve_from_middle(c: &mut Criterion) {
    c.bench_function("solve_from_middle", |b| {
        let m = large_maze();
        let start_coord = Coordinate::new(175, 175);
        b.iter(|| pathing::solve_from(&m, start_coord))
    });
}

fn bench_distances(c: &mut Criterion) {
    c.bench_function("distances", |b| {
        let m = large_maze();
        let start_coord = Coordinate::new(250, 250);
        b.iter(|| pathing::Distances::for_maze(&m, start_coord))
    });
}

fn bench_furthest_points(c: &mut Criterion) {
    c.bench_function("furthest_points", |b| {
        let m = large_maze();
        let distances = pathing::Distances::for_maze(&m, Coordinate::new(250, 250)).unwrap();
        b.iter(|| distances.furthest_points())
    });
}

criterion_group!(benches,
                 bench_solve_from_entrance,
                 bench_solve_from_middle,
                 bench_distances,
                 bench_furthest_points);
criterion_main!(benches);
