use bellman_grid::mdp::{
    Discipline, GridWorld, GridWorldConfig, State, ValueIteration, ValueIterationConfig,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn corner_goal_world(size: usize) -> GridWorld {
    GridWorld::new(GridWorldConfig {
        grid_size: size,
        grey_states: vec![],
        terminal_states: vec![State::new(size - 1, size - 1)],
        ..GridWorldConfig::default()
    })
    .unwrap()
}

fn bench_disciplines(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_iteration");
    let config = ValueIterationConfig::default();

    let worlds = [
        ("5x5", GridWorld::new(GridWorldConfig::default()).unwrap()),
        ("10x10", corner_goal_world(10)),
        ("25x25", corner_goal_world(25)),
    ];

    for (name, world) in &worlds {
        for discipline in [Discipline::Standard, Discipline::InPlace] {
            group.bench_with_input(
                BenchmarkId::new(format!("{discipline:?}"), name),
                world,
                |b, world| {
                    b.iter(|| {
                        let mut solver = ValueIteration::new(world, config).unwrap();
                        let convergence = solver.run(black_box(discipline));
                        black_box((convergence.iterations, solver.greedy_policy()))
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_disciplines);
criterion_main!(benches);
