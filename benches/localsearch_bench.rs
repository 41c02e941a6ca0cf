//! Criterion benchmarks for u-localsearch.
//!
//! Uses synthetic timetabling instances to measure delta evaluation
//! against full recomputation, a single runner, and the token ring.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_localsearch::hc::{HillClimbing, HillClimbingConfig, HillClimbingPolicy};
use u_localsearch::neighborhood::NeighborhoodExplorer;
use u_localsearch::random::create_rng;
use u_localsearch::runner::Runner;
use u_localsearch::solver::{Solver, TokenRingConfig, TokenRingSolver};
use u_localsearch::state::StateManager;
use u_localsearch::tabu::{TabuSearch, TabuSearchConfig, TabuSearchPolicy};
use u_localsearch::timetabling::{
    Course, Faculty, FacultyBuilder, MoveTime, RoomNeighborhoodExplorer,
    TimeNeighborhoodExplorer, TtStateManager,
};

// ===========================================================================
// Synthetic instance: five days of four periods, curricula of four courses
// ===========================================================================

fn synthetic_faculty(courses: usize) -> Faculty {
    let mut builder = FacultyBuilder::new(format!("synthetic-{courses}"))
        .week(5, 4)
        .room("S", 30)
        .room("M", 60)
        .room("L", 120)
        .room("XL", 250);
    for c in 0..courses {
        builder = builder.course(Course::new(
            format!("C{c}"),
            format!("T{}", c % (courses / 2).max(1)),
            2 + c % 3,
            2,
            20 + (c as u32 * 37) % 200,
        ));
    }
    for (g, chunk) in (0..courses).collect::<Vec<_>>().chunks(4).enumerate() {
        let names: Vec<String> = chunk.iter().map(|c| format!("C{c}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        builder = builder.curriculum(format!("G{g}"), format!("Group {g}"), &refs);
    }
    builder
        .build()
        .unwrap_or_else(|e| panic!("synthetic instance: {e}"))
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_delta_vs_full(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_move_evaluation");

    for &n in &[10usize, 30, 60] {
        let f = synthetic_faculty(n);
        let sm = TtStateManager::new(&f);
        let ne = TimeNeighborhoodExplorer::new(&f);
        let mut rng = create_rng(42);
        let mut st = sm.empty_state();
        sm.random_state(&mut st, &mut rng);
        let moves: Vec<MoveTime> = (0..64)
            .filter_map(|_| ne.random_move(&st, &mut rng))
            .collect();

        group.bench_with_input(BenchmarkId::new("delta", n), &moves, |b, moves| {
            b.iter(|| {
                moves
                    .iter()
                    .map(|mv| ne.delta_cost_function(black_box(&st), mv))
                    .sum::<f64>()
            })
        });
        group.bench_with_input(BenchmarkId::new("full", n), &moves, |b, moves| {
            b.iter(|| {
                moves
                    .iter()
                    .map(|mv| {
                        let mut next = st.clone();
                        ne.make_move(&mut next, mv);
                        sm.cost_function(black_box(&next))
                    })
                    .sum::<f64>()
            })
        });
    }
    group.finish();
}

fn bench_hill_climbing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hill_climbing_time");
    group.sample_size(10);

    for &n in &[10usize, 30, 60] {
        let f = synthetic_faculty(n);
        let sm = TtStateManager::new(&f);
        let ne = TimeNeighborhoodExplorer::new(&f);
        let mut st = sm.empty_state();
        sm.random_state(&mut st, &mut create_rng(7));
        group.bench_with_input(BenchmarkId::from_parameter(n), &st, |b, st| {
            b.iter(|| {
                let mut hc = HillClimbing::new(
                    "HC",
                    &sm,
                    &ne,
                    HillClimbingPolicy::new(
                        HillClimbingConfig::default().with_max_idle_iteration(500),
                    ),
                )
                .with_max_iteration(5000)
                .with_cost_check(false);
                hc.set_current_state(st.clone());
                hc.go(&mut create_rng(7)).unwrap_or_else(|e| panic!("{e}"));
                black_box(hc.best_state_cost())
            })
        });
    }
    group.finish();
}

fn bench_token_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("token_ring_solve");
    group.sample_size(10);

    for &n in &[10usize, 30] {
        let f = synthetic_faculty(n);
        let sm = TtStateManager::new(&f);
        let time = TimeNeighborhoodExplorer::new(&f);
        let room = RoomNeighborhoodExplorer::new(&f);
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| {
                let hc = HillClimbingPolicy::new(
                    HillClimbingConfig::default().with_max_idle_iteration(300),
                );
                let ts = TabuSearchPolicy::<MoveTime>::new(
                    TabuSearchConfig::default()
                        .with_tenure(5, 10)
                        .with_max_idle_iteration(50),
                );
                let mut solver =
                    TokenRingSolver::new(&sm, TokenRingConfig::default().with_max_idle_rounds(2))
                        .with_runner(Box::new(
                            HillClimbing::new("HC time", &sm, &time, hc.clone())
                                .with_cost_check(false),
                        ))
                        .with_runner(Box::new(
                            HillClimbing::new("HC room", &sm, &room, hc).with_cost_check(false),
                        ))
                        .with_runner(Box::new(
                            TabuSearch::new("TS time", &sm, &time, ts)
                                .with_max_iteration(500)
                                .with_cost_check(false),
                        ));
                solver
                    .solve(&mut create_rng(42))
                    .unwrap_or_else(|e| panic!("{e}"));
                black_box(solver.internal_state_cost())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_delta_vs_full, bench_hill_climbing, bench_token_ring);
criterion_main!(benches);
