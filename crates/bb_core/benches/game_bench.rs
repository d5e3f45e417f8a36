use bb_core::calibration::{batted_ball_profile, BatchRunner};
use bb_core::engine::GameRng;
use bb_core::models::fixtures::average_team;
use bb_core::models::{BatterAbilities, PitcherAbilities};
use bb_core::{simulate_game, GameOptions};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::SeedableRng;

// ============================================================================
// 1. Single game
// ============================================================================

fn bench_single_game(c: &mut Criterion) {
    let home = average_team("Home", 100);
    let away = average_team("Away", 200);

    let mut group = c.benchmark_group("game");
    group.throughput(Throughput::Elements(1));

    let mut seed = 0u64;
    group.bench_function("single", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(simulate_game(&home, &away, &GameOptions::seeded(seed)).unwrap())
        })
    });

    group.bench_function("single_with_logs", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(simulate_game(&home, &away, &GameOptions::seeded(seed).with_logs()).unwrap())
        })
    });

    group.finish();
}

// ============================================================================
// 2. Parallel batch
// ============================================================================

fn bench_batch(c: &mut Criterion) {
    let home = average_team("Home", 100);
    let away = average_team("Away", 200);
    let runner = BatchRunner::default();

    let mut group = c.benchmark_group("batch");
    group.throughput(Throughput::Elements(100));
    group.sample_size(20);
    group.bench_function("100_games", |b| b.iter(|| black_box(runner.run(&home, &away, 100, 42).unwrap())));
    group.finish();
}

// ============================================================================
// 3. Batted ball generation
// ============================================================================

fn bench_batted_balls(c: &mut Criterion) {
    let batter = BatterAbilities::default();
    let pitcher = PitcherAbilities::default();

    let mut group = c.benchmark_group("batted_ball");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("profile_10k", |b| {
        let mut rng = GameRng::seed_from_u64(0xdead_beef);
        b.iter(|| black_box(batted_ball_profile(&batter, &pitcher, 10_000, &mut rng)))
    });
    group.finish();
}

criterion_group!(benches, bench_single_game, bench_batch, bench_batted_balls);
criterion_main!(benches);
