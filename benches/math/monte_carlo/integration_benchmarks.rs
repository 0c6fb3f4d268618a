use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use montecarlo::math::monte_carlo::{
    estimate_integral, estimate_integral_with, HeightStrategy, MonteCarloConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn quarter_disc(x: f64) -> f64 {
    (1.0 - x * x).sqrt()
}

fn bench_sample_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo_integration");
    for &n in &[1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("sparse", n), &n, |b, &n| {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            b.iter(|| estimate_integral(quarter_disc, 0.0, 1.0, black_box(n), false, &mut rng))
        });
        group.bench_with_input(BenchmarkId::new("dense", n), &n, |b, &n| {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            b.iter(|| estimate_integral(quarter_disc, 0.0, 1.0, black_box(n), true, &mut rng))
        });
    }
    group.finish();
}

fn bench_height_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("height_strategy");
    for (name, height) in [
        ("endpoints", HeightStrategy::Endpoints),
        ("scan_256", HeightStrategy::Scan { points: 256 }),
    ] {
        let config = MonteCarloConfig {
            sample_count: 10_000,
            height,
            ..MonteCarloConfig::default()
        };
        group.bench_function(name, |b| {
            let mut rng = ChaCha20Rng::seed_from_u64(7);
            b.iter(|| estimate_integral_with(f64::sin, 0.0, std::f64::consts::PI, &config, &mut rng))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sample_counts, bench_height_strategies);
criterion_main!(benches);
