//! Criterion benchmarks for riffbox-core DSP primitives
//!
//! Run with: cargo bench -p riffbox-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use riffbox_core::{Biquad, EnvelopeFollower, FilterCoefficients, FixedDelay};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");

    let coeffs = FilterCoefficients::lowpass(SAMPLE_RATE, 1000.0, 0.707);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut biquad = Biquad::new();
                biquad.set_coefficients(coeffs);
                b.iter(|| {
                    for &sample in &input {
                        black_box(biquad.process(black_box(sample)));
                    }
                });
            },
        );
    }

    // Coefficient calculation cost
    group.bench_function("coefficient_calc", |b| {
        b.iter(|| {
            black_box(FilterCoefficients::peaking(
                black_box(SAMPLE_RATE),
                black_box(1200.0),
                black_box(0.7),
                black_box(4.0),
            ))
        });
    });

    group.finish();
}

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("EnvelopeFollower");
    let input = generate_test_signal(512);

    group.bench_function("process_512", |b| {
        let mut follower = EnvelopeFollower::with_times(SAMPLE_RATE, 20.0, 50.0);
        b.iter(|| {
            for &sample in &input {
                black_box(follower.process(black_box(sample)));
            }
        });
    });

    group.finish();
}

fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("FixedDelay");
    let input = generate_test_signal(512);

    group.bench_function("tick_512", |b| {
        let mut line = FixedDelay::from_time(SAMPLE_RATE, 0.04);
        b.iter(|| {
            for &sample in &input {
                black_box(line.tick(black_box(sample)));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_biquad, bench_envelope, bench_delay);
criterion_main!(benches);
