use std::f64::consts::TAU;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pearlyx::AudioSignal;
use pearlyx::analysis::extract_features;

const SAMPLE_RATE: u32 = 22_050;

/// A vowel-like tone with a slow vibrato so the pitch tracker has work to do.
fn voiced_signal(seconds: f64) -> AudioSignal {
    let len = (seconds * SAMPLE_RATE as f64) as usize;
    let mut phase = 0.0;
    let samples = (0..len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE as f64;
            let f0 = 140.0 + 4.0 * (TAU * 5.0 * t).sin();
            phase += TAU * f0 / SAMPLE_RATE as f64;
            0.5 * phase.sin() + 0.25 * (2.0 * phase).sin() + 0.1 * (3.0 * phase).sin()
        })
        .collect();
    AudioSignal::new(samples, SAMPLE_RATE).expect("valid signal")
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_features");
    group.sample_size(10);
    for seconds in [1.0, 3.0] {
        let signal = voiced_signal(seconds);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{seconds}s")),
            &signal,
            |b, signal| {
                b.iter(|| extract_features(black_box(signal)).expect("extract"));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
