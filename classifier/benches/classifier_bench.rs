use criterion::{Criterion, black_box, criterion_group, criterion_main};
use moodkit_classifier::{
    AveragedConfig, SequenceConfig, extract_averaged_features, extract_sequence_features,
};

fn make_sine(freq_hz: f64, n_samples: usize, sample_rate: usize) -> Vec<f32> {
    (0..n_samples)
        .map(|i| {
            (2.0 * std::f64::consts::PI * freq_hz * i as f64 / sample_rate as f64).sin() as f32
        })
        .collect()
}

fn bench_sequence_1s(c: &mut Criterion) {
    let cfg = SequenceConfig::default();
    let signal = make_sine(440.0, 22050, 22050);

    c.bench_function("sequence_features_1s", |b| {
        b.iter(|| {
            let _ = black_box(extract_sequence_features(black_box(&signal), &cfg));
        });
    });
}

fn bench_sequence_5s(c: &mut Criterion) {
    let cfg = SequenceConfig::default();
    let signal = make_sine(440.0, 5 * 22050, 22050);

    c.bench_function("sequence_features_5s", |b| {
        b.iter(|| {
            let _ = black_box(extract_sequence_features(black_box(&signal), &cfg));
        });
    });
}

fn bench_averaged_1s(c: &mut Criterion) {
    let cfg = AveragedConfig::default();
    let signal = make_sine(440.0, 22050, 22050);

    c.bench_function("averaged_features_1s", |b| {
        b.iter(|| {
            let _ = black_box(extract_averaged_features(black_box(&signal), &cfg));
        });
    });
}

criterion_group!(benches, bench_sequence_1s, bench_sequence_5s, bench_averaged_1s);
criterion_main!(benches);
