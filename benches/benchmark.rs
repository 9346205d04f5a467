use criterion::{Criterion, criterion_group, criterion_main};
use linfa::prelude::*;
use milkgrade::boost::{BoostParams, GradientBoostedTrees};
use milkgrade::{FEATURE_NAMES, MilkInput, Predictor, artifact::Artifact};
use ndarray::{Array1, Array2};
use std::path::Path;
use std::sync::Arc;

/// Synthetic rows shaped like the milk dataset.
fn synthetic(n: usize) -> (Array2<f64>, Array1<usize>) {
    let mut rows = Vec::with_capacity(n * FEATURE_NAMES.len());
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % 3;
        let ph = 3.0 + (i % 66) as f64 * 0.1;
        let temp = 34.0 + (i % 57) as f64;
        rows.extend([
            ph,
            temp,
            (i % 2) as f64,
            (class != 0) as u8 as f64,
            ((i / 2) % 2) as f64,
            (class == 0) as u8 as f64,
            240.0 + (i % 16) as f64,
        ]);
        labels.push(class);
    }
    (
        Array2::from_shape_vec((n, FEATURE_NAMES.len()), rows).unwrap(),
        Array1::from_vec(labels),
    )
}

fn bench_fit(c: &mut Criterion) {
    let (x, y) = synthetic(1000);
    let data = Dataset::new(x, y);

    c.bench_function("fit 100 rounds on 1k rows", |b| {
        b.iter(|| {
            let _: GradientBoostedTrees = BoostParams::new().fit(&data).unwrap();
        })
    });
}

fn bench_predict_single(c: &mut Criterion) {
    let artifact = Artifact::load(Path::new("milk_model.msgpack")).unwrap();
    let predictor = Predictor::new(Arc::new(artifact));
    let input = MilkInput::default();

    c.bench_function("predict default input", |b| {
        b.iter(|| {
            let _ = predictor.predict(&input);
        })
    });
}

fn bench_bulk_prediction(c: &mut Criterion) {
    let artifact = Artifact::load(Path::new("milk_model.msgpack")).unwrap();
    let (x, _) = synthetic(10_000);

    c.bench_function("bulk predict 10k rows", |b| {
        b.iter(|| {
            let _: Array1<usize> = artifact.model.predict(&x);
        });
    });
}

criterion_group!(
    benches,
    bench_fit,
    bench_predict_single,
    bench_bulk_prediction
);
criterion_main!(benches);
