use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use milkgrade::boost::BoostParams;
use milkgrade::error::{ArtifactError, TrainError};
use milkgrade::{Artifact, ArtifactCache, FEATURE_NAMES, MilkInput, Predictor, TrainConfig, train};
use tempfile::TempDir;

/// Writes a CSV in the dataset's own header spelling. Spoiled milk is hot,
/// acidic or off-smelling; the rest splits on fat and colour.
fn write_dataset(dir: &Path) -> std::path::PathBuf {
    let mut csv = String::from("pH,Temprature,Taste,Odor,Fat ,Turbidity,Colour,Grade\n");
    for i in 0..150 {
        let (ph, temp, odor, fat, colour, grade) = match i % 3 {
            0 => (6.6 + (i % 3) as f64 * 0.1, 35 + i % 6, 1, 1, 254 + i % 2, "high"),
            1 => (4.5 + (i % 5) as f64 * 0.2, 60 + i % 30, 0, 0, 240 + i % 8, "low"),
            _ => (6.7 + (i % 2) as f64 * 0.1, 38 + i % 8, 1, 0, 248 + i % 4, "medium"),
        };
        writeln!(
            csv,
            "{ph},{temp},{},{odor},{fat},{},{colour},{grade}",
            i % 2,
            (i / 3) % 2
        )
        .unwrap();
    }
    let path = dir.join("milk_quality_data.csv");
    std::fs::write(&path, csv).unwrap();
    path
}

fn config(data_path: std::path::PathBuf) -> TrainConfig {
    TrainConfig {
        data_path,
        params: BoostParams::new().n_estimators(30),
        ..TrainConfig::default()
    }
}

#[test]
fn train_save_load_predict() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(dir.path());
    let artifact = train::train(&config(data)).unwrap();

    assert_eq!(artifact.features, FEATURE_NAMES.to_vec());
    assert_eq!(artifact.encoder.classes(), ["high", "low", "medium"]);
    assert_eq!(artifact.metrics.n_test, 30);
    assert_eq!(artifact.metrics.n_train, 120);
    assert!(artifact.metrics.accuracy > 0.8, "{}", artifact.metrics.accuracy);

    let importances: Vec<f64> = artifact.importances.iter().map(|f| f.importance).collect();
    assert!(importances.windows(2).all(|w| w[0] >= w[1]));
    assert!(importances.iter().all(|&v| v >= 0.0));

    let path = dir.path().join("milk_model.msgpack");
    artifact.save(&path).unwrap();

    let cache = ArtifactCache::new(&path);
    let predictor = Predictor::new(cache.get().unwrap());
    assert_eq!(*predictor.artifact(), artifact);

    let high = MilkInput {
        ph: 6.6,
        temperature: 36.0,
        taste: "Good (1)".into(),
        odor: "Good (1)".into(),
        fat: "Optimal (1)".into(),
        turbidity: "Low (0)".into(),
        colour: 254.0,
    };
    let prediction = predictor.predict(&high).unwrap();
    assert_eq!(prediction.row, vec![6.6, 36.0, 1.0, 1.0, 1.0, 0.0, 254.0]);
    assert!(["HIGH", "MEDIUM", "LOW"].contains(&prediction.grade.as_str()));
    assert_eq!(predictor.predict(&high).unwrap(), prediction);
}

#[test]
fn training_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(dir.path());
    let a = train::train(&config(data.clone())).unwrap();
    let b = train::train(&config(data)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn missing_dataset_aborts_training() {
    let err = train::train(&config("/nonexistent/milk.csv".into())).unwrap_err();
    assert!(matches!(err, TrainError::OpenDataset { .. }));
}

#[test]
fn missing_artifact_fails_predictor_startup() {
    let cache = ArtifactCache::new("/nonexistent/milk_model.msgpack");
    let err = cache.get().map(Predictor::new).unwrap_err();
    assert!(matches!(err, ArtifactError::ReadArtifact { .. }));

    let err = Artifact::load(Path::new("/nonexistent/milk_model.msgpack")).unwrap_err();
    assert!(err.to_string().contains("milk_model.msgpack"));
}

#[test]
fn shared_artifact_is_read_only_across_predictors() {
    let dir = TempDir::new().unwrap();
    let data = write_dataset(dir.path());
    let artifact = Arc::new(train::train(&config(data)).unwrap());
    let a = Predictor::new(Arc::clone(&artifact));
    let b = Predictor::new(Arc::clone(&artifact));
    let input = MilkInput::default();
    assert_eq!(a.predict(&input).unwrap(), b.predict(&input).unwrap());
}
