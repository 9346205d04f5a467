use linfa::prelude::*;
use ndarray::{Array1, Array2, Ix1};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::artifact::{Artifact, FORMAT_VERSION, Metrics};
use crate::boost::BoostParams;
use crate::encoder::LabelEncoder;
use crate::error::TrainError;
use crate::record::{FEATURE_NAMES, MilkSample, load_samples};

/// Inputs to a training run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub data_path: PathBuf,
    pub test_ratio: f64,
    pub seed: u64,
    pub params: BoostParams,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            data_path: PathBuf::from("milk_quality_data.csv"),
            test_ratio: 0.2,
            seed: 42,
            params: BoostParams::new()
                .n_estimators(100)
                .max_depth(5)
                .learning_rate(0.1)
                .colsample_bytree(0.5)
                .seed(42),
        }
    }
}

/// A helper type for holding train/test splits.
#[derive(Debug)]
pub struct DatasetSplit {
    pub train: Vec<MilkSample>,
    pub test: Vec<MilkSample>,
}

/// Shuffles `data` with a seeded RNG and moves the first
/// `ceil(len * test_ratio)` samples into the test partition.
pub fn train_test_split(
    data: &[MilkSample],
    test_ratio: f64,
    seed: u64,
) -> Result<DatasetSplit, TrainError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(TrainError::InvalidTestRatio(test_ratio));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = data.to_vec();
    data.shuffle(&mut rng);

    let test_size = ((data.len() as f64) * test_ratio).ceil() as usize;
    let train = data.split_off(test_size);
    let test = data;
    if train.is_empty() {
        return Err(TrainError::EmptyPartition("train"));
    }
    if test.is_empty() {
        return Err(TrainError::EmptyPartition("test"));
    }
    Ok(DatasetSplit { train, test })
}

/// Builds a linfa dataset with features in [`FEATURE_NAMES`] order and
/// encoded grades as targets.
pub fn to_dataset(
    samples: &[MilkSample],
    encoder: &LabelEncoder,
) -> Result<Dataset<f64, usize, Ix1>, TrainError> {
    let records: Vec<f64> = samples.iter().flat_map(|s| s.features()).collect();
    let targets = samples
        .iter()
        .map(|s| encoder.transform(&s.grade))
        .collect::<Result<Array1<usize>, _>>()?;
    let records = Array2::from_shape_vec((samples.len(), FEATURE_NAMES.len()), records)?;
    Ok(Dataset::new(records, targets).with_feature_names(FEATURE_NAMES.to_vec()))
}

/// Runs the full pipeline: load, encode, split, fit, evaluate, rank.
#[instrument(skip(config), fields(data = %config.data_path.display()))]
pub fn train(config: &TrainConfig) -> Result<Artifact, TrainError> {
    let samples = load_samples(&config.data_path)?;
    info!(rows = samples.len(), "dataset loaded");

    let encoder = LabelEncoder::fit(samples.iter().map(|s| s.grade.as_str()));
    info!(classes = ?encoder.classes(), "grades encoded");

    let split = train_test_split(&samples, config.test_ratio, config.seed)?;
    let train_set = to_dataset(&split.train, &encoder)?;
    let test_set = to_dataset(&split.test, &encoder)?;

    info!(
        n_train = split.train.len(),
        n_test = split.test.len(),
        "Training milk quality model..."
    );
    let model = config.params.fit(&train_set).map_err(TrainError::Boost)?;

    let predicted: Array1<usize> = model.predict(test_set.records());
    let cm = predicted.confusion_matrix(test_set.targets().view())?;
    debug!("confusion matrix:\n{cm:?}");
    let accuracy = f64::from(cm.accuracy());
    info!("Accuracy Score: {accuracy:.4}");

    let features: Vec<String> = FEATURE_NAMES.iter().map(|f| f.to_string()).collect();
    let importances = model.ranked_importances(&features);
    for fi in &importances {
        debug!(feature = %fi.name, importance = fi.importance, "feature importance");
    }

    Ok(Artifact {
        format_version: FORMAT_VERSION,
        model,
        encoder,
        features,
        metrics: Metrics {
            accuracy,
            n_train: split.train.len(),
            n_test: split.test.len(),
        },
        importances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ph: f64, grade: &str) -> MilkSample {
        MilkSample {
            ph,
            temperature: 40.0,
            taste: 1.0,
            odor: 1.0,
            fat: 1.0,
            turbidity: 0.0,
            colour: 254.0,
            grade: grade.to_string(),
        }
    }

    fn samples(n: usize) -> Vec<MilkSample> {
        (0..n)
            .map(|i| sample(3.0 + i as f64 * 0.01, ["low", "medium", "high"][i % 3]))
            .collect()
    }

    #[test]
    fn split_sizes_follow_ratio() {
        let data = samples(100);
        let split = train_test_split(&data, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);
    }

    #[test]
    fn fractional_test_size_rounds_up() {
        let data = samples(101);
        let split = train_test_split(&data, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 21);
        assert_eq!(split.train.len(), 80);
    }

    #[test]
    fn split_is_reproducible_for_a_seed() {
        let data = samples(50);
        let a = train_test_split(&data, 0.2, 7).unwrap();
        let b = train_test_split(&data, 0.2, 7).unwrap();
        assert_eq!(a.test, b.test);
        assert_eq!(a.train, b.train);
    }

    #[test]
    fn split_rejects_bad_ratio_and_tiny_data() {
        assert!(matches!(
            train_test_split(&samples(10), 1.0, 42),
            Err(TrainError::InvalidTestRatio(_))
        ));
        assert!(matches!(
            train_test_split(&samples(1), 0.2, 42),
            Err(TrainError::EmptyPartition("train"))
        ));
    }

    #[test]
    fn dataset_keeps_feature_order() {
        let data = vec![sample(6.6, "high"), sample(9.0, "low")];
        let encoder = LabelEncoder::fit(["high", "low"]);
        let ds = to_dataset(&data, &encoder).unwrap();
        assert_eq!(ds.records().row(0).to_vec(), data[0].features().to_vec());
        assert_eq!(ds.targets().to_vec(), vec![0, 1]);
    }

    #[test]
    fn single_target_dataset_fits_the_booster() {
        let data = samples(30);
        let encoder = LabelEncoder::fit(data.iter().map(|s| s.grade.as_str()));
        let ds = to_dataset(&data, &encoder).unwrap();
        let model = BoostParams::new()
            .n_estimators(5)
            .min_child_weight(0.0)
            .fit(&ds)
            .unwrap();
        let predicted: Array1<usize> = model.predict(ds.records());
        assert_eq!(predicted.len(), 30);
        let cm = predicted.confusion_matrix(ds.targets().view()).unwrap();
        assert!(cm.accuracy() > 0.0);
    }

    #[test]
    fn unseen_grade_fails_encoding() {
        let encoder = LabelEncoder::fit(["high"]);
        let err = to_dataset(&[sample(6.6, "low")], &encoder).unwrap_err();
        assert!(matches!(err, TrainError::Encoder(_)));
    }
}
