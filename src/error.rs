use std::path::PathBuf;

/// Errors from configuring, fitting or querying the boosted classifier.
#[derive(Debug, thiserror::Error)]
pub enum BoostError {
    #[error("n_estimators must be at least 1, got {0}")]
    InvalidEstimatorCount(usize),

    #[error("max_depth must be at least 1, got {0}")]
    InvalidMaxDepth(usize),

    #[error("learning_rate must be in (0, 1], got {0}")]
    InvalidLearningRate(f64),

    #[error("colsample_bytree must be in (0, 1], got {0}")]
    InvalidColumnSample(f64),

    #[error("lambda must be non-negative, got {0}")]
    InvalidLambda(f64),

    #[error("min_child_weight must be non-negative, got {0}")]
    InvalidMinChildWeight(f64),

    /// The training dataset has no rows or no feature columns.
    #[error("training dataset is empty")]
    EmptyDataset,

    #[error("training targets contain {0} distinct class(es), need at least 2")]
    TooFewClasses(usize),

    #[error("dataset has {records} rows but {targets} targets")]
    TargetCountMismatch { records: usize, targets: usize },

    #[error("non-finite value at row {row}, feature {feature}")]
    NonFiniteValue { row: usize, feature: usize },

    /// Returned when a prediction row has the wrong width.
    #[error("prediction input has {got} features, expected {expected}")]
    FeatureCountMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Linfa(#[from] linfa::error::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("label {0:?} was not seen when the encoder was fitted")]
    UnknownLabel(String),

    #[error("class index {index} is out of range for {n_classes} classes")]
    IndexOutOfRange { index: usize, n_classes: usize },
}

/// Errors from persisting or loading the model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to write artifact to {path}")]
    WriteArtifact {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode artifact")]
    EncodeArtifact(#[from] rmp_serde::encode::Error),

    #[error("failed to read artifact from {path}")]
    ReadArtifact {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode artifact from {path}")]
    DecodeArtifact {
        path: PathBuf,
        source: rmp_serde::decode::Error,
    },

    #[error("incompatible artifact in {path}: expected format {expected}, found {found}")]
    IncompatibleArtifact {
        path: PathBuf,
        expected: u32,
        found: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// The artifact lists a feature the input form does not provide.
    #[error("artifact expects unknown feature {0:?}")]
    UnknownFeature(String),

    #[error(transparent)]
    Boost(#[from] BoostError),

    #[error(transparent)]
    Encoder(#[from] EncoderError),
}

#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("failed to open dataset {path}")]
    OpenDataset {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("invalid row {row} in {path}")]
    InvalidRow {
        path: PathBuf,
        row: usize,
        source: csv::Error,
    },

    #[error("dataset {0} contains no rows")]
    NoRows(PathBuf),

    #[error("test_ratio must be in (0, 1), got {0}")]
    InvalidTestRatio(f64),

    #[error("split left the {0} partition empty")]
    EmptyPartition(&'static str),

    #[error(transparent)]
    Boost(#[from] BoostError),

    #[error(transparent)]
    Encoder(#[from] EncoderError),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Linfa(#[from] linfa::error::Error),
}
