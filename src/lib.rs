//! # milkgrade 🥛
//!
//! Grade milk quality (low / medium / high) from seven measurements with a
//! gradient-boosted tree classifier.
//!
//! The crate has two halves that only meet through a file on disk:
//!
//! - **Training** ([`train`]): read the milk-quality CSV, label-encode the
//!   grade, split 80/20 with a fixed seed, fit the booster, score held-out
//!   accuracy and rank feature importances. The result is one [`Artifact`]
//!   persisted as MessagePack.
//! - **Prediction** ([`predict`], [`dashboard`]): load the artifact once per
//!   process through [`ArtifactCache`], turn the dashboard controls into a
//!   feature row in the artifact's own feature order, predict and decode the
//!   grade.
//!
//! ## Features
//! - Softmax gradient boosting with linfa-style `Fit` / `Predict` ([`boost`])
//! - Label encoding that round-trips through the artifact
//! - Model persistence with `rmp-serde` (MessagePack)
//! - An axum dashboard with a feature-importance chart
//! - Benchmarkable with [Criterion](https://crates.io/crates/criterion)
//!
//! ## Example
//! ```rust,no_run
//! use milkgrade::{ArtifactCache, MilkInput, Predictor};
//!
//! let cache = ArtifactCache::new("milk_model.msgpack");
//! let predictor = Predictor::new(cache.get()?);
//! let prediction = predictor.predict(&MilkInput::default())?;
//! println!("Grade: {} ({})", prediction.grade, prediction.color());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod artifact;
pub mod boost;
pub mod dashboard;
pub mod encoder;
pub mod error;
pub mod logging;
pub mod predict;
pub mod record;
pub mod train;

pub use artifact::{Artifact, ArtifactCache, Metrics};
pub use encoder::LabelEncoder;
pub use predict::{MilkInput, Prediction, Predictor, grade_color};
pub use record::{FEATURE_NAMES, MilkSample};
pub use train::{TrainConfig, train_test_split};
