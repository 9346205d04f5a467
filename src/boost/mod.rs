//! Multiclass gradient-boosted decision trees.
//!
//! A compact second-order booster with a softmax objective: every round
//! fits one regression tree per class to the gradients and hessians of the
//! cross-entropy loss, using exact greedy split search, L2-regularized leaf
//! weights, shrinkage and seeded per-tree column subsampling.
//!
//! The API follows the linfa algorithm crates: [`BoostParams`] is checked
//! through [`linfa::ParamGuard`], fitting goes through [`linfa::traits::Fit`]
//! and prediction through [`linfa::traits::Predict`].
//!
//! ```rust
//! use linfa::prelude::*;
//! use milkgrade::boost::BoostParams;
//! use ndarray::{array, Array1};
//!
//! let data = Dataset::new(
//!     array![[0.0], [1.0], [10.0], [11.0], [20.0], [21.0]],
//!     array![0usize, 0, 1, 1, 2, 2],
//! );
//! let model = BoostParams::new()
//!     .n_estimators(10)
//!     .min_child_weight(0.0)
//!     .fit(&data)
//!     .unwrap();
//! let pred: Array1<usize> = model.predict(data.records());
//! assert_eq!(pred, array![0, 0, 1, 1, 2, 2]);
//! ```

mod model;
mod params;
mod tree;

pub use model::{FeatureImportance, GradientBoostedTrees};
pub use params::{BoostParams, BoostValidParams};
pub use tree::RegressionTree;
