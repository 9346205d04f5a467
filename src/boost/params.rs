use linfa::ParamGuard;
use serde::{Deserialize, Serialize};

use crate::error::BoostError;

/// Checked hyperparameters for [`GradientBoostedTrees`](super::GradientBoostedTrees).
///
/// # Defaults
///
/// | Parameter          | Default |
/// |--------------------|---------|
/// | `n_estimators`     | 100     |
/// | `max_depth`        | 5       |
/// | `learning_rate`    | 0.1     |
/// | `colsample_bytree` | 0.5     |
/// | `lambda`           | 1.0     |
/// | `min_child_weight` | 1.0     |
/// | `seed`             | 42      |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostValidParams {
    n_estimators: usize,
    max_depth: usize,
    learning_rate: f64,
    colsample_bytree: f64,
    lambda: f64,
    min_child_weight: f64,
    seed: u64,
}

impl BoostValidParams {
    /// Number of boosting rounds. Each round grows one tree per class.
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Maximum tree depth; the root is depth 0.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Shrinkage applied to every leaf weight.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Fraction of feature columns sampled for each tree.
    pub fn colsample_bytree(&self) -> f64 {
        self.colsample_bytree
    }

    /// L2 regularization on leaf weights.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Minimum hessian sum required in each child of a split.
    pub fn min_child_weight(&self) -> f64 {
        self.min_child_weight
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of columns drawn per tree for `n_features` total columns.
    pub(crate) fn sampled_columns(&self, n_features: usize) -> usize {
        ((self.colsample_bytree * n_features as f64).floor() as usize).clamp(1, n_features.max(1))
    }
}

/// Unchecked hyperparameters. Call `fit` (through [`linfa::traits::Fit`]) or
/// [`ParamGuard::check`] to validate them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostParams(BoostValidParams);

impl Default for BoostParams {
    fn default() -> Self {
        Self::new()
    }
}

impl BoostParams {
    pub fn new() -> Self {
        BoostParams(BoostValidParams {
            n_estimators: 100,
            max_depth: 5,
            learning_rate: 0.1,
            colsample_bytree: 0.5,
            lambda: 1.0,
            min_child_weight: 1.0,
            seed: 42,
        })
    }

    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.0.n_estimators = n_estimators;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.0.learning_rate = learning_rate;
        self
    }

    pub fn colsample_bytree(mut self, colsample_bytree: f64) -> Self {
        self.0.colsample_bytree = colsample_bytree;
        self
    }

    pub fn lambda(mut self, lambda: f64) -> Self {
        self.0.lambda = lambda;
        self
    }

    pub fn min_child_weight(mut self, min_child_weight: f64) -> Self {
        self.0.min_child_weight = min_child_weight;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl ParamGuard for BoostParams {
    type Checked = BoostValidParams;
    type Error = BoostError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        let p = &self.0;
        if p.n_estimators == 0 {
            return Err(BoostError::InvalidEstimatorCount(p.n_estimators));
        }
        if p.max_depth == 0 {
            return Err(BoostError::InvalidMaxDepth(p.max_depth));
        }
        if !(p.learning_rate > 0.0 && p.learning_rate <= 1.0) {
            return Err(BoostError::InvalidLearningRate(p.learning_rate));
        }
        if !(p.colsample_bytree > 0.0 && p.colsample_bytree <= 1.0) {
            return Err(BoostError::InvalidColumnSample(p.colsample_bytree));
        }
        if !(p.lambda >= 0.0) {
            return Err(BoostError::InvalidLambda(p.lambda));
        }
        if !(p.min_child_weight >= 0.0) {
            return Err(BoostError::InvalidMinChildWeight(p.min_child_weight));
        }
        Ok(p)
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let p = BoostParams::default().check().unwrap();
        assert_eq!(p.n_estimators(), 100);
        assert_eq!(p.max_depth(), 5);
        assert_eq!(p.learning_rate(), 0.1);
        assert_eq!(p.colsample_bytree(), 0.5);
        assert_eq!(p.seed(), 42);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            BoostParams::new().n_estimators(0).check(),
            Err(BoostError::InvalidEstimatorCount(0))
        ));
        assert!(matches!(
            BoostParams::new().max_depth(0).check(),
            Err(BoostError::InvalidMaxDepth(0))
        ));
        assert!(BoostParams::new().learning_rate(0.0).check().is_err());
        assert!(BoostParams::new().learning_rate(f64::NAN).check().is_err());
        assert!(BoostParams::new().colsample_bytree(1.5).check().is_err());
        assert!(BoostParams::new().lambda(-1.0).check().is_err());
        assert!(BoostParams::new().min_child_weight(-0.1).check().is_err());
    }

    #[test]
    fn half_of_seven_columns_is_three() {
        let p = BoostParams::new().check().unwrap();
        assert_eq!(p.sampled_columns(7), 3);
        assert_eq!(p.sampled_columns(1), 1);
    }
}
