use linfa::dataset::DatasetBase;
use linfa::traits::{Fit, PredictInplace};
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::params::BoostValidParams;
use super::tree::RegressionTree;
use crate::error::BoostError;

/// A fitted multiclass gradient-boosted tree ensemble (softmax objective).
///
/// `rounds[r][k]` is the tree grown for class `k` in boosting round `r`.
/// Immutable once fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    n_features: usize,
    n_classes: usize,
    rounds: Vec<Vec<RegressionTree>>,
}

/// A feature paired with its normalized importance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub importance: f64,
}

impl GradientBoostedTrees {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Summed raw scores of every class for one row.
    pub fn predict_margins(&self, row: ArrayView1<'_, f64>) -> Vec<f64> {
        let mut margins = vec![0.0; self.n_classes];
        for round in &self.rounds {
            for (class, tree) in round.iter().enumerate() {
                margins[class] += tree.predict_row(row);
            }
        }
        margins
    }

    /// Predicts the class index of a single row.
    pub fn predict_row(&self, row: &[f64]) -> Result<usize, BoostError> {
        if row.len() != self.n_features {
            return Err(BoostError::FeatureCountMismatch {
                expected: self.n_features,
                got: row.len(),
            });
        }
        Ok(argmax(&self.predict_margins(ArrayView1::from(row))))
    }

    /// Average split gain per feature across all trees, normalized to sum
    /// to 1. Features never used in a split score 0.
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_features];
        let mut counts = vec![0usize; self.n_features];
        for tree in self.rounds.iter().flatten() {
            tree.accumulate_gain(&mut totals, &mut counts);
        }

        let mut averages: Vec<f64> = totals
            .iter()
            .zip(&counts)
            .map(|(&t, &c)| if c > 0 { t / c as f64 } else { 0.0 })
            .collect();
        let sum: f64 = averages.iter().sum();
        if sum > 0.0 {
            averages.iter_mut().for_each(|v| *v /= sum);
        }
        averages
    }

    /// Importances paired with `names` and sorted descending. Ties keep the
    /// order of `names`.
    pub fn ranked_importances(&self, names: &[String]) -> Vec<FeatureImportance> {
        let mut ranked: Vec<FeatureImportance> = names
            .iter()
            .zip(self.feature_importances())
            .map(|(name, importance)| FeatureImportance {
                name: name.clone(),
                importance,
            })
            .collect();
        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        ranked
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

fn softmax_into(margins: ArrayView1<'_, f64>, mut out: ArrayViewMut1<'_, f64>) {
    let max = margins.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    out.assign(&margins.mapv(|m| (m - max).exp()));
    let sum = out.sum();
    out.mapv_inplace(|o| o / sum);
}

fn validate(x: &Array2<f64>, y: &Array1<usize>) -> Result<usize, BoostError> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(BoostError::EmptyDataset);
    }
    if x.nrows() != y.len() {
        return Err(BoostError::TargetCountMismatch {
            records: x.nrows(),
            targets: y.len(),
        });
    }
    for ((row, feature), v) in x.indexed_iter() {
        if !v.is_finite() {
            return Err(BoostError::NonFiniteValue { row, feature });
        }
    }

    let n_classes = y.iter().max().map_or(0, |m| m + 1);
    let mut seen = vec![false; n_classes];
    y.iter().for_each(|&c| seen[c] = true);
    let distinct = seen.iter().filter(|&&s| s).count();
    if distinct < 2 {
        return Err(BoostError::TooFewClasses(distinct));
    }
    Ok(n_classes)
}

impl Fit<Array2<f64>, Array1<usize>, BoostError> for BoostValidParams {
    type Object = GradientBoostedTrees;

    #[instrument(skip_all, fields(n_rows = dataset.records().nrows()))]
    fn fit(
        &self,
        dataset: &DatasetBase<Array2<f64>, Array1<usize>>,
    ) -> Result<Self::Object, BoostError> {
        let x = dataset.records();
        let y = dataset.targets();
        let n_classes = validate(x, y)?;
        let (n_rows, n_features) = x.dim();
        let n_sampled = self.sampled_columns(n_features);

        let mut rng = StdRng::seed_from_u64(self.seed());
        let mut margins = Array2::<f64>::zeros((n_rows, n_classes));
        let mut proba = Array2::<f64>::zeros((n_rows, n_classes));
        let mut grad = vec![0.0; n_rows];
        let mut hess = vec![0.0; n_rows];
        let mut columns: Vec<usize> = (0..n_features).collect();
        let mut rounds = Vec::with_capacity(self.n_estimators());

        for round in 0..self.n_estimators() {
            for (m, p) in margins.rows().into_iter().zip(proba.rows_mut()) {
                softmax_into(m, p);
            }

            let mut trees = Vec::with_capacity(n_classes);
            for class in 0..n_classes {
                for i in 0..n_rows {
                    let p = proba[[i, class]];
                    let target = if y[i] == class { 1.0 } else { 0.0 };
                    grad[i] = p - target;
                    hess[i] = (2.0 * p * (1.0 - p)).max(1e-16);
                }

                columns.shuffle(&mut rng);
                let mut sampled = columns[..n_sampled].to_vec();
                sampled.sort_unstable();

                let tree = RegressionTree::grow(x.view(), &grad, &hess, &sampled, self);
                for (i, row) in x.rows().into_iter().enumerate() {
                    margins[[i, class]] += tree.predict_row(row);
                }
                trees.push(tree);
            }
            rounds.push(trees);

            if (round + 1) % 25 == 0 {
                debug!(round = round + 1, "boosting progress");
            }
        }

        debug!(n_classes, n_features, "booster fitted");
        Ok(GradientBoostedTrees {
            n_features,
            n_classes,
            rounds,
        })
    }
}

impl PredictInplace<Array2<f64>, Array1<usize>> for GradientBoostedTrees {
    fn predict_inplace(&self, x: &Array2<f64>, y: &mut Array1<usize>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.n_features,
            "The number of features must match the fitted model."
        );
        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = argmax(&self.predict_margins(row));
        }
    }

    fn default_target(&self, x: &Array2<f64>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}
