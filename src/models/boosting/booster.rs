//! Gradient-boosted tree regressor with round selection.
//!
//! Squared-error boosting: every round fits a second-order tree to the
//! current gradients (`prediction - target`, unit hessians) and adds it,
//! shrunk by the learning rate, to the ensemble. The number of rounds is
//! chosen by k-fold cross-validation, by a trailing validation block, or
//! fixed up front.

use crate::error::{ForecastError, Result};
use crate::features::DesignMatrix;
use crate::models::boosting::tree::{RegressionTree, TrainingView, TreeParams};
use crate::models::traits::{FittedModel, ModelAdapter, RoundsSelection};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Booster hyper-parameters.
#[derive(Debug, Clone)]
pub struct GbtConfig {
    /// Shrinkage applied to every tree (eta).
    pub learning_rate: f64,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Minimum hessian mass per child.
    pub min_child_weight: f64,
    /// L2 penalty on leaf weights.
    pub reg_lambda: f64,
    /// Minimum gain required to split.
    pub gamma: f64,
    /// Row subsampling ratio per round, in (0, 1].
    pub subsample: f64,
    /// Seed for subsampling and fold assignment.
    pub seed: u64,
}

impl Default for GbtConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.3,
            max_depth: 6,
            min_child_weight: 1.0,
            reg_lambda: 1.0,
            gamma: 0.0,
            subsample: 1.0,
            seed: 42,
        }
    }
}

impl GbtConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_subsample(mut self, subsample: f64) -> Self {
        self.subsample = subsample;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ForecastError::InvalidConfiguration(
                "learning_rate must be positive".to_string(),
            ));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(ForecastError::InvalidConfiguration(
                "subsample must be in (0, 1]".to_string(),
            ));
        }
        if self.reg_lambda < 0.0 || self.gamma < 0.0 || self.min_child_weight < 0.0 {
            return Err(ForecastError::InvalidConfiguration(
                "regularisation parameters must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_child_weight: self.min_child_weight,
            reg_lambda: self.reg_lambda,
            gamma: self.gamma,
        }
    }
}

/// Model adapter training gradient-boosted regression trees.
#[derive(Debug, Clone, Default)]
pub struct GradientBoostedTrees {
    config: GbtConfig,
}

impl GradientBoostedTrees {
    pub fn new(config: GbtConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GbtConfig {
        &self.config
    }
}

/// A fitted boosted ensemble.
#[derive(Debug, Clone)]
pub struct BoostedEnsemble {
    base_score: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
    importance: Vec<f64>,
}

impl BoostedEnsemble {
    /// Number of boosting rounds kept.
    pub fn n_rounds(&self) -> usize {
        self.trees.len()
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    fn raw_predict(&self, sample: &[f64]) -> f64 {
        self.base_score + self.trees.iter().map(|t| t.predict(sample)).sum::<f64>()
    }
}

impl FittedModel for BoostedEnsemble {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            return Err(ForecastError::Prediction(format!(
                "expected {} features, got {}",
                self.n_features,
                features.len()
            )));
        }
        if features.iter().any(|v| v.is_nan()) {
            return Err(ForecastError::Prediction(
                "feature row contains NaN".to_string(),
            ));
        }
        Ok(self.raw_predict(features))
    }

    fn feature_importance(&self) -> Option<Vec<f64>> {
        Some(self.importance.clone())
    }
}

impl ModelAdapter for GradientBoostedTrees {
    type Fitted = BoostedEnsemble;

    fn fit(
        &self,
        matrix: &DesignMatrix,
        target: &[f64],
        rounds: &RoundsSelection,
    ) -> Result<BoostedEnsemble> {
        self.config.validate()?;
        rounds.validate()?;
        validate_training_data(matrix, target)?;

        let n = matrix.n_rows();
        let all_rows: Vec<usize> = (0..n).collect();

        let n_rounds = match *rounds {
            RoundsSelection::Manual { rounds } => rounds,
            RoundsSelection::Validation {
                fraction,
                max_rounds,
            } => {
                let n_valid = ((n as f64 * fraction).round() as usize).clamp(1, n.max(2) - 1);
                if n < 2 {
                    max_rounds
                } else {
                    let (train, valid) = all_rows.split_at(n - n_valid);
                    let curve = self.boost(matrix, target, train, valid, max_rounds)?.1;
                    best_round(&curve)
                }
            }
            RoundsSelection::CrossValidation { folds, max_rounds } => {
                self.cross_validate(matrix, target, folds, max_rounds)?
            }
        };

        let (ensemble, _) = self.boost(matrix, target, &all_rows, &[], n_rounds)?;
        debug!(
            rows = n,
            features = matrix.n_cols(),
            rounds = n_rounds,
            "trained boosted ensemble"
        );
        Ok(ensemble)
    }
}

impl GradientBoostedTrees {
    /// Mean held-out RMSE per round over shuffled folds; returns the best round.
    fn cross_validate(
        &self,
        matrix: &DesignMatrix,
        target: &[f64],
        folds: usize,
        max_rounds: usize,
    ) -> Result<usize> {
        let n = matrix.n_rows();
        let folds = folds.min(n);
        if folds < 2 {
            debug!(rows = n, "too few rows for cross-validation, using max rounds");
            return Ok(max_rounds);
        }

        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        order.shuffle(&mut rng);

        let mut totals = vec![0.0; max_rounds];
        for fold in 0..folds {
            let (valid, train): (Vec<(usize, usize)>, Vec<(usize, usize)>) = order
                .iter()
                .copied()
                .enumerate()
                .partition(|(pos, _)| pos % folds == fold);
            let valid: Vec<usize> = valid.into_iter().map(|(_, row)| row).collect();
            let train: Vec<usize> = train.into_iter().map(|(_, row)| row).collect();
            let (_, curve) = self.boost(matrix, target, &train, &valid, max_rounds)?;
            for (total, rmse) in totals.iter_mut().zip(curve.iter()) {
                *total += rmse / folds as f64;
            }
        }

        let best = best_round(&totals);
        debug!(folds, best_round = best, "cross-validated boosting rounds");
        Ok(best)
    }

    /// Train on `train` rows for `n_rounds`, recording the RMSE on `valid`
    /// after every round (empty when `valid` is empty).
    fn boost(
        &self,
        matrix: &DesignMatrix,
        target: &[f64],
        train: &[usize],
        valid: &[usize],
        n_rounds: usize,
    ) -> Result<(BoostedEnsemble, Vec<f64>)> {
        if train.is_empty() {
            return Err(ForecastError::Training("no training rows".to_string()));
        }
        let n = matrix.n_rows();
        let n_features = matrix.n_cols();
        let params = self.config.tree_params();
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let base_score = train.iter().map(|&r| target[r]).sum::<f64>() / train.len() as f64;
        let mut pred = vec![base_score; n];
        let mut grad = vec![0.0; n];
        let hess = vec![1.0; n];

        let mut trees = Vec::with_capacity(n_rounds);
        let mut curve = Vec::with_capacity(if valid.is_empty() { 0 } else { n_rounds });
        let sample_size = ((train.len() as f64 * self.config.subsample).round() as usize).max(1);

        for _ in 0..n_rounds {
            for &r in train {
                grad[r] = pred[r] - target[r];
            }

            let rows: Vec<usize> = if sample_size < train.len() {
                train
                    .choose_multiple(&mut rng, sample_size)
                    .copied()
                    .collect()
            } else {
                train.to_vec()
            };

            let view = TrainingView {
                data: matrix.as_slice(),
                n_features,
                grad: &grad,
                hess: &hess,
            };
            let mut tree = RegressionTree::fit(&view, &rows, &params);
            tree.scale(self.config.learning_rate);

            for &r in train.iter().chain(valid.iter()) {
                pred[r] += tree.predict(matrix.row(r));
            }
            trees.push(tree);

            if !valid.is_empty() {
                let mse = valid
                    .iter()
                    .map(|&r| (target[r] - pred[r]).powi(2))
                    .sum::<f64>()
                    / valid.len() as f64;
                curve.push(mse.sqrt());
            }
        }

        let mut importance = vec![0.0; n_features];
        for tree in &trees {
            tree.accumulate_gain(&mut importance);
        }
        let total: f64 = importance.iter().sum();
        if total > 0.0 {
            importance.iter_mut().for_each(|v| *v /= total);
        }

        Ok((
            BoostedEnsemble {
                base_score,
                trees,
                n_features,
                importance,
            },
            curve,
        ))
    }
}

/// Round count (1-based) with the lowest validation error.
fn best_round(curve: &[f64]) -> usize {
    curve
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i + 1)
        .unwrap_or(1)
}

fn validate_training_data(matrix: &DesignMatrix, target: &[f64]) -> Result<()> {
    if matrix.is_empty() || matrix.n_cols() == 0 {
        return Err(ForecastError::Training("empty design matrix".to_string()));
    }
    if target.len() != matrix.n_rows() {
        return Err(ForecastError::Training(format!(
            "target has {} values for {} rows",
            target.len(),
            matrix.n_rows()
        )));
    }
    if target.iter().chain(matrix.as_slice()).any(|v| !v.is_finite()) {
        return Err(ForecastError::Training(
            "training data contains non-finite values".to_string(),
        ));
    }
    Ok(())
}
