//! Gradient-boosted regression trees.
//!
//! The default learner behind [`XgbAr`](crate::models::xgbar::XgbAr):
//! second-order trees with L2 leaf regularisation, shrinkage, optional row
//! subsampling and cross-validated round selection.

mod booster;
mod tree;

pub use booster::{BoostedEnsemble, GbtConfig, GradientBoostedTrees};
