//! Linear demand model — ordinary least squares over the product history.
//!
//! The model is fit once per dataset load and is read-only afterwards.
//! Intercept handling: X and y are centred, the centred system is solved by
//! SVD, and the bias is recovered as `mean(y) - mean(X)·w`. A rank-deficient
//! design yields the minimum-norm solution.

use crate::{
    config::ModelConfig,
    dataset::ProductRecord,
    error::{SimError, SimResult},
    features::{encode, feature_names, FeatureVector},
    vocabulary::CategoryVocabulary,
};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DemandModel {
    feature_names: Vec<String>,
    weights:       Vec<f64>,
    bias:          f64,
    rows_fit:      usize,
}

impl DemandModel {
    /// Fit against every record's own base price and units sold.
    pub fn fit(
        records: &[ProductRecord],
        vocab: &CategoryVocabulary,
        config: &ModelConfig,
    ) -> SimResult<Self> {
        if records.is_empty() {
            return Err(SimError::EmptyDataset);
        }

        let names = feature_names(vocab);
        let n_rows = records.len();
        let n_cols = names.len();

        let required = n_cols + config.min_rows_margin;
        if n_rows < required {
            if config.strict_row_check {
                return Err(SimError::UnderdeterminedFit { rows: n_rows, required });
            }
            log::warn!(
                "demand_model: only {n_rows} rows for {n_cols} features (want {required}); fit may be unstable"
            );
        }

        let encoded = records
            .iter()
            .map(|r| encode(r, r.base_price, vocab))
            .collect::<SimResult<Vec<_>>>()?;

        let x = DMatrix::from_fn(n_rows, n_cols, |i, j| encoded[i].values[j]);
        let y = DVector::from_iterator(n_rows, records.iter().map(|r| r.base_units_sold as f64));

        let x_means: Vec<f64> = (0..n_cols).map(|j| x.column(j).mean()).collect();
        let y_mean = y.mean();

        let x_centred = DMatrix::from_fn(n_rows, n_cols, |i, j| x[(i, j)] - x_means[j]);
        let y_centred = y.map(|v| v - y_mean);

        let svd = x_centred.svd(true, true);
        let tolerance = config.svd_epsilon * svd.singular_values.max();
        let rank = svd.rank(tolerance);
        if rank < n_cols {
            log::warn!("demand_model: design matrix rank {rank} < {n_cols} features; using minimum-norm solution");
        }

        let w = svd
            .solve(&y_centred, tolerance)
            .map_err(|e| SimError::Solve(e.to_string()))?;

        let weights: Vec<f64> = w.iter().copied().collect();
        let bias = y_mean - weights.iter().zip(&x_means).map(|(w, m)| w * m).sum::<f64>();

        log::info!("demand_model: fit {n_rows} rows, {n_cols} features, bias={bias:.3}");
        for (name, weight) in names.iter().zip(&weights) {
            log::debug!("demand_model: w[{name}] = {weight:.6}");
        }

        Ok(Self {
            feature_names: names,
            weights,
            bias,
            rows_fit: n_rows,
        })
    }

    /// `bias + w · x`. Unclamped: may be negative or fractional.
    pub fn predict(&self, features: &FeatureVector) -> SimResult<f64> {
        if features.names != self.feature_names {
            return Err(SimError::FeatureMismatch {
                expected: self.feature_names.clone(),
                actual:   features.names.clone(),
            });
        }

        let dot: f64 = self
            .weights
            .iter()
            .zip(&features.values)
            .map(|(w, x)| w * x)
            .sum();
        Ok(self.bias + dot)
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Weight for a named feature, if the model has that column.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.weights[i])
    }

    pub fn rows_fit(&self) -> usize {
        self.rows_fit
    }
}
