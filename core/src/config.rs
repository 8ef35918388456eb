use crate::error::{SimError, SimResult};
use crate::types::Price;
use serde::{Deserialize, Serialize};

// ── Churn estimator ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnConfig {
    /// Synthetic competitor price as a fraction of the product's base price.
    pub competitor_price_factor: f64,
}

// ── Demand model ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Rows required beyond the feature count for a well-posed fit.
    pub min_rows_margin: usize,
    /// Reject fits below the row threshold instead of only warning.
    #[serde(default)]
    pub strict_row_check: bool,
    /// Singular values below this fraction of the largest are treated as zero.
    pub svd_epsilon: f64,
}

// ── Presentation shell ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRangeConfig {
    pub min: Price,
    pub max: Price,
    pub step: Price,
}

impl PriceRangeConfig {
    /// Reject prices the operator is not allowed to pick.
    pub fn validate(&self, price: Price) -> SimResult<Price> {
        if !price.is_finite() || price < self.min || price > self.max {
            return Err(SimError::PriceOutOfRange {
                price,
                min: self.min,
                max: self.max,
            });
        }
        Ok(price)
    }

    /// Snap a price onto the step grid, anchored at `min`.
    pub fn snap(&self, price: Price) -> Price {
        if self.step <= 0.0 {
            return price;
        }
        let steps = ((price - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub company_label: String,
    pub competitor_label: String,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub churn: ChurnConfig,
    pub model: ModelConfig,
    pub price_range: PriceRangeConfig,
    pub report: ReportConfig,
}

impl SimConfig {
    /// Load from a JSON file.
    /// In tests, use SimConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        if config.churn.competitor_price_factor <= 0.0 {
            anyhow::bail!(
                "{path}: churn.competitor_price_factor must be > 0, got {}",
                config.churn.competitor_price_factor
            );
        }
        if config.price_range.min > config.price_range.max {
            anyhow::bail!(
                "{path}: price_range.min ({}) exceeds price_range.max ({})",
                config.price_range.min,
                config.price_range.max
            );
        }

        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::default()
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            churn: ChurnConfig {
                competitor_price_factor: 0.9,
            },
            model: ModelConfig {
                min_rows_margin: 5,
                strict_row_check: false,
                svd_epsilon: 1e-10,
            },
            price_range: PriceRangeConfig {
                min: 20.0,
                max: 400.0,
                step: 0.5,
            },
            report: ReportConfig {
                company_label: "HUL".into(),
                competitor_label: "Competitors".into(),
                currency_symbol: "₹".into(),
            },
        }
    }
}
