//! Churn / market-share estimator — competitive price-gap model.
//!
//! This module:
//!   1. Synthesizes a competitor price from the product's base price
//!   2. Measures the fractional gap between the new price and that competitor
//!   3. Scales the gap by loyalty damping and elasticity amplification
//!   4. Converts the churn rate into a market-share loss
//!
//! Pricing below the competitor never gains share here; churn is clamped at 0.

use crate::{
    error::{SimError, SimResult},
    types::Price,
};
use serde::{Deserialize, Serialize};

/// Component breakdown of one churn estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnEstimate {
    pub competitor_price:     Price,
    pub price_gap:            f64,
    pub loyalty_damping:      f64,
    pub elasticity_amplifier: f64,
    /// Unclamped churn, negative when priced under the competitor.
    pub raw_churn:            f64,
    pub churn_rate:           f64,
}

/// Competitor assumed to sit at a fixed fraction of our base price.
pub fn competitor_price(base_price: Price, competitor_price_factor: f64) -> Price {
    base_price * competitor_price_factor
}

/// Full churn estimate with its components.
pub fn estimate(
    base_price: Price,
    new_price: Price,
    brand_loyalty: f64,
    elasticity: f64,
    competitor_price_factor: f64,
) -> SimResult<ChurnEstimate> {
    let competitor_price = competitor_price(base_price, competitor_price_factor);
    if competitor_price == 0.0 {
        return Err(SimError::DivisionByZero { what: "competitor price" });
    }

    let price_gap = (new_price - competitor_price) / competitor_price;
    let loyalty_damping = 1.0 - brand_loyalty;
    let elasticity_amplifier = 1.0 + elasticity.abs();

    let raw_churn = price_gap * 100.0 * loyalty_damping * elasticity_amplifier;
    let churn_rate = raw_churn.max(0.0);

    Ok(ChurnEstimate {
        competitor_price,
        price_gap,
        loyalty_damping,
        elasticity_amplifier,
        raw_churn,
        churn_rate,
    })
}

/// Churn rate (percent of current share lost) for a move to `new_price`.
pub fn estimate_churn(
    base_price: Price,
    new_price: Price,
    brand_loyalty: f64,
    elasticity: f64,
    competitor_price_factor: f64,
) -> SimResult<f64> {
    estimate(base_price, new_price, brand_loyalty, elasticity, competitor_price_factor)
        .map(|e| e.churn_rate)
}

/// Share remaining after losing `churn_rate` percent of it. Never negative.
pub fn adjust_market_share(market_share_pct: f64, churn_rate: f64) -> f64 {
    (market_share_pct - churn_rate * market_share_pct / 100.0).max(0.0)
}
