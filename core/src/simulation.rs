//! Simulation orchestrator — one product, one hypothetical price.
//!
//! STEPS (fixed order):
//!   1. Encode the product at the new price and predict units
//!   2. Revenue arithmetic against the historical baseline
//!   3. Churn estimate and market-share adjustment
//!   4. Assemble the result
//!
//! RULES:
//!   - Nothing here mutates the records, vocabulary, or model.
//!   - The model is fit once in `SimContext::build`, never per call.

use crate::{
    churn,
    config::SimConfig,
    dataset::{self, ProductRecord},
    demand_model::DemandModel,
    error::{SimError, SimResult},
    features::encode,
    types::{Price, Units},
    vocabulary::CategoryVocabulary,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub product_name:              String,
    pub category:                  String,
    pub base_price:                Price,
    pub new_price:                 Price,
    pub base_units_sold:           Units,
    pub predicted_units:           Units,
    pub units_delta:               i64,
    // Revenue
    pub original_revenue:          f64,
    pub new_revenue:               f64,
    pub revenue_change:            f64,
    /// Non-finite when the original revenue is zero.
    pub revenue_pct_change:        f64,
    // Churn and share
    pub competitor_price:          Price,
    pub churn_rate:                f64,
    pub original_market_share_pct: f64,
    pub new_market_share_pct:      f64,
    pub market_share_delta:        f64,
}

/// Clamp a raw model output to a whole, non-negative unit count.
pub fn to_unit_count(raw: f64) -> SimResult<Units> {
    if !raw.is_finite() {
        return Err(SimError::NonFinitePrediction { value: raw });
    }
    Ok(raw.floor().max(0.0) as Units)
}

/// Run one what-if simulation.
pub fn simulate(
    product: &ProductRecord,
    new_price: Price,
    model: &DemandModel,
    vocab: &CategoryVocabulary,
    config: &SimConfig,
) -> SimResult<SimulationResult> {
    // 1. Demand
    let features = encode(product, new_price, vocab)?;
    let raw_units = model.predict(&features)?;
    let predicted_units = to_unit_count(raw_units)?;

    // 2. Revenue
    let original_revenue = product.base_revenue();
    let new_revenue = new_price * predicted_units as f64;
    let revenue_change = new_revenue - original_revenue;
    let revenue_pct_change = revenue_change / original_revenue * 100.0;

    // 3. Churn and share
    let estimate = churn::estimate(
        product.base_price,
        new_price,
        product.brand_loyalty,
        product.elasticity,
        config.churn.competitor_price_factor,
    )?;
    let new_market_share_pct =
        churn::adjust_market_share(product.market_share_pct, estimate.churn_rate);

    log::debug!(
        "simulation: '{}' @ {new_price:.2} raw_units={raw_units:.2} units={predicted_units} churn={:.2}% share={:.2}%",
        product.name, estimate.churn_rate, new_market_share_pct,
    );

    // 4. Assemble
    Ok(SimulationResult {
        product_name: product.name.clone(),
        category: product.category.clone(),
        base_price: product.base_price,
        new_price,
        base_units_sold: product.base_units_sold,
        predicted_units,
        units_delta: predicted_units as i64 - product.base_units_sold as i64,
        original_revenue,
        new_revenue,
        revenue_change,
        revenue_pct_change,
        competitor_price: estimate.competitor_price,
        churn_rate: estimate.churn_rate,
        original_market_share_pct: product.market_share_pct,
        new_market_share_pct,
        market_share_delta: new_market_share_pct - product.market_share_pct,
    })
}

/// Read-only simulation context: records, vocabulary and fitted model.
///
/// Built once per dataset load and shared by every simulation call.
#[derive(Debug, Clone)]
pub struct SimContext {
    records: Vec<ProductRecord>,
    vocab:   CategoryVocabulary,
    model:   DemandModel,
    config:  SimConfig,
}

impl SimContext {
    /// Derive the vocabulary and fit the model over `records`.
    pub fn build(records: Vec<ProductRecord>, config: SimConfig) -> SimResult<Self> {
        let vocab = CategoryVocabulary::from_records(&records)?;
        let model = DemandModel::fit(&records, &vocab, &config.model)?;
        log::info!(
            "simulation: context ready ({} products, {} categories)",
            records.len(),
            vocab.len()
        );
        Ok(Self { records, vocab, model, config })
    }

    /// Load a CSV dataset and build the context from it.
    pub fn load(csv_path: &str, config: SimConfig) -> SimResult<Self> {
        let records = dataset::load_products_file(csv_path)?;
        Self::build(records, config)
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn product_names(&self) -> Vec<&str> {
        dataset::unique_names(&self.records)
    }

    pub fn find_product(&self, name: &str) -> SimResult<&ProductRecord> {
        dataset::find_by_name(&self.records, name)
    }

    pub fn vocabulary(&self) -> &CategoryVocabulary {
        &self.vocab
    }

    pub fn model(&self) -> &DemandModel {
        &self.model
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn simulate(&self, product: &ProductRecord, new_price: Price) -> SimResult<SimulationResult> {
        simulate(product, new_price, &self.model, &self.vocab, &self.config)
    }

    pub fn simulate_by_name(&self, name: &str, new_price: Price) -> SimResult<SimulationResult> {
        let product = self.find_product(name)?;
        self.simulate(product, new_price)
    }
}
