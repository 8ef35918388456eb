//! Feature encoding for the demand model.

use crate::dataset::ProductRecord;
use crate::error::SimResult;
use crate::types::Price;
use crate::vocabulary::CategoryVocabulary;
use serde::Serialize;

/// Numeric feature names, in column order, ahead of the category indicators.
pub const NUMERIC_FEATURES: [&str; 4] = [
    "Base Price",
    "Brand Loyalty",
    "Market Share (%)",
    "Elasticity",
];

/// Ordered feature values for one product at one price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub names:  Vec<String>,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }
}

/// Full column list for a vocabulary: numeric features then indicators.
pub fn feature_names(vocab: &CategoryVocabulary) -> Vec<String> {
    NUMERIC_FEATURES
        .iter()
        .map(|s| s.to_string())
        .chain(vocab.indicator_names())
        .collect()
}

/// Encode `product` as if it were priced at `price`.
///
/// The price slot takes `price`, not `product.base_price`; everything else
/// is copied from the record.
pub fn encode(
    product: &ProductRecord,
    price: Price,
    vocab: &CategoryVocabulary,
) -> SimResult<FeatureVector> {
    let mut values = Vec::with_capacity(NUMERIC_FEATURES.len() + vocab.indicator_count());
    values.extend_from_slice(&[
        price,
        product.brand_loyalty,
        product.market_share_pct,
        product.elasticity,
    ]);

    let mut indicators = vec![0.0; vocab.indicator_count()];
    if let Some(slot) = vocab.indicator_index(&product.category)? {
        indicators[slot] = 1.0;
    }
    values.extend(indicators);

    Ok(FeatureVector {
        names: feature_names(vocab),
        values,
    })
}
