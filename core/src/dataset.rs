//! CSV product dataset loader.
//!
//! Parses the historical portfolio CSV into `ProductRecord` structs.
//! Expected CSV columns (header names as exported by the sales team):
//!   Product Name, Category, Base Price, Base Units Sold, Elasticity,
//!   Brand Loyalty, Market Share (%)
//!
//! Extra columns are ignored.

use crate::error::{SimError, SimResult};
use crate::types::{Price, ProductName, Units};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One row of historical data. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Product Name")]
    pub name: ProductName,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Base Price")]
    pub base_price: Price,
    #[serde(rename = "Base Units Sold")]
    pub base_units_sold: Units,
    #[serde(rename = "Elasticity")]
    pub elasticity: f64,
    #[serde(rename = "Brand Loyalty")]
    pub brand_loyalty: f64,
    #[serde(rename = "Market Share (%)")]
    pub market_share_pct: f64,
}

impl ProductRecord {
    /// Revenue at the historical price and volume.
    pub fn base_revenue(&self) -> f64 {
        self.base_price * self.base_units_sold as f64
    }
}

/// Load product records from a CSV reader.
pub fn load_products<R: Read>(reader: R) -> SimResult<Vec<ProductRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, result) in csv_reader.deserialize().enumerate() {
        let line = idx + 2;
        let record: ProductRecord = result?;
        check_record(&record, line)?;
        records.push(record);
    }

    log::info!("dataset: loaded {} product records", records.len());
    Ok(records)
}

/// Load product records from a CSV file path.
pub fn load_products_file(path: &str) -> SimResult<Vec<ProductRecord>> {
    let file = std::fs::File::open(path)?;
    log::debug!("dataset: reading {path}");
    load_products(file)
}

/// Distinct product names in first-seen order.
pub fn unique_names(records: &[ProductRecord]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    records
        .iter()
        .map(|r| r.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// First record whose name matches exactly.
///
/// Names may repeat in the dataset; the earliest row wins so repeated
/// lookups always return the same record.
pub fn find_by_name<'a>(records: &'a [ProductRecord], name: &str) -> SimResult<&'a ProductRecord> {
    let mut matches = records.iter().filter(|r| r.name == name);
    let first = matches.next().ok_or_else(|| SimError::ProductNotFound {
        name: name.to_string(),
    })?;

    let duplicates = matches.count();
    if duplicates > 0 {
        log::debug!("dataset: '{name}' has {duplicates} duplicate rows, using the first");
    }
    Ok(first)
}

/// Hard failures for values no formula can use; soft range issues only warn.
fn check_record(record: &ProductRecord, line: usize) -> SimResult<()> {
    let numeric = [
        ("Base Price", record.base_price),
        ("Elasticity", record.elasticity),
        ("Brand Loyalty", record.brand_loyalty),
        ("Market Share (%)", record.market_share_pct),
    ];
    for (column, value) in numeric {
        if !value.is_finite() {
            return Err(SimError::InvalidRecord {
                line,
                reason: format!("{column} is not a finite number ({value})"),
            });
        }
    }

    if record.category.is_empty() {
        return Err(SimError::InvalidRecord {
            line,
            reason: "Category is empty".into(),
        });
    }

    if record.base_price <= 0.0 {
        log::warn!(
            "dataset: line {line} '{}' has non-positive base price {}",
            record.name, record.base_price
        );
    }
    if !(0.0..=1.0).contains(&record.brand_loyalty) {
        log::warn!(
            "dataset: line {line} '{}' brand loyalty {} outside [0, 1]",
            record.name, record.brand_loyalty
        );
    }
    if !(0.0..=100.0).contains(&record.market_share_pct) {
        log::warn!(
            "dataset: line {line} '{}' market share {}% outside [0, 100]",
            record.name, record.market_share_pct
        );
    }

    Ok(())
}
