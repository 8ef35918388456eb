//! Shared primitive types used across the simulator.

/// A price in currency units.
pub type Price = f64;

/// A whole count of units sold.
pub type Units = u64;

/// Display name of a product. Not guaranteed unique across the dataset.
pub type ProductName = String;

/// Prefix used for one-hot category feature names.
pub const CATEGORY_FEATURE_PREFIX: &str = "Category_";
