//! Category vocabulary for one-hot encoding.
//!
//! Built once from the training records and shared by fitting and
//! encoding so both always see the same indicator columns.

use crate::dataset::ProductRecord;
use crate::error::{SimError, SimResult};
use crate::types::CATEGORY_FEATURE_PREFIX;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryVocabulary {
    /// All observed categories, sorted. Index 0 is the reference level.
    categories: Vec<String>,
}

impl CategoryVocabulary {
    /// Collect the distinct categories of `records`.
    ///
    /// Categories are sorted lexically and the first one becomes the
    /// dropped reference level.
    pub fn from_records(records: &[ProductRecord]) -> SimResult<Self> {
        if records.is_empty() {
            return Err(SimError::EmptyDataset);
        }

        let categories: Vec<String> = records
            .iter()
            .map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        log::info!(
            "vocabulary: {} categories, reference level '{}'",
            categories.len(),
            categories[0]
        );
        Ok(Self { categories })
    }

    /// The dropped level; products in it encode as all-zero indicators.
    pub fn reference(&self) -> &str {
        &self.categories[0]
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of indicator features (K = categories − 1).
    pub fn indicator_count(&self) -> usize {
        self.categories.len().saturating_sub(1)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(category))
            .is_ok()
    }

    /// Indicator slot for `category`, or `None` for the reference level.
    pub fn indicator_index(&self, category: &str) -> SimResult<Option<usize>> {
        match self.categories.binary_search_by(|c| c.as_str().cmp(category)) {
            Ok(0) => Ok(None),
            Ok(i) => Ok(Some(i - 1)),
            Err(_) => Err(SimError::UnknownCategory {
                category: category.to_string(),
            }),
        }
    }

    /// Feature names of the indicator columns, e.g. `Category_Soap`.
    pub fn indicator_names(&self) -> Vec<String> {
        self.categories[1..]
            .iter()
            .map(|c| format!("{CATEGORY_FEATURE_PREFIX}{c}"))
            .collect()
    }
}
