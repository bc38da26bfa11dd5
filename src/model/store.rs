//! Frequency store: per-category feature counts and the counters derived from them.
//!
//! Invariants kept by every mutation:
//! - `total_words` equals the sum of every stored count across all rows.
//! - a stored count is never zero; untraining a feature down to zero or
//!   below removes its entry.
//! - `total_documents` equals the sum of the per-category document counts.
//! - feature rows and document counters hold the same normalized categories.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{BayesResult, ModelError};
use crate::extract::FeatureCounts;

/// How `untrain` treats the document counters that `train` increments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCountPolicy {
    /// Leave document counters untouched; only feature counts are reversed.
    #[default]
    Keep,
    /// Decrement the category and total document counters by one (saturating).
    Reverse,
}

/// Per-category statistics, as shown by `info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub documents: u64,
    pub words: u64,
    pub distinct_features: usize,
}

/// The mutable tables every scorer reads from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyStore {
    rows: BTreeMap<Category, FeatureCounts>,
    document_counts: BTreeMap<Category, u64>,
    total_documents: u64,
    total_words: u64,
}

impl FrequencyStore {
    /// Create a store with one empty row per category.
    pub fn new<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        let mut store = Self::default();
        for category in categories {
            store.rows.insert(category.clone(), FeatureCounts::new());
            store.document_counts.insert(category, 0);
        }
        store
    }

    /// Create an empty row for `category`.
    ///
    /// Re-adding an existing category discards everything trained into it.
    /// Returns `true` when such a reset happened.
    pub fn add_category(&mut self, category: Category) -> bool {
        let previous_words: u64 = self
            .rows
            .insert(category.clone(), FeatureCounts::new())
            .map(|row| row.values().sum())
            .unwrap_or(0);
        let previous_docs = self.document_counts.insert(category.clone(), 0);

        self.total_words -= previous_words;
        self.total_documents -= previous_docs.unwrap_or(0);

        if previous_docs.is_some() {
            tracing::warn!(
                category = %category,
                discarded_words = previous_words,
                "category re-added; trained counts discarded"
            );
            true
        } else {
            if self.total_documents > 0 {
                tracing::warn!(
                    category = %category,
                    "category added after training; it will score unreliably until trained"
                );
            }
            false
        }
    }

    pub fn contains(&self, category: &str) -> bool {
        self.rows.contains_key(category)
    }

    /// Categories in iteration order (sorted by normalized name).
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.rows.keys()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, category: &str) -> Option<&FeatureCounts> {
        self.rows.get(category)
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = (&Category, &FeatureCounts)> {
        self.rows.iter()
    }

    /// Stored count of `feature` in `category`; 0 when absent or unknown.
    pub fn count(&self, feature: &str, category: &str) -> u64 {
        self.rows
            .get(category)
            .and_then(|row| row.get(feature))
            .copied()
            .unwrap_or(0)
    }

    pub fn document_count(&self, category: &str) -> u64 {
        self.document_counts.get(category).copied().unwrap_or(0)
    }

    pub fn total_documents(&self) -> u64 {
        self.total_documents
    }

    pub fn total_words(&self) -> u64 {
        self.total_words
    }

    /// Number of different features stored for `category`.
    pub fn distinct_features(&self, category: &str) -> usize {
        self.rows.get(category).map_or(0, |row| row.len())
    }

    /// Sum of all feature counts stored for `category`.
    pub fn row_total(&self, category: &str) -> u64 {
        self.rows.get(category).map_or(0, |row| row.values().sum())
    }

    /// Share of all trained documents that went to `category`.
    ///
    /// Defined as 0.0 before any training and for unknown categories.
    pub fn category_prior(&self, category: &str) -> f64 {
        if self.total_documents == 0 {
            return 0.0;
        }
        self.document_count(category) as f64 / self.total_documents as f64
    }

    /// Record one document's features under `category`.
    pub fn train(&mut self, category: &Category, features: &FeatureCounts) -> BayesResult<()> {
        let row = self
            .rows
            .get_mut(category.as_str())
            .ok_or_else(|| ModelError::UnknownCategory {
                name: category.to_string(),
            })?;

        let mut added = 0u64;
        for (feature, &count) in features {
            *row.entry(feature.clone()).or_insert(0) += count;
            added += count;
        }
        self.total_words += added;

        *self.document_counts.entry(category.clone()).or_insert(0) += 1;
        self.total_documents += 1;

        tracing::debug!(
            category = %category,
            features = features.len(),
            words = added,
            "trained document"
        );
        Ok(())
    }

    /// Remove one document's features from `category`.
    ///
    /// A feature whose count would drop to zero or below is deleted and
    /// `total_words` shrinks by what was actually stored, so over-untraining
    /// never drives a counter negative.
    pub fn untrain(
        &mut self,
        category: &Category,
        features: &FeatureCounts,
        policy: DocumentCountPolicy,
    ) -> BayesResult<()> {
        let row = self
            .rows
            .get_mut(category.as_str())
            .ok_or_else(|| ModelError::UnknownCategory {
                name: category.to_string(),
            })?;

        let mut removed = 0u64;
        for (feature, &count) in features {
            let Some(stored) = row.get_mut(feature.as_str()) else {
                continue;
            };
            if *stored <= count {
                removed += *stored;
                row.remove(feature.as_str());
            } else {
                *stored -= count;
                removed += count;
            }
        }
        self.total_words -= removed;

        if policy == DocumentCountPolicy::Reverse {
            if let Some(docs) = self.document_counts.get_mut(category.as_str()) {
                if *docs > 0 {
                    *docs -= 1;
                    self.total_documents -= 1;
                }
            }
        }

        tracing::debug!(
            category = %category,
            features = features.len(),
            words = removed,
            ?policy,
            "untrained document"
        );
        Ok(())
    }

    /// Verify the counter invariants listed in the module docs.
    ///
    /// Every mutation keeps them, so this only fails for a store that was
    /// deserialized from foreign or damaged data. The error names the first
    /// violated rule.
    pub fn check_invariants(&self) -> Result<(), String> {
        if !self.rows.keys().eq(self.document_counts.keys()) {
            return Err("feature rows and document counters name different categories".into());
        }
        if let Some(category) = self
            .rows
            .keys()
            .find(|c| Category::new(c.as_str()) != **c)
        {
            return Err(format!("category {:?} is not normalized", category.as_str()));
        }

        let mut words = 0u64;
        for (category, row) in &self.rows {
            if let Some((feature, _)) = row.iter().find(|(_, count)| **count == 0) {
                return Err(format!("zero count stored for {feature:?} in {category}"));
            }
            for &count in row.values() {
                words = words
                    .checked_add(count)
                    .ok_or_else(|| format!("word count overflows in {category}"))?;
            }
        }
        if words != self.total_words {
            return Err(format!(
                "total_words is {} but rows sum to {words}",
                self.total_words
            ));
        }

        let documents = self
            .document_counts
            .values()
            .try_fold(0u64, |sum, &docs| sum.checked_add(docs))
            .ok_or_else(|| "document count overflows".to_string())?;
        if documents != self.total_documents {
            return Err(format!(
                "total_documents is {} but categories sum to {documents}",
                self.total_documents
            ));
        }
        Ok(())
    }

    /// Per-category statistics in iteration order.
    pub fn summary(&self) -> Vec<CategorySummary> {
        self.rows
            .iter()
            .map(|(category, row)| CategorySummary {
                category: category.clone(),
                documents: self.document_count(category.as_str()),
                words: row.values().sum(),
                distinct_features: row.len(),
            })
            .collect()
    }
}
