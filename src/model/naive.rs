//! Naive scoring: per-category sums of feature log-probabilities.

use std::collections::BTreeMap;

use crate::category::Category;
use crate::error::{BayesResult, ModelError};
use crate::extract::FeatureCounts;

use super::MISSING_FEATURE_COUNT;
use super::store::FrequencyStore;

impl FrequencyStore {
    /// Sum of `ln(count / row_total)` over the document's features, per category.
    ///
    /// A feature the category has never seen counts as [`MISSING_FEATURE_COUNT`].
    /// Scores are `<= 0` in practice; the closest to zero is the most likely.
    /// A document without features scores 0.0 everywhere. Scoring a document
    /// with features against a category with nothing trained is an
    /// [`ModelError::UndefinedRatio`].
    pub fn classification_scores(
        &self,
        features: &FeatureCounts,
    ) -> BayesResult<BTreeMap<Category, f64>> {
        let mut scores = BTreeMap::new();
        for (category, row) in self.rows() {
            let mut score = 0.0;
            if !features.is_empty() {
                let total: u64 = row.values().sum();
                if total == 0 {
                    return Err(ModelError::UndefinedRatio {
                        context: format!("category \"{category}\" has no trained features"),
                    }
                    .into());
                }
                let total = total as f64;
                for feature in features.keys() {
                    let count = row
                        .get(feature)
                        .map_or(MISSING_FEATURE_COUNT, |&c| c as f64);
                    score += (count / total).ln();
                }
            }
            scores.insert(category.clone(), score);
        }
        Ok(scores)
    }

    /// Categories with their naive scores, best first.
    ///
    /// Exact ties keep iteration order, so the lexicographically smaller
    /// category name ranks first.
    pub fn ranked_scores(&self, features: &FeatureCounts) -> BayesResult<Vec<(Category, f64)>> {
        let mut ranked: Vec<(Category, f64)> =
            self.classification_scores(features)?.into_iter().collect();
        // Stable sort preserves iteration order among equal scores.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(ranked)
    }

    /// The category with the highest naive score.
    ///
    /// Ties go to the first category in iteration order.
    pub fn classify(&self, features: &FeatureCounts) -> BayesResult<Category> {
        let mut best: Option<(Category, f64)> = None;
        for (category, score) in self.classification_scores(features)? {
            if best.as_ref().is_none_or(|(_, top)| score > *top) {
                best = Some((category, score));
            }
        }
        best.map(|(category, _)| category).ok_or_else(|| {
            ModelError::UndefinedRatio {
                context: "no categories to classify into".to_string(),
            }
            .into()
        })
    }
}
