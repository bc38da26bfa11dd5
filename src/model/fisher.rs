//! Fisher's method: combine per-feature category probabilities with
//! `-2·Σ ln p` and read the result off the chi-square upper tail.
//!
//! The per-feature probability fed into the combination is
//! [`FrequencyStore::chi_feature_probability`].

use std::collections::BTreeMap;

use crate::category::Category;
use crate::error::{BayesResult, ModelError};
use crate::extract::FeatureCounts;

use super::store::FrequencyStore;

/// Series approximation of the chi-square upper-tail probability.
///
/// `m = chi / 2`, `term = sum = e^-m`, then `floor(df / 2)` steps of
/// `term *= m / i; sum += term`, capped at 1.0.
pub fn inverse_chi_square(chi: f64, degrees_of_freedom: usize) -> f64 {
    let m = chi / 2.0;
    let mut term = (-m).exp();
    let mut sum = term;
    for i in 1..=degrees_of_freedom / 2 {
        term *= m / i as f64;
        sum += term;
    }
    sum.min(1.0)
}

impl FrequencyStore {
    /// Share of the feature's probability mass, summed over all categories,
    /// that belongs to `category`.
    pub fn chi_feature_probability(&self, feature: &str, category: &str) -> BayesResult<f64> {
        let clf = self.feature_probability(feature, category)?;
        if clf == 0.0 {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for c in self.categories() {
            total += self.feature_probability(feature, c.as_str())?;
        }
        Ok(clf / total)
    }

    /// Fisher membership score of the document for `category`, in `[0, 1]`.
    ///
    /// Degrees of freedom are twice the number of distinct features. A
    /// document without features scores 1.0.
    pub fn fisher_probability(&self, features: &FeatureCounts, category: &str) -> BayesResult<f64> {
        if !self.contains(category) {
            return Err(ModelError::UnknownCategory {
                name: category.to_string(),
            }
            .into());
        }

        let mut log_product = 0.0;
        for feature in features.keys() {
            let p = self.chi_feature_probability(feature, category)?;
            if p == 0.0 {
                // The product is zero, so the statistic is unbounded.
                return Ok(0.0);
            }
            log_product += p.ln();
        }

        let score = -2.0 * log_product;
        Ok(inverse_chi_square(score, 2 * features.len()))
    }

    /// [`fisher_probability`](Self::fisher_probability) for every category.
    pub fn fisher_probabilities(
        &self,
        features: &FeatureCounts,
    ) -> BayesResult<BTreeMap<Category, f64>> {
        self.categories()
            .map(|c| -> BayesResult<(Category, f64)> {
                Ok((c.clone(), self.fisher_probability(features, c.as_str())?))
            })
            .collect()
    }
}
