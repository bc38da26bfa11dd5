//! Probabilistic scoring: smoothed feature probabilities, a confidence-weighted
//! blend toward a neutral prior, and the per-category document probability.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{BayesResult, ConfigError, ModelError};
use crate::extract::FeatureCounts;

use super::UNKNOWN_CATEGORY_PROBABILITY;
use super::store::FrequencyStore;

/// Parameters of [`FrequencyStore::weighted_feature_probability`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// How many observations the assumed probability is worth.
    pub weight: f64,
    /// Probability assumed for a feature with no evidence.
    pub assumed_probability: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            weight: 1.0,
            assumed_probability: 0.5,
        }
    }
}

impl ScoringParams {
    pub fn validate(&self) -> BayesResult<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(ConfigError::Invalid {
                message: format!("weight must be finite and >= 0, got {}", self.weight),
            }
            .into());
        }
        let p = self.assumed_probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::Invalid {
                message: format!("assumed_probability must be in [0, 1], got {p}"),
            }
            .into());
        }
        Ok(())
    }
}

impl FrequencyStore {
    /// `(count + 1) / distinct_features(category)`.
    ///
    /// The denominator is the number of different features in the category,
    /// not its token total. Unknown categories get
    /// [`UNKNOWN_CATEGORY_PROBABILITY`]; a known category with no features
    /// is an [`ModelError::UndefinedRatio`].
    pub fn feature_probability(&self, feature: &str, category: &str) -> BayesResult<f64> {
        if !self.contains(category) {
            return Ok(UNKNOWN_CATEGORY_PROBABILITY);
        }
        let distinct = self.distinct_features(category);
        if distinct == 0 {
            return Err(ModelError::UndefinedRatio {
                context: format!("category \"{category}\" has no distinct features"),
            }
            .into());
        }
        Ok((self.count(feature, category) as f64 + 1.0) / distinct as f64)
    }

    /// Blend of [`feature_probability`](Self::feature_probability) and
    /// `assumed_prob`, leaning on the assumption while the feature has few
    /// occurrences across all categories.
    pub fn weighted_feature_probability(
        &self,
        feature: &str,
        category: &str,
        weight: f64,
        assumed_prob: f64,
    ) -> BayesResult<f64> {
        let basic = self.feature_probability(feature, category)?;
        let totals: f64 = self
            .categories()
            .map(|c| self.count(feature, c.as_str()) as f64)
            .sum();
        let denominator = weight + totals;
        if denominator == 0.0 {
            return Err(ModelError::UndefinedRatio {
                context: format!("feature \"{feature}\" unseen and weight is 0"),
            }
            .into());
        }
        Ok((weight * assumed_prob + totals * basic) / denominator)
    }

    /// Natural log of [`document_probability`](Self::document_probability).
    pub fn document_log_probability(
        &self,
        features: &FeatureCounts,
        category: &str,
        params: &ScoringParams,
    ) -> BayesResult<f64> {
        features.keys().try_fold(0.0, |acc, feature| -> BayesResult<f64> {
            let p = self.weighted_feature_probability(
                feature,
                category,
                params.weight,
                params.assumed_probability,
            )?;
            Ok(acc + p.ln())
        })
    }

    /// Product of weighted feature probabilities over the document.
    ///
    /// Accumulated as a sum of logs and exponentiated once.
    pub fn document_probability(
        &self,
        features: &FeatureCounts,
        category: &str,
        params: &ScoringParams,
    ) -> BayesResult<f64> {
        Ok(self.document_log_probability(features, category, params)?.exp())
    }

    /// Document probability times the category prior.
    pub fn probability(
        &self,
        features: &FeatureCounts,
        category: &str,
        params: &ScoringParams,
    ) -> BayesResult<f64> {
        if !self.contains(category) {
            return Err(ModelError::UnknownCategory {
                name: category.to_string(),
            }
            .into());
        }
        let document = self.document_probability(features, category, params)?;
        Ok(document * self.category_prior(category))
    }

    /// [`probability`](Self::probability) for every category.
    pub fn probabilities(
        &self,
        features: &FeatureCounts,
        params: &ScoringParams,
    ) -> BayesResult<BTreeMap<Category, f64>> {
        self.categories()
            .map(|c| -> BayesResult<(Category, f64)> {
                Ok((c.clone(), self.probability(features, c.as_str(), params)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(words: &[&str]) -> FeatureCounts {
        words.iter().map(|w| (w.to_string(), 1)).collect()
    }

    fn trained() -> FrequencyStore {
        let mut store = FrequencyStore::new([Category::new("spam"), Category::new("ham")]);
        store
            .train(&Category::new("spam"), &features(&["buy", "now"]))
            .unwrap();
        store
            .train(&Category::new("ham"), &features(&["hello", "friend"]))
            .unwrap();
        store
    }

    #[test]
    fn feature_probability_normalizes_by_distinct_features() {
        let mut store = trained();
        let mut doc = FeatureCounts::new();
        doc.insert("buy".to_string(), 3);
        store.train(&Category::new("spam"), &doc).unwrap();

        // spam row: buy=4, now=1 -> 2 distinct features.
        assert!((store.feature_probability("buy", "spam").unwrap() - 2.5).abs() < 1e-12);
        assert!((store.feature_probability("now", "spam").unwrap() - 1.0).abs() < 1e-12);
        assert!((store.feature_probability("zzz", "spam").unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn feature_probability_unknown_category() {
        let store = trained();
        assert_eq!(store.feature_probability("buy", "news").unwrap(), 0.1);
    }

    #[test]
    fn feature_probability_empty_category_is_undefined() {
        let store = FrequencyStore::new([Category::new("spam")]);
        assert!(store.feature_probability("buy", "spam").is_err());
    }

    #[test]
    fn weighted_probability_blends_toward_assumption() {
        let store = trained();
        // basic = 1.0, seen once overall: (0.5 + 1.0) / 2
        let p = store.weighted_feature_probability("buy", "spam", 1.0, 0.5).unwrap();
        assert!((p - 0.75).abs() < 1e-12);
        // basic = 0.5, seen once overall: (0.5 + 0.5) / 2
        let p = store.weighted_feature_probability("buy", "ham", 1.0, 0.5).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
        // Never seen anywhere: pure assumption.
        let p = store.weighted_feature_probability("zzz", "spam", 1.0, 0.3).unwrap();
        assert!((p - 0.3).abs() < 1e-12);
    }

    #[test]
    fn weighted_probability_zero_weight_unseen_feature_is_undefined() {
        let store = trained();
        assert!(store.weighted_feature_probability("zzz", "spam", 0.0, 0.5).is_err());
    }

    #[test]
    fn probability_combines_document_and_prior() {
        let store = trained();
        let params = ScoringParams::default();
        let doc = features(&["buy", "now"]);

        let spam = store.probability(&doc, "spam", &params).unwrap();
        let ham = store.probability(&doc, "ham", &params).unwrap();
        assert!((spam - 0.28125).abs() < 1e-12);
        assert!((ham - 0.125).abs() < 1e-12);

        let all = store.probabilities(&doc, &params).unwrap();
        assert_eq!(all.len(), 2);
        assert!((all["spam"] - spam).abs() < 1e-15);
    }

    #[test]
    fn featureless_document_probability_is_prior() {
        let store = trained();
        let p = store
            .probability(&FeatureCounts::new(), "spam", &ScoringParams::default())
            .unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn probability_unknown_category_fails() {
        let store = trained();
        let err = store
            .probability(&features(&["buy"]), "news", &ScoringParams::default())
            .unwrap_err();
        assert!(err.to_string().contains("unknown category"));
    }

    #[test]
    fn untrained_prior_is_zero_but_probability_is_undefined() {
        let store = FrequencyStore::new([Category::new("spam"), Category::new("ham")]);
        assert_eq!(store.category_prior("spam"), 0.0);
        let err = store
            .probability(&features(&["buy"]), "spam", &ScoringParams::default())
            .unwrap_err();
        assert!(err.to_string().contains("undefined ratio"));
    }

    #[test]
    fn longer_documents_are_less_probable() {
        let store = trained();
        let params = ScoringParams::default();
        let words = ["buy", "now", "hello", "friend"];
        let mut previous = f64::INFINITY;
        for n in 1..=words.len() {
            let p = store.probability(&features(&words[..n]), "spam", &params).unwrap();
            assert!(p > 0.0);
            assert!(p < previous, "n={n}: {p} !< {previous}");
            previous = p;
        }
    }

    #[test]
    fn log_space_matches_direct_product() {
        let store = trained();
        let params = ScoringParams::default();
        let doc = features(&["buy", "now", "hello", "friend", "zzz"]);
        let direct: f64 = doc
            .keys()
            .map(|f| store.weighted_feature_probability(f, "spam", 1.0, 0.5).unwrap())
            .product();
        let logged = store.document_probability(&doc, "spam", &params).unwrap();
        assert!((direct - logged).abs() < 1e-12);
    }

    #[test]
    fn params_validation() {
        assert!(ScoringParams::default().validate().is_ok());
        let bad = ScoringParams {
            weight: -1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = ScoringParams {
            assumed_probability: 1.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = ScoringParams {
            weight: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
