//! Feature extraction: document text to `feature -> count`.
//!
//! The classifier consumes whatever an extractor produces verbatim. The
//! default [`WordFrequencyExtractor`] does the minimum a bag-of-words model
//! needs: Unicode compatibility folding, lower-casing, splitting on anything
//! that is not a letter or digit, a length floor and an optional stop-word
//! list. Stemming and other language-specific rules belong in a custom
//! [`FeatureExtractor`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::{BayesResult, ModelError};

/// Ordered mapping from feature to occurrence count within one document.
pub type FeatureCounts = BTreeMap<String, u64>;

/// Anything that is not a letter or a digit separates words.
static RE_WORD_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// Words carrying no topical signal, dropped when stop-word filtering is on.
const STOP_WORDS: &[&str] = &[
    "about", "after", "all", "also", "and", "any", "are", "been", "but", "can", "could", "did",
    "does", "for", "from", "had", "has", "have", "her", "here", "him", "his", "how", "into", "its",
    "just", "may", "more", "most", "not", "our", "out", "she", "should", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "too",
    "very", "was", "were", "what", "when", "where", "which", "while", "who", "why", "will", "with",
    "would", "you", "your",
];

/// Converts raw document text into feature counts.
pub trait FeatureExtractor {
    /// Extract features from `text`.
    ///
    /// Errors with [`ModelError::InvalidInput`] when the text cannot be
    /// processed at all.
    fn extract(&self, text: &str) -> BayesResult<FeatureCounts>;
}

/// Settings for [`WordFrequencyExtractor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Words with fewer characters than this are discarded.
    pub min_word_len: usize,
    /// Drop common English function words.
    pub stop_words: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_word_len: 3,
            stop_words: true,
        }
    }
}

/// Default bag-of-words extractor.
#[derive(Debug, Clone, Default)]
pub struct WordFrequencyExtractor {
    config: ExtractorConfig,
}

impl WordFrequencyExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn keep(&self, word: &str) -> bool {
        if word.chars().count() < self.config.min_word_len {
            return false;
        }
        !(self.config.stop_words && STOP_WORDS.binary_search(&word).is_ok())
    }
}

impl FeatureExtractor for WordFrequencyExtractor {
    fn extract(&self, text: &str) -> BayesResult<FeatureCounts> {
        if text.contains('\0') {
            return Err(ModelError::InvalidInput {
                message: "document text contains a NUL byte".to_string(),
            }
            .into());
        }

        let folded: String = text.nfkc().collect::<String>().to_lowercase();
        let mut counts = FeatureCounts::new();
        for word in RE_WORD_BREAK.split(&folded) {
            if !word.is_empty() && self.keep(word) {
                *counts.entry(word.to_string()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

/// Allow-list of features. When set on a classifier, extracted features
/// outside the list take no part in training or scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary(BTreeSet<String>);

impl Vocabulary {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(words.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.0.contains(feature)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Drop every feature not in the vocabulary.
    pub fn filter(&self, mut counts: FeatureCounts) -> FeatureCounts {
        counts.retain(|feature, _| self.0.contains(feature));
        counts
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
