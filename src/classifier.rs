//! Text-level classifier facade.
//!
//! [`Classifier`] owns one [`FrequencyStore`] and the collaborators needed
//! to feed it: a [`FeatureExtractor`], an optional [`Vocabulary`] and the
//! scoring/training settings. Each instance is independent; there is no
//! process-wide state.
//!
//! Mutating operations take `&mut self` and scoring takes `&self`, so a
//! single owner can never observe a half-applied `train`. Sharing one
//! classifier across threads is up to the caller (e.g. behind an `RwLock`).

use std::collections::BTreeMap;

use crate::category::Category;
use crate::config::{ClassifierConfig, TrainingConfig};
use crate::error::{BayesResult, ModelError};
use crate::extract::{FeatureCounts, FeatureExtractor, Vocabulary, WordFrequencyExtractor};
use crate::model::{CategorySummary, FrequencyStore, ScoringParams};

/// Incrementally trainable text classifier.
#[derive(Debug, Clone)]
pub struct Classifier<E = WordFrequencyExtractor> {
    pub(crate) store: FrequencyStore,
    pub(crate) vocabulary: Option<Vocabulary>,
    extractor: E,
    scoring: ScoringParams,
    training: TrainingConfig,
}

impl Classifier<WordFrequencyExtractor> {
    /// Create a classifier with the default extractor and settings.
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_extractor(categories, WordFrequencyExtractor::default())
    }

    /// Create a classifier from a validated configuration.
    pub fn from_config(config: &ClassifierConfig) -> BayesResult<Self> {
        config.validate()?;
        let mut classifier = Self::with_extractor(
            &config.categories,
            WordFrequencyExtractor::new(config.extractor.clone()),
        );
        classifier.scoring = config.scoring;
        classifier.training = config.training;
        classifier.vocabulary = config.vocabulary.clone();
        Ok(classifier)
    }
}

impl<E: FeatureExtractor> Classifier<E> {
    /// Create a classifier that extracts features with `extractor`.
    pub fn with_extractor<I, S>(categories: I, extractor: E) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = FrequencyStore::new(categories.into_iter().map(|c| Category::new(c.as_ref())));
        tracing::info!(categories = store.len(), "created classifier");
        Self {
            store,
            vocabulary: None,
            extractor,
            scoring: ScoringParams::default(),
            training: TrainingConfig::default(),
        }
    }

    /// Replace the scoring parameters.
    pub fn with_scoring(mut self, scoring: ScoringParams) -> BayesResult<Self> {
        scoring.validate()?;
        self.scoring = scoring;
        Ok(self)
    }

    /// Replace the training settings.
    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }

    pub fn store(&self) -> &FrequencyStore {
        &self.store
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn scoring(&self) -> &ScoringParams {
        &self.scoring
    }

    pub fn training(&self) -> &TrainingConfig {
        &self.training
    }

    /// Set or clear the feature allow-list.
    pub fn set_vocabulary(&mut self, vocabulary: Option<Vocabulary>) {
        tracing::info!(
            words = vocabulary.as_ref().map_or(0, Vocabulary::len),
            "vocabulary {}",
            if vocabulary.is_some() { "set" } else { "cleared" }
        );
        self.vocabulary = vocabulary;
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    /// Add a category with an empty row.
    ///
    /// Adding a name that already exists wipes what was trained into it;
    /// the returned flag is `true` when that reset happened.
    pub fn add_category(&mut self, name: &str) -> (Category, bool) {
        let category = Category::new(name);
        let reset = self.store.add_category(category.clone());
        (category, reset)
    }

    /// All categories in normalized form, sorted.
    pub fn categories(&self) -> Vec<Category> {
        self.store.categories().cloned().collect()
    }

    /// Extract the document's features, filtered by the vocabulary if set.
    pub fn features(&self, text: &str) -> BayesResult<FeatureCounts> {
        let counts = self.extractor.extract(text)?;
        Ok(match &self.vocabulary {
            Some(vocabulary) => vocabulary.filter(counts),
            None => counts,
        })
    }

    /// Train `text` into `category`.
    ///
    /// Extraction runs before any counter changes, so a rejected document
    /// leaves the model untouched.
    pub fn train(&mut self, category: &str, text: &str) -> BayesResult<()> {
        let category = Category::new(category);
        let features = self.features(text)?;
        if !self.store.contains(category.as_str()) && self.training.auto_create_categories {
            self.store.add_category(category.clone());
        }
        self.store.train(&category, &features)
    }

    /// Remove `text` from `category`.
    pub fn untrain(&mut self, category: &str, text: &str) -> BayesResult<()> {
        let category = Category::new(category);
        let features = self.features(text)?;
        self.store
            .untrain(&category, &features, self.training.document_counts)
    }

    /// Naive log-probability score per category.
    pub fn classification_scores(&self, text: &str) -> BayesResult<BTreeMap<Category, f64>> {
        self.store.classification_scores(&self.features(text)?)
    }

    /// Naive scores sorted best first.
    pub fn ranked_scores(&self, text: &str) -> BayesResult<Vec<(Category, f64)>> {
        self.store.ranked_scores(&self.features(text)?)
    }

    /// Best category by naive score; ties go to the lexicographically first name.
    pub fn classify(&self, text: &str) -> BayesResult<Category> {
        self.store.classify(&self.features(text)?)
    }

    /// Share of training documents that went to `category`.
    pub fn category_prior(&self, category: &str) -> f64 {
        self.store.category_prior(Category::new(category).as_str())
    }

    /// Weighted document probability times the category prior.
    pub fn probability(&self, text: &str, category: &str) -> BayesResult<f64> {
        let category = self.known(category)?;
        self.store
            .probability(&self.features(text)?, category.as_str(), &self.scoring)
    }

    pub fn probabilities(&self, text: &str) -> BayesResult<BTreeMap<Category, f64>> {
        self.store.probabilities(&self.features(text)?, &self.scoring)
    }

    /// Fisher membership score of `text` for `category`, in `[0, 1]`.
    pub fn fisher_probability(&self, text: &str, category: &str) -> BayesResult<f64> {
        let category = self.known(category)?;
        self.store
            .fisher_probability(&self.features(text)?, category.as_str())
    }

    pub fn fisher_probabilities(&self, text: &str) -> BayesResult<BTreeMap<Category, f64>> {
        self.store.fisher_probabilities(&self.features(text)?)
    }

    pub fn summary(&self) -> Vec<CategorySummary> {
        self.store.summary()
    }

    fn known(&self, name: &str) -> BayesResult<Category> {
        let category = Category::new(name);
        if self.store.contains(category.as_str()) {
            Ok(category)
        } else {
            Err(ModelError::UnknownCategory {
                name: category.to_string(),
            }
            .into())
        }
    }
}
