// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # bayes-sift
//!
//! An incrementally trainable Bayesian text classifier. It keeps
//! per-category word-frequency tables learned from labeled documents and
//! scores new documents two ways: a naive log-probability sum and Fisher's
//! combined-probability (inverse chi-square) test.
//!
//! ## Architecture
//!
//! - **Frequency store** (`model::store`): per-category feature counts, document and word counters
//! - **Naive scorer** (`model::naive`): log-probability sums, `classify`
//! - **Probabilistic scorer** (`model::probability`): smoothed and weighted feature probabilities
//! - **Fisher scorer** (`model::fisher`): chi feature probability, inverse chi-square
//! - **Classifier** (`classifier`): text-level facade over extractor, vocabulary and store
//! - **Persistence** (`persist`), **configuration** (`config`)
//!
//! ## Library usage
//!
//! ```
//! use bayes_sift::Classifier;
//!
//! let mut clf = Classifier::new(["spam", "ham"]);
//! clf.train("spam", "buy now").unwrap();
//! clf.train("ham", "hello friend").unwrap();
//!
//! assert_eq!(clf.classify("buy now").unwrap().as_str(), "spam");
//! let fisher = clf.fisher_probability("hello friend", "ham").unwrap();
//! assert!((0.0..=1.0).contains(&fisher));
//! ```

pub mod category;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod persist;

pub use category::Category;
pub use classifier::Classifier;
pub use config::{ClassifierConfig, TrainingConfig};
pub use error::{BayesError, BayesResult};
pub use extract::{FeatureCounts, FeatureExtractor, Vocabulary, WordFrequencyExtractor};
pub use model::{DocumentCountPolicy, FrequencyStore, ScoringParams};
