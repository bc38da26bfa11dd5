//! The statistical model: frequency store and the three scorers.
//!
//! Everything in here works on already-extracted [`FeatureCounts`]; turning
//! text into features is the job of [`crate::extract`]. The scorers are
//! `impl` blocks on [`FrequencyStore`] split by method:
//!
//! - [`store`]: tables, counters, train/untrain, category prior
//! - [`naive`]: log-probability sums and `classify`
//! - [`probability`]: smoothed, weighted and joint document probabilities
//! - [`fisher`]: per-feature chi probability, inverse chi-square, Fisher score
//!
//! [`FeatureCounts`]: crate::extract::FeatureCounts

pub mod fisher;
pub mod naive;
pub mod probability;
pub mod store;

pub use fisher::inverse_chi_square;
pub use probability::ScoringParams;
pub use store::{CategorySummary, DocumentCountPolicy, FrequencyStore};

/// Count assumed for a feature a category has never seen, in naive scoring.
pub const MISSING_FEATURE_COUNT: f64 = 0.1;

/// Feature probability reported for a category the store does not know.
pub const UNKNOWN_CATEGORY_PROBABILITY: f64 = 0.1;
