//! Classifier configuration, loaded from TOML.
//!
//! ```toml
//! categories = ["spam", "ham"]
//! vocabulary = ["buy", "now", "hello"]
//!
//! [scoring]
//! weight = 1.0
//! assumed_probability = 0.5
//!
//! [training]
//! auto_create_categories = false
//! document_counts = "keep"
//!
//! [extractor]
//! min_word_len = 3
//! stop_words = true
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BayesResult, ConfigError};
use crate::extract::{ExtractorConfig, Vocabulary};
use crate::model::{DocumentCountPolicy, ScoringParams};

/// How training treats categories and document counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Create a row on first `train` for an unknown category instead of
    /// failing with `UnknownCategory`.
    pub auto_create_categories: bool,
    /// Whether `untrain` also reverses document counters.
    pub document_counts: DocumentCountPolicy,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Categories created at construction.
    pub categories: Vec<String>,
    /// Optional feature allow-list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vocabulary>,
    pub scoring: ScoringParams,
    pub training: TrainingConfig,
    pub extractor: ExtractorConfig,
}

impl ClassifierConfig {
    /// Config with the given categories and everything else defaulted.
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document. `origin` names it in errors.
    pub fn from_toml(content: &str, origin: &str) -> BayesResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> BayesResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_toml(&content, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            categories = config.categories.len(),
            "loaded classifier config"
        );
        Ok(config)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> BayesResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }

    pub fn validate(&self) -> BayesResult<()> {
        self.scoring.validate()
    }
}
