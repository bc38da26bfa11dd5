//! Rich diagnostic error types for bayes-sift.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! so callers get an error code and help text alongside the message.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for bayes-sift.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum BayesError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Model errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("unknown category: \"{name}\"")]
    #[diagnostic(
        code(bayes::model::unknown_category),
        help(
            "The category has never been added to this classifier. \
             Add it first with `add_category`, or enable \
             `auto_create_categories` in the [training] config section."
        )
    )]
    UnknownCategory { name: String },

    #[error("undefined ratio: {context}")]
    #[diagnostic(
        code(bayes::model::undefined_ratio),
        help(
            "A probability would divide by zero. This happens when a category \
             has no trained features yet. Train every category with at least \
             one document before scoring."
        )
    )]
    UndefinedRatio { context: String },

    #[error("invalid input: {message}")]
    #[diagnostic(
        code(bayes::model::invalid_input),
        help("The feature extractor rejected the document text.")
    )]
    InvalidInput { message: String },
}

// ---------------------------------------------------------------------------
// Persistence errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PersistError {
    #[error("I/O error on {path}: {source}")]
    #[diagnostic(
        code(bayes::persist::io),
        help(
            "A filesystem operation failed. Check that the model file exists, \
             that its directory is writable, and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(bayes::persist::serialization),
        help(
            "The model could not be encoded or decoded. A model file that fails \
             to decode is either truncated or was not written by bayes-sift."
        )
    )]
    Serialization { message: String },

    #[error("unsupported model format version {found} (expected {expected})")]
    #[diagnostic(
        code(bayes::persist::version),
        help("Re-train the model with this version of bayes-sift.")
    )]
    UnsupportedVersion { found: u32, expected: u32 },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    #[diagnostic(
        code(bayes::config::read),
        help("Check that the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {path}: {source}")]
    #[diagnostic(
        code(bayes::config::write),
        help("Check that the config directory exists and is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(bayes::config::parse),
        help(
            "The config file must be valid TOML with optional `categories` and \
             `vocabulary` arrays and [scoring], [training], [extractor] tables."
        )
    )]
    Parse { path: String, message: String },

    #[error("invalid config value: {message}")]
    #[diagnostic(
        code(bayes::config::invalid),
        help(
            "`weight` must be a finite number >= 0 and `assumed_probability` \
             a finite number in [0, 1]."
        )
    )]
    Invalid { message: String },
}

/// Convenience alias used throughout bayes-sift.
pub type BayesResult<T> = std::result::Result<T, BayesError>;
