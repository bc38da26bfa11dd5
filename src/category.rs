//! Category names.
//!
//! Every category-identifying string passes through [`Category::new`]
//! before it is used as a store key. Normalization is total, deterministic
//! and idempotent: NFKC, trimmed, underscores read as spaces, runs of
//! whitespace collapsed to a single space, lower-cased.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A normalized category identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Normalize a raw category name.
    pub fn new(raw: &str) -> Self {
        let composed: String = raw.nfkc().collect();
        let spaced = composed.replace('_', " ");
        let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
        Self(collapsed.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}
