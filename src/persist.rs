//! Model persistence.
//!
//! A saved model is a bincode-encoded format version followed by a
//! bincode-encoded body holding the frequency store and the vocabulary.
//! Scoring and training settings are not part of the model; they come from
//! configuration each time a classifier is built. Files are written through
//! a temporary file in the target directory and renamed into place.

use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::classifier::Classifier;
use crate::error::{BayesResult, PersistError};
use crate::extract::{FeatureExtractor, Vocabulary, WordFrequencyExtractor};
use crate::model::FrequencyStore;

/// Version written in front of every saved model.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SavedModelRef<'a> {
    store: &'a FrequencyStore,
    vocabulary: Option<&'a Vocabulary>,
}

#[derive(Deserialize)]
struct SavedModel {
    store: FrequencyStore,
    vocabulary: Option<Vocabulary>,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    format_version: u32,
    #[serde(flatten)]
    model: SavedModelRef<'a>,
}

fn serialization(e: impl std::fmt::Display) -> PersistError {
    PersistError::Serialization {
        message: e.to_string(),
    }
}

fn decode(bytes: &[u8]) -> BayesResult<SavedModel> {
    let mut reader = bytes;
    let found: u32 = bincode::deserialize_from(&mut reader).map_err(serialization)?;
    if found != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found,
            expected: FORMAT_VERSION,
        }
        .into());
    }
    let model: SavedModel = bincode::deserialize_from(&mut reader).map_err(serialization)?;
    model
        .store
        .check_invariants()
        .map_err(|reason| PersistError::Serialization {
            message: format!("inconsistent counters: {reason}"),
        })?;
    Ok(model)
}

fn read_file(path: &Path) -> BayesResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        PersistError::Io {
            path: path.display().to_string(),
            source: e,
        }
        .into()
    })
}

impl<E: FeatureExtractor> Classifier<E> {
    fn saved(&self) -> SavedModelRef<'_> {
        SavedModelRef {
            store: &self.store,
            vocabulary: self.vocabulary.as_ref(),
        }
    }

    /// Encode the model (store and vocabulary) to bytes.
    pub fn to_bytes(&self) -> BayesResult<Vec<u8>> {
        let mut buf = Vec::new();
        bincode::serialize_into(&mut buf, &FORMAT_VERSION).map_err(serialization)?;
        bincode::serialize_into(&mut buf, &self.saved()).map_err(serialization)?;
        Ok(buf)
    }

    /// Replace this classifier's model with one decoded from `bytes`,
    /// keeping its extractor and settings.
    ///
    /// A vocabulary saved with the model wins over the one already set; a
    /// model saved without one keeps the current vocabulary.
    pub fn restore_bytes(&mut self, bytes: &[u8]) -> BayesResult<()> {
        let model = decode(bytes)?;
        self.store = model.store;
        match (model.vocabulary, &self.vocabulary) {
            (Some(saved), Some(current)) if saved != *current => {
                tracing::warn!(
                    saved = saved.len(),
                    configured = current.len(),
                    "model carries its own vocabulary; configured vocabulary ignored"
                );
                self.vocabulary = Some(saved);
            }
            (Some(saved), _) => self.vocabulary = Some(saved),
            (None, _) => {}
        }
        Ok(())
    }

    /// Replace this classifier's model with the one saved at `path`.
    pub fn restore_file(&mut self, path: &Path) -> BayesResult<()> {
        self.restore_bytes(&read_file(path)?)?;
        tracing::info!(
            path = %path.display(),
            categories = self.store.len(),
            documents = self.store.total_documents(),
            "restored model"
        );
        Ok(())
    }

    /// Write the model to `path`, replacing any existing file atomically.
    pub fn save(&self, path: &Path) -> BayesResult<()> {
        let io_err = |source: std::io::Error| PersistError::Io {
            path: path.display().to_string(),
            source,
        };

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(io_err)?;

        let bytes = self.to_bytes()?;
        let temp = NamedTempFile::new_in(parent).map_err(io_err)?;
        {
            use std::io::Write;
            let mut writer = BufWriter::new(temp.as_file());
            writer.write_all(&bytes).map_err(io_err)?;
            writer.flush().map_err(io_err)?;
        }
        temp.persist(path).map_err(|e| io_err(e.error))?;

        tracing::info!(
            path = %path.display(),
            bytes = bytes.len(),
            "saved model"
        );
        Ok(())
    }

    /// Pretty JSON rendering of the model, for inspection.
    pub fn export_json(&self) -> BayesResult<String> {
        let export = JsonExport {
            format_version: FORMAT_VERSION,
            model: self.saved(),
        };
        Ok(serde_json::to_string_pretty(&export).map_err(serialization)?)
    }
}

impl Classifier<WordFrequencyExtractor> {
    /// Decode a model saved with [`Classifier::to_bytes`], using the default
    /// extractor and settings.
    pub fn from_bytes(bytes: &[u8]) -> BayesResult<Self> {
        let mut classifier = Self::new(std::iter::empty::<&str>());
        classifier.restore_bytes(bytes)?;
        Ok(classifier)
    }

    /// Load a model saved with [`Classifier::save`], using the default
    /// extractor and settings.
    pub fn load(path: &Path) -> BayesResult<Self> {
        let mut classifier = Self::new(std::iter::empty::<&str>());
        classifier.restore_file(path)?;
        Ok(classifier)
    }
}
