//! # Trained Model Artifacts
//!
//! A trained model travels as one directory holding the weights, the
//! tokenizer and a `config.json` that carries the label vocabulary.
//! [`ModelArtifact::locate`] checks all of them up front and reports every
//! missing file at once.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::distilbert::Config as DistilBertConfig;
use serde::Deserialize;
use tracing::info;

use crate::error::{Result, SkillnerError};
use crate::model::classifier::DistilBertTokenClassifier;
use crate::tagging::bio_tags::{LabelConfig, LabelVocab};

pub const WEIGHTS_FILE: &str = "model.safetensors";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const CONFIG_FILE: &str = "config.json";

/// Default DistilBERT hidden size when `config.json` omits `dim`.
const DEFAULT_HIDDEN_SIZE: usize = 768;

fn default_hidden_size() -> usize {
    DEFAULT_HIDDEN_SIZE
}

/// The fields of `config.json` the token classifier needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    #[serde(default = "default_hidden_size")]
    pub dim: usize,
    #[serde(default)]
    pub id2label: BTreeMap<String, String>,
    #[serde(default)]
    pub label2id: BTreeMap<String, i64>,
}

impl ArtifactConfig {
    /// The stored label vocabulary.
    pub fn label_config(&self) -> LabelConfig {
        LabelConfig {
            num_labels: self.id2label.len(),
            id2label: self.id2label.clone(),
            label2id: self.label2id.clone(),
        }
    }
}

/// A checked model directory.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    dir: PathBuf,
}

impl ModelArtifact {
    /// Verify that `dir` holds weights, tokenizer and config.
    pub fn locate<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let missing: Vec<String> = [WEIGHTS_FILE, TOKENIZER_FILE, CONFIG_FILE]
            .into_iter()
            .filter(|name| !dir.join(name).is_file())
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(SkillnerError::MissingArtifacts { dir, missing });
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(WEIGHTS_FILE)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Read the head size and label metadata from `config.json`.
    pub fn read_config(&self) -> Result<ArtifactConfig> {
        let raw = fs::read_to_string(self.config_path())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Check that the stored vocabulary is `vocab`.
    pub fn verify_vocab(&self, vocab: &LabelVocab) -> Result<ArtifactConfig> {
        let config = self.read_config()?;
        vocab.verify(&config.label_config())?;
        Ok(config)
    }

    /// Load the token classifier on `device`.
    pub fn load_classifier(
        &self,
        vocab: &LabelVocab,
        device: &Device,
    ) -> Result<DistilBertTokenClassifier> {
        let config = self.verify_vocab(vocab)?;
        let raw = fs::read_to_string(self.config_path())?;
        let encoder_config: DistilBertConfig = serde_json::from_str(&raw)
            .map_err(|e| SkillnerError::ModelLoad(format!("failed to parse config: {e}")))?;

        // SAFETY: the weights file is memory-mapped read-only and not modified while loaded.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[self.weights_path()], DType::F32, device)?
        };
        let classifier =
            DistilBertTokenClassifier::load(vb, &encoder_config, config.dim, vocab.len())
                .map_err(|e| SkillnerError::ModelLoad(e.to_string()))?;

        info!(dir = %self.dir.display(), hidden = config.dim, "loaded token classifier");
        Ok(classifier)
    }
}
