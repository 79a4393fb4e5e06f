//! # Skill Extractor
//!
//! Inference over a trained token classifier: tokenize, score every token,
//! aggregate adjacent skill tokens and drop case-insensitive duplicates.

use std::path::Path;

use candle_core::Device;
use tracing::debug;

use crate::error::{Result, SkillnerError};
use crate::model::artifact::ModelArtifact;
use crate::model::classifier::{DistilBertTokenClassifier, TokenClassifier};
use crate::tagging::bio_tags::LabelVocab;
use crate::tagging::decoder::{EntityGroup, decode_predictions, decode_skills};
use crate::tagging::tokenizer::{DEFAULT_MAX_LENGTH, OffsetTokenizer, SubwordTokenizer};

/// Configuration for loading an extractor.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Maximum tokens per input, special tokens included
    pub max_length: usize,
    /// Device the classifier runs on
    pub device: Device,
    /// Vocabulary the model must have been trained with
    pub vocab: LabelVocab,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            device: Device::Cpu,
            vocab: LabelVocab::new(),
        }
    }
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length.max(2);
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }
}

/// Extracts deduplicated skill strings from free text.
pub struct SkillExtractor<C = DistilBertTokenClassifier, T = SubwordTokenizer> {
    tokenizer: T,
    classifier: C,
    vocab: LabelVocab,
}

impl SkillExtractor {
    /// Load a trained model directory.
    ///
    /// Fails with [`SkillnerError::MissingArtifacts`] naming every absent
    /// file, or [`SkillnerError::VocabMismatch`] when the stored labels
    /// differ from `config.vocab`.
    pub fn load<P: AsRef<Path>>(dir: P, config: &ExtractorConfig) -> Result<Self> {
        let artifact = ModelArtifact::locate(dir)?;
        let classifier = artifact.load_classifier(&config.vocab, &config.device)?;
        let tokenizer = SubwordTokenizer::from_file(artifact.tokenizer_path(), config.max_length)?;
        Ok(Self::new(tokenizer, classifier, config.vocab.clone()))
    }
}

impl<C: TokenClassifier, T: OffsetTokenizer> SkillExtractor<C, T> {
    pub fn new(tokenizer: T, classifier: C, vocab: LabelVocab) -> Self {
        Self {
            tokenizer,
            classifier,
            vocab,
        }
    }

    /// Aggregated entity groups for `text`, in text order.
    pub fn extract_entities(&self, text: &str) -> Result<Vec<EntityGroup>> {
        if text.trim().is_empty() {
            return Err(SkillnerError::EmptyInput);
        }

        let tokenized = self.tokenizer.encode(text)?;
        let scores = self.classifier.predict(&tokenized.ids)?;
        if scores.len() != tokenized.len() {
            return Err(SkillnerError::Tokenizer(format!(
                "classifier returned {} rows for {} tokens",
                scores.len(),
                tokenized.len()
            )));
        }

        let groups = decode_predictions(text, &tokenized.offsets, &scores, &self.vocab);
        debug!(tokens = tokenized.len(), entities = groups.len(), "decoded entities");
        Ok(groups)
    }

    /// Deduplicated skill mentions, first-seen casing and order.
    pub fn extract(&self, text: &str) -> Result<Vec<String>> {
        Ok(decode_skills(&self.extract_entities(text)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::tagging::tokenizer::{CLS_ID, SEP_ID, WordTokenizer};

    /// Tags every token whose id is in `skill_ids` as B-SKILL.
    struct KeywordClassifier {
        skill_ids: HashSet<u32>,
    }

    impl KeywordClassifier {
        fn new(words: &str) -> Self {
            let ids = WordTokenizer::default().encode(words).unwrap().ids;
            Self {
                skill_ids: ids
                    .into_iter()
                    .filter(|id| *id != CLS_ID && *id != SEP_ID)
                    .collect(),
            }
        }
    }

    impl TokenClassifier for KeywordClassifier {
        fn predict(&self, input_ids: &[u32]) -> Result<Vec<Vec<f32>>> {
            Ok(input_ids
                .iter()
                .map(|id| {
                    if self.skill_ids.contains(id) {
                        vec![0.05, 0.9, 0.05]
                    } else {
                        vec![0.9, 0.05, 0.05]
                    }
                })
                .collect())
        }
    }

    fn extractor(words: &str) -> SkillExtractor<KeywordClassifier, WordTokenizer> {
        SkillExtractor::new(
            WordTokenizer::default(),
            KeywordClassifier::new(words),
            LabelVocab::new(),
        )
    }

    #[test]
    fn test_extract_dedups_case_insensitively() {
        let skills = extractor("aws docker")
            .extract("Ship on AWS with Docker, then aws again.")
            .unwrap();
        assert_eq!(skills, vec!["AWS", "Docker"]);
    }

    #[test]
    fn test_extract_entities_carry_offsets() {
        let groups = extractor("react")
            .extract_entities("We need React and AWS.")
            .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].word, "React");
        assert_eq!((groups[0].start, groups[0].end), (8, 13));
        assert!((groups[0].score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            extractor("go").extract("   "),
            Err(SkillnerError::EmptyInput)
        ));
    }

    #[test]
    fn test_nothing_found() {
        assert!(extractor("kubernetes").extract("Python and SQL").unwrap().is_empty());
    }

    #[test]
    fn test_load_reports_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let err = SkillExtractor::load(dir.path(), &ExtractorConfig::new())
            .err()
            .unwrap();
        assert!(matches!(err, SkillnerError::MissingArtifacts { ref missing, .. } if missing.len() == 3));
    }
}
