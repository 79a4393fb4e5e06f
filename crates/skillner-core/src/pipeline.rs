//! # Labeling Pipeline
//!
//! Runs one example through span resolution, character labeling and
//! token alignment under a single immutable configuration.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::tagging::align::align_labels;
use crate::tagging::bio_tags::{LabelVocab, SkillTag};
use crate::tagging::labeler::char_labels;
use crate::tagging::spans::resolve_spans;
use crate::tagging::tokenizer::{DEFAULT_MAX_LENGTH, OffsetTokenizer, SubwordTokenizer};
use crate::types::{EncodedExample, SkillExample};

/// Configuration shared by every example of a run.
#[derive(Debug, Clone)]
pub struct LabelingConfig {
    /// Maximum tokens per example, special tokens included.
    ///
    /// Applied when the pipeline builds its own tokenizer
    /// ([`LabelingPipeline::from_tokenizer_file`]). A tokenizer handed to
    /// [`LabelingPipeline::new`] keeps its own truncation.
    pub max_length: usize,
    /// Tag <-> id mapping written next to the model
    pub vocab: LabelVocab,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            vocab: LabelVocab::new(),
        }
    }
}

impl LabelingConfig {
    /// Create a new labeling configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum sequence length (at least room for two markers).
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length.max(2);
        self
    }
}

/// Per-character tags of `text` for the given skills.
pub fn label_chars<S: AsRef<str>>(text: &str, skills: &[S]) -> Vec<SkillTag> {
    let spans = resolve_spans(text, skills);
    char_labels(text.chars().count(), &spans)
}

/// Tokenizer plus configuration, turning examples into trainer features.
pub struct LabelingPipeline<T> {
    config: LabelingConfig,
    tokenizer: T,
}

impl<T: OffsetTokenizer> LabelingPipeline<T> {
    /// Wrap an already-configured tokenizer.
    ///
    /// `config.max_length` is not applied here; the tokenizer's own
    /// truncation decides the sequence length.
    pub fn new(config: LabelingConfig, tokenizer: T) -> Self {
        Self { config, tokenizer }
    }

    pub fn config(&self) -> &LabelingConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Tokenize an example and attach one label per token.
    ///
    /// # Examples
    /// ```
    /// use skillner_core::pipeline::{LabelingConfig, LabelingPipeline};
    /// use skillner_core::tagging::tokenizer::WordTokenizer;
    /// use skillner_core::types::SkillExample;
    ///
    /// let pipeline = LabelingPipeline::new(LabelingConfig::new(), WordTokenizer::default());
    /// let example = SkillExample::new("We need React.", vec!["React".into()]);
    /// let encoded = pipeline.encode(&example).unwrap();
    ///
    /// assert_eq!(encoded.labels, vec![-100, 0, 0, 1, 0, -100]);
    /// ```
    pub fn encode(&self, example: &SkillExample) -> Result<EncodedExample> {
        let chars = label_chars(&example.text, &example.skills);
        let tokenized = self.tokenizer.encode(&example.text)?;
        let labels = align_labels(&chars, &tokenized.offsets, &self.config.vocab);

        debug!(
            tokens = tokenized.len(),
            skill_tokens = labels.iter().filter(|&&l| l > 0).count(),
            "encoded example"
        );

        Ok(EncodedExample {
            input_ids: tokenized.ids,
            attention_mask: tokenized.attention_mask,
            labels,
        })
    }
}

impl LabelingPipeline<SubwordTokenizer> {
    /// Build a pipeline around a HuggingFace `tokenizer.json`, truncating
    /// to `config.max_length`.
    pub fn from_tokenizer_file<P: AsRef<Path>>(path: P, config: LabelingConfig) -> Result<Self> {
        let tokenizer = SubwordTokenizer::from_file(path, config.max_length)?;
        Ok(Self::new(config, tokenizer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagging::bio_tags::IGNORE_INDEX;
    use crate::tagging::tokenizer::WordTokenizer;

    fn pipeline(max_length: usize) -> LabelingPipeline<WordTokenizer> {
        let config = LabelingConfig::new().with_max_length(max_length);
        LabelingPipeline::new(config.clone(), WordTokenizer::new(config.max_length))
    }

    #[test]
    fn test_config_defaults() {
        let config = LabelingConfig::default();
        assert_eq!(config.max_length, 384);
        assert_eq!(config.vocab.len(), 3);
        assert_eq!(LabelingConfig::new().with_max_length(0).max_length, 2);
    }

    #[test]
    fn test_encode_lengths_agree() {
        let example = SkillExample::new(
            "Looking for JavaScript, Java and C++ experience",
            vec!["Java".into(), "JavaScript".into(), "C++".into()],
        );
        let encoded = pipeline(64).encode(&example).unwrap();
        assert_eq!(encoded.labels.len(), encoded.input_ids.len());
        assert_eq!(encoded.attention_mask.len(), encoded.input_ids.len());
        // JavaScript, Java, C (of C++) open mentions; the two "+" continue
        let begins = encoded.labels.iter().filter(|&&l| l == 1).count();
        assert_eq!(begins, 3);
        assert_eq!(encoded.labels.iter().filter(|&&l| l == 2).count(), 2);
    }

    #[test]
    fn test_no_match_is_all_outside() {
        let example = SkillExample::new("Python and SQL", vec!["Kubernetes".into()]);
        let encoded = pipeline(16).encode(&example).unwrap();
        assert!(
            encoded
                .labels
                .iter()
                .all(|&l| l == 0 || l == IGNORE_INDEX)
        );
    }

    #[test]
    fn test_truncation_keeps_alignment() {
        let example = SkillExample::new("a b c d e Rust", vec!["Rust".into()]);
        let encoded = pipeline(4).encode(&example).unwrap();
        assert_eq!(encoded.labels, vec![IGNORE_INDEX, 0, 0, IGNORE_INDEX]);
    }

    #[test]
    fn test_tokenizer_truncation_wins_over_config() {
        let example = SkillExample::new("a b c d e Rust", vec!["Rust".into()]);
        let pipeline = LabelingPipeline::new(LabelingConfig::new(), WordTokenizer::new(4));
        assert_eq!(pipeline.config().max_length, DEFAULT_MAX_LENGTH);
        assert_eq!(pipeline.encode(&example).unwrap().input_ids.len(), 4);
    }

    #[test]
    fn test_label_chars_length_invariant() {
        let text = "naïve Bayes and Rust";
        let chars = label_chars(text, &["Naïve Bayes"]);
        assert_eq!(chars.len(), text.chars().count());
        assert_eq!(chars[0], SkillTag::BeginSkill);
        assert_eq!(chars[10], SkillTag::InsideSkill);
        assert_eq!(chars[11], SkillTag::Outside);
    }
}
