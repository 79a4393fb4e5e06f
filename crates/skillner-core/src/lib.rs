//! # Skillner Core
//!
//! The labeling engine behind skill extraction from job descriptions.
//! Resolves a loose list of skill names to character spans, tags every
//! character with BIO labels, projects those tags onto sub-word tokens for
//! training, and decodes model predictions back into skill strings.
//!
//! ## Quick Start
//!
//! ```rust
//! use skillner_core::pipeline::{LabelingConfig, LabelingPipeline};
//! use skillner_core::tagging::{aggregate_simple, decode_skills, SkillTag, WordTokenizer};
//! use skillner_core::tagging::tokenizer::OffsetTokenizer;
//! use skillner_core::types::SkillExample;
//!
//! let config = LabelingConfig::new();
//! let vocab = config.vocab.clone();
//! let pipeline = LabelingPipeline::new(config, WordTokenizer::default());
//!
//! let example = SkillExample::new("We need React and AWS.", vec!["React".into(), "AWS".into()]);
//! let encoded = pipeline.encode(&example).unwrap();
//!
//! // Feed the gold labels back through the decoder.
//! let offsets = pipeline.tokenizer().encode(&example.text).unwrap().offsets;
//! let tags: Vec<(SkillTag, f32)> = encoded
//!     .labels
//!     .iter()
//!     .map(|&id| (vocab.tag(id).unwrap_or(SkillTag::Outside), 1.0))
//!     .collect();
//! let groups = aggregate_simple(&example.text, &offsets, &tags);
//!
//! assert_eq!(decode_skills(&groups), vec!["React", "AWS"]);
//! ```
pub mod error;
pub mod extractor;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod tagging;
pub mod types;

// Re-export primary API
pub use error::{Result, SkillnerError};
pub use extractor::{ExtractorConfig, SkillExtractor};
pub use metrics::{Metrics, MetricsAccumulator, compute_metrics};
pub use model::{DistilBertTokenClassifier, ModelArtifact, TokenClassifier, masked_token_loss};
pub use pipeline::{LabelingConfig, LabelingPipeline, label_chars};
pub use tagging::{
    EntityGroup, IGNORE_INDEX, LabelConfig, LabelVocab, OffsetTokenizer, SkillTag, Span,
    SubwordTokenizer, WordTokenizer,
};
pub use types::{EncodedExample, SkillExample, parse_skill_list, parse_skill_str};
