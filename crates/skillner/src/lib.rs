//! # Skillner
//!
//! Umbrella crate for skill extraction from job descriptions.
//!
//! - [`skillner_core`]: span resolution, BIO labeling, token alignment,
//!   decoding and model inference
//! - [`skillner_trainer`]: dataset loading, reproducible splits, feature
//!   preparation and evaluation

pub use skillner_core;
pub use skillner_trainer;

pub use skillner_core::{
    EncodedExample, EntityGroup, ExtractorConfig, LabelVocab, LabelingConfig, LabelingPipeline,
    Result, SkillExample, SkillExtractor, SkillTag, SkillnerError,
};
