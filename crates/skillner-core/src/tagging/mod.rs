//! Span resolution, BIO labeling, token alignment and decoding.

pub mod align;
pub mod bio_tags;
pub mod decoder;
pub mod labeler;
pub mod offsets;
pub mod spans;
pub mod tokenizer;

pub use align::{align_labels, token_tag};
pub use bio_tags::{IGNORE_INDEX, LabelConfig, LabelVocab, SKILL_ENTITY, SkillTag};
pub use decoder::{EntityGroup, aggregate_simple, decode_predictions, decode_skills, dedup_skills};
pub use labeler::char_labels;
pub use offsets::CharIndex;
pub use spans::{Span, resolve_spans};
pub use tokenizer::{OffsetTokenizer, SubwordTokenizer, Token, TokenizedText, WordTokenizer};
