//! # Character Labeler
//!
//! Expands resolved spans into one BIO tag per character of the text.

use crate::tagging::bio_tags::SkillTag;
use crate::tagging::spans::Span;

/// Tag every character position of a text of `char_len` characters.
///
/// Each span `[s, e)` with `s < e <= char_len` sets `s` to `B-SKILL` and
/// `s+1..e` to `I-SKILL`. Spans outside those bounds are skipped.
pub fn char_labels(char_len: usize, spans: &[Span]) -> Vec<SkillTag> {
    let mut labels = vec![SkillTag::Outside; char_len];
    for span in spans {
        if span.start < span.end && span.end <= char_len {
            labels[span.start] = SkillTag::BeginSkill;
            for label in &mut labels[span.start + 1..span.end] {
                *label = SkillTag::InsideSkill;
            }
        }
    }
    labels
}
