//! # Token Aligner
//!
//! Projects per-character BIO tags onto sub-word token offsets, one label
//! id per token, in token order.
//!
//! A token whose first character is tagged takes that tag, so a token
//! starting a skill gets `B-SKILL` and one starting mid-skill gets
//! `I-SKILL`. Otherwise the first tagged character inside the token
//! decides. When a token straddles a tag change the first tag wins; this
//! is a known approximation for aggressive sub-word splits and is kept
//! as is.

use crate::tagging::bio_tags::{IGNORE_INDEX, LabelVocab, SkillTag};

/// Symbolic tag for one token, `None` for special (zero-width) tokens.
pub fn token_tag(chars: &[SkillTag], start: usize, end: usize) -> Option<SkillTag> {
    if start == end {
        return None;
    }

    if let Some(tag) = chars.get(start).filter(|t| t.is_skill()) {
        return Some(*tag);
    }

    let stop = end.min(chars.len());
    let first_inside = chars
        .get(start..stop)
        .and_then(|window| window.iter().find(|t| t.is_skill()));
    Some(first_inside.copied().unwrap_or(SkillTag::Outside))
}

/// Label ids for every token, with [`IGNORE_INDEX`] for special tokens.
pub fn align_labels(chars: &[SkillTag], offsets: &[(usize, usize)], vocab: &LabelVocab) -> Vec<i64> {
    offsets
        .iter()
        .map(|&(start, end)| match token_tag(chars, start, end) {
            Some(tag) => vocab.id(tag),
            None => IGNORE_INDEX,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagging::labeler::char_labels;
    use crate::tagging::spans::{Span, resolve_spans};
    use crate::tagging::tokenizer::{OffsetTokenizer, WordTokenizer};

    fn chars_for(text: &str, skills: &[&str]) -> Vec<SkillTag> {
        char_labels(text.chars().count(), &resolve_spans(text, skills))
    }

    #[test]
    fn test_special_tokens_ignored() {
        let vocab = LabelVocab::new();
        let chars = vec![SkillTag::BeginSkill, SkillTag::InsideSkill];
        assert_eq!(align_labels(&chars, &[(0, 0), (0, 2), (2, 2)], &vocab), vec![-100, 1, -100]);
    }

    #[test]
    fn test_subword_split_gets_begin_then_inside() {
        // "JavaScript" split as "Java" + "Script"
        let vocab = LabelVocab::new();
        let chars = chars_for("JavaScript dev", &["JavaScript"]);
        let labels = align_labels(&chars, &[(0, 0), (0, 4), (4, 10), (11, 14), (0, 0)], &vocab);
        assert_eq!(labels, vec![-100, 1, 2, 0, -100]);
    }

    #[test]
    fn test_leading_punctuation_merged_into_token() {
        // token "(React" starts on "(" but covers the skill
        let vocab = LabelVocab::new();
        let chars = chars_for("(React)", &["React"]);
        assert_eq!(align_labels(&chars, &[(0, 6), (6, 7)], &vocab), vec![1, 0]);
    }

    #[test]
    fn test_straddling_token_first_label_wins() {
        // chars: O O B I I; token [1, 4) sees O first, then B
        let chars = char_labels(5, &[Span::new(2, 5)]);
        assert_eq!(token_tag(&chars, 1, 4), Some(SkillTag::BeginSkill));
        // token starting inside keeps I even if it runs past the span
        let chars = char_labels(6, &[Span::new(0, 3)]);
        assert_eq!(token_tag(&chars, 2, 6), Some(SkillTag::InsideSkill));
    }

    #[test]
    fn test_offsets_past_text_end() {
        let chars = char_labels(3, &[Span::new(0, 3)]);
        assert_eq!(token_tag(&chars, 3, 9), Some(SkillTag::Outside));
        assert_eq!(token_tag(&chars, 7, 9), Some(SkillTag::Outside));
    }

    #[test]
    fn test_token_coverage_with_word_tokenizer() {
        let vocab = LabelVocab::new();
        let text = "We need React and AWS.";
        let enc = WordTokenizer::default().encode(text).unwrap();
        let labels = align_labels(&chars_for(text, &["React", "AWS"]), &enc.offsets, &vocab);

        assert_eq!(labels.len(), enc.len());
        assert_eq!(labels, vec![-100, 0, 0, 1, 0, 1, 0, -100]);
        for (label, (start, end)) in labels.iter().zip(&enc.offsets) {
            if start == end {
                assert_eq!(*label, IGNORE_INDEX);
            } else {
                assert!(vocab.tag(*label).is_ok());
            }
        }
    }
}
