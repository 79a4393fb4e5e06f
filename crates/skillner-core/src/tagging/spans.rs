//! # Span Resolver
//!
//! Turns a weakly-specified list of skill names into conflict-free
//! character spans over the source text. Longer skills claim characters
//! first, so "JavaScript" wins over "Java" inside it.

use std::collections::HashSet;
use std::ops::Range;

use regex::RegexBuilder;
use tracing::{debug, warn};

use crate::tagging::offsets::CharIndex;

/// A half-open character interval `[start, end)` into a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Two spans overlap iff neither ends before the other starts.
    pub fn overlaps(&self, other: &Span) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Find non-overlapping occurrences of `skills` in `text`.
///
/// Matching is case-insensitive and literal: regex metacharacters in a
/// skill name match themselves. Skills are tried longest first (ties keep
/// their list order); a candidate overlapping an accepted span is dropped.
/// Spans are returned in discovery order.
///
/// # Examples
/// ```
/// use skillner_core::tagging::spans::{resolve_spans, Span};
///
/// let skills = vec!["Java".to_string(), "JavaScript".to_string()];
/// let spans = resolve_spans("Senior JavaScript dev", &skills);
/// assert_eq!(spans, vec![Span::new(7, 17)]);
/// ```
pub fn resolve_spans<S: AsRef<str>>(text: &str, skills: &[S]) -> Vec<Span> {
    let mut seen = HashSet::new();
    let mut unique: Vec<&str> = skills
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.trim().is_empty())
        .filter(|s| seen.insert(*s))
        .collect();
    unique.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));

    let index = CharIndex::new(text);
    let mut spans: Vec<Span> = Vec::new();

    for skill in unique {
        let pattern = match RegexBuilder::new(&regex::escape(skill))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                warn!(skill, error = %e, "skipping skill that cannot be searched");
                continue;
            }
        };

        for m in pattern.find_iter(text) {
            let candidate = Span::new(index.char_of(m.start()), index.char_of(m.end()));
            if candidate.is_empty() || spans.iter().any(|s| s.overlaps(&candidate)) {
                continue;
            }
            spans.push(candidate);
        }
    }

    debug!(spans = spans.len(), "resolved skill spans");
    spans
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Accepted spans never overlap, stay in bounds and spell a skill.
        #[test]
        fn spans_never_overlap(
            skills in prop::collection::vec("[a-cA-C]{1,4}", 0..6),
            filler in prop::collection::vec("[a-c ]{0,5}", 0..8),
        ) {
            // Inject every skill at least once, some twice.
            let mut text = String::new();
            for (i, piece) in filler.iter().enumerate() {
                text.push_str(piece);
                if let Some(skill) = skills.get(i % skills.len().max(1)) {
                    text.push_str(skill);
                }
            }

            let spans = resolve_spans(&text, &skills);
            let char_len = text.chars().count();
            let lowered: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();

            for (i, a) in spans.iter().enumerate() {
                prop_assert!(a.start < a.end && a.end <= char_len);
                let surface: String = text.chars().skip(a.start).take(a.len()).collect();
                prop_assert!(lowered.contains(&surface.to_lowercase()));
                for b in spans.iter().skip(i + 1) {
                    prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }
}
