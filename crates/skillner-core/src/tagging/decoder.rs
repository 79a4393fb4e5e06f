//! # Span Decoder
//!
//! Inverse of the aligner: groups adjacent tokens predicted as one skill
//! back into surface strings, then drops case-insensitive duplicates.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::tagging::bio_tags::{LabelVocab, SKILL_ENTITY, SkillTag};
use crate::tagging::offsets::CharIndex;

const OUTSIDE_ENTITY: &str = "O";

/// An aggregated entity mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityGroup {
    /// Entity type without the B-/I- prefix, e.g. `SKILL`.
    pub entity_group: String,
    /// Surface text taken from the original input.
    pub word: String,
    /// Character offset of the first token.
    pub start: usize,
    /// Character offset past the last token.
    pub end: usize,
    /// Mean score of the grouped tokens.
    pub score: f32,
}

struct Pending {
    entity: &'static str,
    start: usize,
    end: usize,
    scores: Vec<f32>,
}

/// Index and value of the highest score in a row.
pub fn argmax(row: &[f32]) -> (usize, f32) {
    row.iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0, 0.0))
}

/// Group per-token predictions the "simple" way.
///
/// Special (zero-width) tokens are skipped. A token joins the open group
/// when it has the same entity type and is not a `B-` tag; anything else
/// opens a new group. Groups of `O` tokens are discarded.
pub fn aggregate_simple(
    text: &str,
    offsets: &[(usize, usize)],
    predictions: &[(SkillTag, f32)],
) -> Vec<EntityGroup> {
    let index = CharIndex::new(text);
    let mut groups = Vec::new();
    let mut current: Option<Pending> = None;

    for (&(start, end), &(tag, score)) in offsets.iter().zip(predictions) {
        if start == end {
            continue;
        }
        let entity = tag.entity_type().unwrap_or(OUTSIDE_ENTITY);

        let continues = current
            .as_ref()
            .is_some_and(|g| g.entity == entity && !tag.is_begin());
        if continues {
            if let Some(group) = current.as_mut() {
                group.end = end;
                group.scores.push(score);
            }
            continue;
        }

        let opened = Pending {
            entity,
            start,
            end,
            scores: vec![score],
        };
        if let Some(done) = current.replace(opened) {
            close_group(&mut groups, &index, done);
        }
    }

    if let Some(done) = current.take() {
        close_group(&mut groups, &index, done);
    }
    groups
}

fn close_group(groups: &mut Vec<EntityGroup>, index: &CharIndex<'_>, group: Pending) {
    if group.entity == OUTSIDE_ENTITY {
        return;
    }
    let word = index.slice(group.start, group.end).trim();
    if word.is_empty() {
        return;
    }
    let score = group.scores.iter().sum::<f32>() / group.scores.len() as f32;
    groups.push(EntityGroup {
        entity_group: group.entity.to_string(),
        word: word.to_string(),
        start: group.start,
        end: group.end,
        score,
    });
}

/// Argmax every token's scores and aggregate.
pub fn decode_predictions(
    text: &str,
    offsets: &[(usize, usize)],
    scores: &[Vec<f32>],
    vocab: &LabelVocab,
) -> Vec<EntityGroup> {
    let predictions: Vec<(SkillTag, f32)> = scores
        .iter()
        .map(|row| {
            let (idx, score) = argmax(row);
            (vocab.tag_at(idx).unwrap_or(SkillTag::Outside), score)
        })
        .collect();
    aggregate_simple(text, offsets, &predictions)
}

/// Keep skill mentions, first-seen casing, first-seen order.
///
/// Entries are `(label, surface)` pairs; a label counts as a skill when it
/// contains `SKILL`, so `B-SKILL`, `I-SKILL` and an aggregated `SKILL`
/// group all qualify.
pub fn dedup_skills<'a, I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut seen = HashSet::new();
    let mut skills = Vec::new();
    for (label, word) in entries {
        if !label.contains(SKILL_ENTITY) {
            continue;
        }
        if seen.insert(word.to_lowercase()) {
            skills.push(word.to_string());
        }
    }
    skills
}

/// Skill strings from aggregated groups.
pub fn decode_skills(groups: &[EntityGroup]) -> Vec<String> {
    dedup_skills(
        groups
            .iter()
            .map(|g| (g.entity_group.as_str(), g.word.as_str())),
    )
}
