//! # Entity-level Evaluation
//!
//! seqeval-style scoring of predicted label ids against gold label ids.
//! Positions whose gold label is [`IGNORE_INDEX`] are dropped from both
//! sides before chunking, exactly as they are dropped from the loss.

use serde::Serialize;

use crate::tagging::bio_tags::{IGNORE_INDEX, LabelVocab, SkillTag};

/// Overall scores of an evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Token-level accuracy over non-ignored positions
    pub accuracy: f64,
}

/// Running counts over many sequences.
#[derive(Debug, Clone, Default)]
pub struct MetricsAccumulator {
    gold_chunks: usize,
    predicted_chunks: usize,
    correct_chunks: usize,
    correct_tokens: usize,
    total_tokens: usize,
}

/// `[start, end)` token ranges of the mentions in a tag sequence.
///
/// A chunk opens at `B-SKILL`, or at `I-SKILL` after `O`, and closes
/// before the next `O` or `B-SKILL`.
pub fn chunks(tags: &[SkillTag]) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    let mut open: Option<usize> = None;

    for (i, tag) in tags.iter().enumerate() {
        match tag {
            SkillTag::BeginSkill => {
                if let Some(start) = open.replace(i) {
                    found.push((start, i));
                }
            }
            SkillTag::InsideSkill => {
                open.get_or_insert(i);
            }
            SkillTag::Outside => {
                if let Some(start) = open.take() {
                    found.push((start, i));
                }
            }
        }
    }

    if let Some(start) = open {
        found.push((start, tags.len()));
    }
    found
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sequence. Predicted ids outside the vocabulary count as `O`.
    pub fn add(&mut self, gold: &[i64], predicted: &[i64], vocab: &LabelVocab) {
        let (gold_tags, pred_tags): (Vec<SkillTag>, Vec<SkillTag>) = gold
            .iter()
            .zip(predicted)
            .filter(|(g, _)| **g != IGNORE_INDEX)
            .map(|(g, p)| {
                (
                    vocab.tag(*g).unwrap_or(SkillTag::Outside),
                    vocab.tag(*p).unwrap_or(SkillTag::Outside),
                )
            })
            .unzip();

        self.total_tokens += gold_tags.len();
        self.correct_tokens += gold_tags
            .iter()
            .zip(&pred_tags)
            .filter(|(g, p)| g == p)
            .count();

        let gold_chunks = chunks(&gold_tags);
        let pred_chunks = chunks(&pred_tags);
        self.gold_chunks += gold_chunks.len();
        self.predicted_chunks += pred_chunks.len();
        self.correct_chunks += pred_chunks
            .iter()
            .filter(|c| gold_chunks.contains(c))
            .count();
    }

    pub fn finish(&self) -> Metrics {
        let precision = ratio(self.correct_chunks, self.predicted_chunks);
        let recall = ratio(self.correct_chunks, self.gold_chunks);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Metrics {
            precision,
            recall,
            f1,
            accuracy: ratio(self.correct_tokens, self.total_tokens),
        }
    }
}

/// Score `(gold, predicted)` id sequences.
pub fn compute_metrics<'a, I>(pairs: I, vocab: &LabelVocab) -> Metrics
where
    I: IntoIterator<Item = (&'a [i64], &'a [i64])>,
{
    let mut acc = MetricsAccumulator::new();
    for (gold, predicted) in pairs {
        acc.add(gold, predicted, vocab);
    }
    acc.finish()
}
