//! # BIO Tags and Label Vocabulary
//!
//! Defines the tag set for sequence labeling of skill mentions and the
//! fixed id mapping shared by training, evaluation and inference.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillnerError};

/// Label id reserved for tokens that must not contribute to loss or metrics.
///
/// Lies outside the valid tag-id range on purpose.
pub const IGNORE_INDEX: i64 = -100;

/// Entity type name carried by the skill tags.
pub const SKILL_ENTITY: &str = "SKILL";

/// BIO tags for labeling characters and tokens of a job description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillTag {
    /// Outside (not part of any skill)
    Outside,
    /// First unit of a skill mention
    BeginSkill,
    /// Continuation of a skill mention
    InsideSkill,
}

impl SkillTag {
    /// Total number of distinct tags.
    pub const NUM_TAGS: usize = 3;

    /// Get all possible tags in id order.
    pub fn all_tags() -> &'static [SkillTag] {
        &[SkillTag::Outside, SkillTag::BeginSkill, SkillTag::InsideSkill]
    }

    /// Get the tag index for tensor operations.
    pub fn index(&self) -> usize {
        match self {
            SkillTag::Outside => 0,
            SkillTag::BeginSkill => 1,
            SkillTag::InsideSkill => 2,
        }
    }

    /// Get tag from index.
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(SkillTag::Outside),
            1 => Some(SkillTag::BeginSkill),
            2 => Some(SkillTag::InsideSkill),
            _ => None,
        }
    }

    /// The canonical string form, as stored in `id2label`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillTag::Outside => "O",
            SkillTag::BeginSkill => "B-SKILL",
            SkillTag::InsideSkill => "I-SKILL",
        }
    }

    /// Check if this is a "Begin" tag.
    pub fn is_begin(&self) -> bool {
        matches!(self, SkillTag::BeginSkill)
    }

    /// Check if this is an "Inside" tag.
    pub fn is_inside(&self) -> bool {
        matches!(self, SkillTag::InsideSkill)
    }

    /// Check if this tag marks part of a skill.
    pub fn is_skill(&self) -> bool {
        !matches!(self, SkillTag::Outside)
    }

    /// Get the entity type for this tag.
    pub fn entity_type(&self) -> Option<&'static str> {
        match self {
            SkillTag::BeginSkill | SkillTag::InsideSkill => Some(SKILL_ENTITY),
            SkillTag::Outside => None,
        }
    }
}

impl fmt::Display for SkillTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillTag {
    type Err = SkillnerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "O" => Ok(SkillTag::Outside),
            "B-SKILL" => Ok(SkillTag::BeginSkill),
            "I-SKILL" => Ok(SkillTag::InsideSkill),
            other => Err(SkillnerError::UnknownTag(other.to_string())),
        }
    }
}

/// The label metadata persisted next to trained weights.
///
/// Field names follow the `config.json` convention of HuggingFace
/// token-classification models so the fragment can be merged as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub num_labels: usize,
    pub id2label: BTreeMap<String, String>,
    pub label2id: BTreeMap<String, i64>,
}

/// Bidirectional tag <-> id mapping.
///
/// Built once per process and handed to every component that needs ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVocab {
    tags: Vec<SkillTag>,
}

impl LabelVocab {
    /// The `O`, `B-SKILL`, `I-SKILL` vocabulary.
    pub fn new() -> Self {
        Self {
            tags: SkillTag::all_tags().to_vec(),
        }
    }

    /// Number of real (non-ignore) labels.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in id order.
    pub fn tags(&self) -> &[SkillTag] {
        &self.tags
    }

    /// Encode a tag.
    pub fn id(&self, tag: SkillTag) -> i64 {
        tag.index() as i64
    }

    /// Decode an id. The ignore sentinel is not a tag.
    pub fn tag(&self, id: i64) -> Result<SkillTag> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.tags.get(idx).copied())
            .ok_or(SkillnerError::UnknownLabelId(id))
    }

    /// Decode an argmax position over the label axis.
    pub fn tag_at(&self, idx: usize) -> Option<SkillTag> {
        self.tags.get(idx).copied()
    }

    /// Build the metadata fragment persisted with a trained model.
    pub fn to_label_config(&self) -> LabelConfig {
        let mut id2label = BTreeMap::new();
        let mut label2id = BTreeMap::new();
        for tag in &self.tags {
            let id = self.id(*tag);
            id2label.insert(id.to_string(), tag.as_str().to_string());
            label2id.insert(tag.as_str().to_string(), id);
        }
        LabelConfig {
            num_labels: self.tags.len(),
            id2label,
            label2id,
        }
    }

    /// Check that a model's stored label metadata matches this vocabulary.
    pub fn verify(&self, config: &LabelConfig) -> Result<()> {
        if config.num_labels != self.len() {
            return Err(SkillnerError::VocabMismatch(format!(
                "expected {} labels, artifact declares {}",
                self.len(),
                config.num_labels
            )));
        }
        for tag in &self.tags {
            let id = self.id(*tag);
            match config.id2label.get(&id.to_string()) {
                Some(label) if label == tag.as_str() => {}
                other => {
                    return Err(SkillnerError::VocabMismatch(format!(
                        "id {id} should be {tag}, artifact has {other:?}"
                    )));
                }
            }
            if config.label2id.get(tag.as_str()) != Some(&id) {
                return Err(SkillnerError::VocabMismatch(format!(
                    "label {tag} should map to {id}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for LabelVocab {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_index_roundtrip() {
        for tag in SkillTag::all_tags() {
            let recovered = SkillTag::from_index(tag.index()).unwrap();
            assert_eq!(*tag, recovered);
        }
        assert_eq!(SkillTag::from_index(SkillTag::NUM_TAGS), None);
    }

    #[test]
    fn test_fixed_ids() {
        let vocab = LabelVocab::new();
        assert_eq!(vocab.id(SkillTag::Outside), 0);
        assert_eq!(vocab.id(SkillTag::BeginSkill), 1);
        assert_eq!(vocab.id(SkillTag::InsideSkill), 2);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_ignore_is_not_a_tag() {
        let vocab = LabelVocab::new();
        assert!(matches!(
            vocab.tag(IGNORE_INDEX),
            Err(SkillnerError::UnknownLabelId(-100))
        ));
        assert!(vocab.tag(3).is_err());
        assert_eq!(vocab.tag(2).unwrap(), SkillTag::InsideSkill);
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(SkillTag::BeginSkill.to_string(), "B-SKILL");
        assert_eq!("I-SKILL".parse::<SkillTag>().unwrap(), SkillTag::InsideSkill);
        assert!("B-TITLE".parse::<SkillTag>().is_err());
    }

    #[test]
    fn test_entity_type() {
        assert_eq!(SkillTag::BeginSkill.entity_type(), Some("SKILL"));
        assert_eq!(SkillTag::InsideSkill.entity_type(), Some("SKILL"));
        assert_eq!(SkillTag::Outside.entity_type(), None);
        assert!(SkillTag::BeginSkill.is_begin());
        assert!(!SkillTag::InsideSkill.is_begin());
        assert!(SkillTag::InsideSkill.is_inside());
    }

    #[test]
    fn test_label_config_matches_hf_layout() {
        let config = LabelVocab::new().to_label_config();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["num_labels"], 3);
        assert_eq!(json["id2label"]["1"], "B-SKILL");
        assert_eq!(json["label2id"]["I-SKILL"], 2);
    }

    #[test]
    fn test_verify_accepts_own_config() {
        let vocab = LabelVocab::new();
        vocab.verify(&vocab.to_label_config()).unwrap();
    }

    #[test]
    fn test_verify_rejects_swapped_labels() {
        let vocab = LabelVocab::new();
        let mut config = vocab.to_label_config();
        config.id2label.insert("1".into(), "I-SKILL".into());
        config.id2label.insert("2".into(), "B-SKILL".into());
        assert!(matches!(
            vocab.verify(&config),
            Err(SkillnerError::VocabMismatch(_))
        ));

        let mut config = vocab.to_label_config();
        config.num_labels = 17;
        assert!(vocab.verify(&config).is_err());
    }
}
