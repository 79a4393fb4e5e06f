use serde::{Deserialize, Serialize};

use crate::types::skills::deserialize_skills;

/// One labeled job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillExample {
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: Vec<String>,
}

impl SkillExample {
    pub fn new(text: impl Into<String>, skills: Vec<String>) -> Self {
        Self {
            text: text.into(),
            skills,
        }
    }
}

/// A tokenized example ready for a token-classification trainer.
///
/// All three vectors have one entry per token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedExample {
    pub input_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub labels: Vec<i64>,
}

impl EncodedExample {
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }
}
