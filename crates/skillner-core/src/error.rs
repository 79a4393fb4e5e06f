use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during skillner core operations.
#[derive(Debug, Error)]
pub enum SkillnerError {
    /// The input string is empty or contains only whitespace.
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    /// One or more files of a trained model directory are absent.
    #[error("model artifact at {dir:?} is missing: {}", missing.join(", "))]
    MissingArtifacts {
        /// The artifact directory that was inspected.
        dir: PathBuf,
        /// Every missing file name, in check order.
        missing: Vec<String>,
    },

    /// The label vocabulary stored with a model disagrees with ours.
    #[error("label vocabulary mismatch: {0}")]
    VocabMismatch(String),

    /// A label id outside the vocabulary was encountered.
    #[error("unknown label id {0}")]
    UnknownLabelId(i64),

    /// A tag string outside the vocabulary was encountered.
    #[error("unknown tag {0:?}")]
    UnknownTag(String),

    /// The external tokenizer failed.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// The model weights or config could not be loaded.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Candle ML framework error.
    #[error("ML inference error: {0}")]
    Candle(#[from] candle_core::Error),

    /// Config or metadata JSON could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error while reading an artifact.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for skillner operations.
pub type Result<T> = std::result::Result<T, SkillnerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = SkillnerError::EmptyInput;
        assert_eq!(err.to_string(), "input is empty or whitespace-only");

        let err = SkillnerError::MissingArtifacts {
            dir: PathBuf::from("ml/skill-ner-model"),
            missing: vec!["model.safetensors".into(), "tokenizer.json".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("model.safetensors, tokenizer.json"));
        assert!(msg.contains("skill-ner-model"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SkillnerError>();
    }
}
