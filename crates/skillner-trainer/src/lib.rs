//! # Skillner Trainer
//!
//! Offline workflows around the labeling engine: loading skill-annotated
//! job descriptions, splitting them reproducibly, encoding them into
//! token-classification features and scoring trained classifiers.

pub mod data;
pub mod evaluate;
pub mod prepare;

pub use data::{SplitConfig, load_dataset, read_features, train_test_split, write_jsonl};
pub use evaluate::{EvalReport, evaluate_features, run_evaluate};
pub use prepare::{PrepareConfig, PrepareSummary, prepare_examples, run_prepare};
