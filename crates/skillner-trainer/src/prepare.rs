//! Turn a skills dataset into token-classification features.
//!
//! Output directory layout:
//! - `train.jsonl`, `test.jsonl`: one [`EncodedExample`] per line
//! - `label_config.json`: `num_labels`/`id2label`/`label2id` to merge into
//!   the trained model's `config.json`
//! - `tokenizer.json`: the tokenizer the features were built with

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use skillner_core::pipeline::{LabelingConfig, LabelingPipeline};
use skillner_core::tagging::spans::resolve_spans;
use skillner_core::tagging::tokenizer::OffsetTokenizer;
use skillner_core::types::{EncodedExample, SkillExample};
use tracing::{info, warn};

use crate::data::{SplitConfig, load_dataset, train_test_split, write_jsonl};

pub const TRAIN_FILE: &str = "train.jsonl";
pub const TEST_FILE: &str = "test.jsonl";
pub const LABEL_CONFIG_FILE: &str = "label_config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Everything a preparation run needs.
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    pub data: PathBuf,
    pub tokenizer: PathBuf,
    pub output: PathBuf,
    pub labeling: LabelingConfig,
    pub split: SplitConfig,
}

/// Counts reported after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareSummary {
    pub train: usize,
    pub test: usize,
    pub failed: usize,
    /// Examples none of whose skills occur in the text
    pub unmatched: usize,
}

/// Encode every example, skipping (and counting) tokenizer failures.
pub fn encode_examples<T: OffsetTokenizer>(
    pipeline: &LabelingPipeline<T>,
    examples: &[SkillExample],
    summary: &mut PrepareSummary,
) -> Vec<EncodedExample> {
    let mut features = Vec::with_capacity(examples.len());

    for (step, example) in examples.iter().enumerate() {
        match pipeline.encode(example) {
            Ok(encoded) => {
                if !example.skills.is_empty()
                    && resolve_spans(&example.text, &example.skills).is_empty()
                {
                    summary.unmatched += 1;
                }
                features.push(encoded);
            }
            Err(e) => {
                warn!(example = step, error = %e, "failed to encode example");
                summary.failed += 1;
            }
        }

        if (step + 1) % 5000 == 0 {
            info!(step = step + 1, total = examples.len(), "encoding");
        }
    }

    features
}

/// Split, encode and write features for `examples`.
pub fn prepare_examples<T: OffsetTokenizer>(
    pipeline: &LabelingPipeline<T>,
    examples: Vec<SkillExample>,
    split: &SplitConfig,
    output: &Path,
) -> Result<PrepareSummary> {
    fs::create_dir_all(output).with_context(|| format!("creating {}", output.display()))?;

    let (train, test) = train_test_split(examples, split);
    let mut summary = PrepareSummary::default();

    let train_features = encode_examples(pipeline, &train, &mut summary);
    let test_features = encode_examples(pipeline, &test, &mut summary);
    summary.train = train_features.len();
    summary.test = test_features.len();

    write_jsonl(output.join(TRAIN_FILE), &train_features)?;
    write_jsonl(output.join(TEST_FILE), &test_features)?;

    let label_config = pipeline.config().vocab.to_label_config();
    fs::write(
        output.join(LABEL_CONFIG_FILE),
        serde_json::to_string_pretty(&label_config)?,
    )?;

    if summary.unmatched > 0 {
        warn!(
            unmatched = summary.unmatched,
            "examples whose skills never occur in their text"
        );
    }
    info!(
        train = summary.train,
        test = summary.test,
        failed = summary.failed,
        output = %output.display(),
        "prepared features"
    );
    Ok(summary)
}

/// Load the dataset and tokenizer named by `config` and prepare features.
pub fn run_prepare(config: &PrepareConfig) -> Result<PrepareSummary> {
    if !config.data.exists() {
        anyhow::bail!("Training data not found: {}", config.data.display());
    }

    let examples = load_dataset(&config.data)?;
    let pipeline = LabelingPipeline::from_tokenizer_file(&config.tokenizer, config.labeling.clone())
        .with_context(|| format!("loading tokenizer {}", config.tokenizer.display()))?;

    let summary = prepare_examples(&pipeline, examples, &config.split, &config.output)?;

    copy_tokenizer(&config.tokenizer, &config.output)?;
    Ok(summary)
}

/// Place `tokenizer` in `output` as `tokenizer.json`.
///
/// Nothing is copied when `tokenizer` already is that file; copying a file
/// onto itself truncates it.
pub fn copy_tokenizer(tokenizer: &Path, output: &Path) -> Result<()> {
    let target = output.join(TOKENIZER_FILE);
    if target.exists() && fs::canonicalize(tokenizer)? == fs::canonicalize(&target)? {
        return Ok(());
    }
    fs::copy(tokenizer, &target)
        .with_context(|| format!("copying tokenizer into {}", output.display()))?;
    Ok(())
}
