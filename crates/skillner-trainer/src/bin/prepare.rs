//! Feature preparation and evaluation CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use skillner_core::pipeline::LabelingConfig;
use skillner_core::tagging::LabelVocab;
use skillner_core::tagging::tokenizer::DEFAULT_MAX_LENGTH;
use skillner_trainer::data::{DEFAULT_SEED, DEFAULT_TEST_SIZE, SplitConfig};
use skillner_trainer::{PrepareConfig, run_evaluate, run_prepare};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skillner-prepare")]
#[command(about = "Prepare skill NER features and evaluate trained models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a dataset and write token-classification features
    Prepare {
        /// JSONL or CSV file with `text` and `skills`
        #[arg(short, long)]
        data: PathBuf,

        /// Pretrained `tokenizer.json`
        #[arg(short, long)]
        tokenizer: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "ml/skill-ner-model")]
        output: PathBuf,

        /// Maximum sequence length including special tokens
        #[arg(long, env = "SKILLNER_MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
        max_length: usize,

        /// Shuffle seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Held-out fraction
        #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
        test_size: f64,
    },
    /// Score a trained model on prepared features
    Evaluate {
        /// Model directory
        #[arg(short, long, env = "SKILLNER_MODEL", default_value = "ml/skill-ner-model")]
        model: PathBuf,

        /// Features written by `prepare`
        #[arg(short, long)]
        features: PathBuf,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Prepare {
            data,
            tokenizer,
            output,
            max_length,
            seed,
            test_size,
        } => {
            let config = PrepareConfig {
                data,
                tokenizer,
                output,
                labeling: LabelingConfig::new().with_max_length(max_length),
                split: SplitConfig::new().with_test_size(test_size).with_seed(seed),
            };
            let summary = run_prepare(&config)?;
            println!(
                "train={} test={} failed={} unmatched={}",
                summary.train, summary.test, summary.failed, summary.unmatched
            );
        }
        Commands::Evaluate { model, features } => {
            let report = run_evaluate(&model, &features, &LabelVocab::new())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
