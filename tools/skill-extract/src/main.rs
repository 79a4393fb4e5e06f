//! Skill extraction CLI.
//!
//! Reads job descriptions from `--text` or from stdin (one per line) and
//! prints one JSON object per input.

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};
use skillner_core::extractor::{ExtractorConfig, SkillExtractor};
use skillner_core::tagging::EntityGroup;
use skillner_core::tagging::tokenizer::DEFAULT_MAX_LENGTH;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skill-extract")]
#[command(about = "Extract skill mentions from job descriptions")]
#[command(version)]
struct Cli {
    /// Trained model directory
    #[arg(short, long, env = "SKILLNER_MODEL", default_value = "ml/skill-ner-model")]
    model: PathBuf,

    /// Text to analyze; stdin lines are read when absent
    #[arg(short, long)]
    text: Option<String>,

    /// Maximum tokens per input, special tokens included
    #[arg(long, env = "SKILLNER_MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,

    /// Include aggregated entity groups in the output
    #[arg(short, long)]
    entities: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractOutput {
    pub input: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<EntityGroup>>,
    pub error: Option<String>,
}

fn extract_one(extractor: &SkillExtractor, input: &str, with_entities: bool) -> ExtractOutput {
    let result = extractor.extract_entities(input).map(|groups| {
        let skills = skillner_core::tagging::decode_skills(&groups);
        (skills, groups)
    });

    match result {
        Ok((skills, groups)) => ExtractOutput {
            input: input.to_string(),
            skills,
            entities: with_entities.then_some(groups),
            error: None,
        },
        Err(e) => ExtractOutput {
            input: input.to_string(),
            skills: Vec::new(),
            entities: None,
            error: Some(e.to_string()),
        },
    }
}

fn print(output: &ExtractOutput) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(output)?);
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ExtractorConfig::new().with_max_length(cli.max_length);
    let extractor = SkillExtractor::load(&cli.model, &config)?;
    info!(model = %cli.model.display(), "model loaded");

    if let Some(text) = cli.text {
        return print(&extract_one(&extractor, &text, cli.entities));
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        print(&extract_one(&extractor, line, cli.entities))?;
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
