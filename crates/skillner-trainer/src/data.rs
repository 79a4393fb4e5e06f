//! Data loading for skill-labeled job descriptions and prepared features.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skillner_core::types::{EncodedExample, SkillExample, parse_skill_str};
use tracing::{info, warn};

/// Default fraction of examples held out for evaluation.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;
/// Default shuffle seed.
pub const DEFAULT_SEED: u64 = 42;

/// A CSV row; `skills` is always a string there.
#[derive(Debug, Deserialize)]
struct CsvRow {
    text: String,
    #[serde(default)]
    skills: String,
}

/// Load a dataset, choosing the format from the file extension.
///
/// `.csv` files are read as CSV with `text` and `skills` columns; anything
/// else is read as JSON lines.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<SkillExample>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let examples = if is_csv {
        load_csv(path)?
    } else {
        load_jsonl(path)?
    };
    info!(path = %path.display(), examples = examples.len(), "loaded dataset");
    Ok(examples)
}

/// Load JSON lines of `{"text": ..., "skills": ...}`. Malformed lines are skipped.
pub fn load_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<SkillExample>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut examples = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<SkillExample>(line) {
            Ok(example) => examples.push(example),
            Err(e) => warn!(line = lineno + 1, error = %e, "skipping malformed example"),
        }
    }

    Ok(examples)
}

/// Load a CSV file with a header row containing `text` and `skills`.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<SkillExample>> {
    let path = path.as_ref();
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;

    let mut examples = Vec::new();
    for (row, record) in reader.deserialize::<CsvRow>().enumerate() {
        match record {
            Ok(CsvRow { text, skills }) => {
                examples.push(SkillExample::new(text, parse_skill_str(&skills)))
            }
            Err(e) => warn!(row = row + 1, error = %e, "skipping malformed row"),
        }
    }

    Ok(examples)
}

/// Train/test split parameters.
#[derive(Debug, Clone, Copy)]
pub struct SplitConfig {
    /// Fraction of examples held out, in `[0, 1]`
    pub test_size: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SEED,
        }
    }
}

impl SplitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Shuffle with the configured seed and split into `(train, test)`.
///
/// The test side gets `ceil(len * test_size)` examples. The same seed
/// always yields the same split.
pub fn train_test_split<T>(items: Vec<T>, config: &SplitConfig) -> (Vec<T>, Vec<T>) {
    let total = items.len();
    let mut order: Vec<usize> = (0..total).collect();
    let mut rng = oorandom::Rand64::new(u128::from(config.seed));
    for i in (1..total).rev() {
        let j = rng.rand_range(0..(i as u64 + 1)) as usize;
        order.swap(i, j);
    }

    let test_count = ((total as f64) * config.test_size).ceil() as usize;
    let test_count = test_count.min(total);

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut take = |idx: &usize| slots[*idx].take();
    let test: Vec<T> = order[..test_count].iter().filter_map(&mut take).collect();
    let train: Vec<T> = order[test_count..].iter().filter_map(&mut take).collect();
    (train, test)
}

/// Write one JSON document per line.
pub fn write_jsonl<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Read prepared features written by [`write_jsonl`].
pub fn read_features<P: AsRef<Path>>(path: P) -> Result<Vec<EncodedExample>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let mut features = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let feature: EncodedExample = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", path.display(), lineno + 1))?;
        features.push(feature);
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_jsonl_all_encodings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skills.jsonl");
        std::fs::write(
            &path,
            concat!(
                "{\"text\": \"We need React and AWS.\", \"skills\": [\"React\",\"AWS\"]}\n",
                "\n",
                "{\"text\": \"Go or Rust\", \"skills\": \"Go;Rust\"}\n",
                "not json\n",
                "{\"text\": \"SQL\", \"skills\": \"[\\\"SQL\\\"]\"}\n",
            ),
        )
        .unwrap();

        let examples = load_dataset(&path).unwrap();
        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0].skills, vec!["React", "AWS"]);
        assert_eq!(examples[1].skills, vec!["Go", "Rust"]);
        assert_eq!(examples[2].skills, vec!["SQL"]);
    }

    #[test]
    fn test_load_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skills.CSV");
        std::fs::write(
            &path,
            "text,skills\n\"Docker, Kubernetes and Helm\",\"Docker, Kubernetes,Helm\"\nPython only,Python\n",
        )
        .unwrap();

        let examples = load_dataset(&path).unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].text, "Docker, Kubernetes and Helm");
        assert_eq!(examples[0].skills, vec!["Docker", "Kubernetes", "Helm"]);
        assert_eq!(examples[1].skills, vec!["Python"]);
    }

    #[test]
    fn test_split_sizes_and_determinism() {
        let items: Vec<u32> = (0..10).collect();
        let config = SplitConfig::new();
        let (train, test) = train_test_split(items.clone(), &config);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let (train2, test2) = train_test_split(items.clone(), &config);
        assert_eq!((train.clone(), test.clone()), (train2, test2));

        let mut all: Vec<u32> = train.into_iter().chain(test).collect();
        all.sort();
        assert_eq!(all, items);
    }

    #[test]
    fn test_split_edges() {
        let (train, test) = train_test_split(Vec::<u8>::new(), &SplitConfig::new());
        assert!(train.is_empty() && test.is_empty());

        let (train, test) = train_test_split(vec![1, 2, 3], &SplitConfig::new().with_test_size(0.0));
        assert_eq!(train.len(), 3);
        assert!(test.is_empty());

        let (train, test) = train_test_split(vec![1, 2, 3], &SplitConfig::new().with_test_size(0.5));
        assert_eq!((train.len(), test.len()), (1, 2));
    }

    #[test]
    fn test_features_roundtrip_through_jsonl() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.jsonl");
        let features = vec![EncodedExample {
            input_ids: vec![101, 2000, 102],
            attention_mask: vec![1, 1, 1],
            labels: vec![-100, 1, -100],
        }];
        write_jsonl(&path, &features).unwrap();
        assert_eq!(read_features(&path).unwrap(), features);
    }
}
