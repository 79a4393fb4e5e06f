//! Score a trained classifier on prepared features.

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{D, Device};
use serde::Serialize;
use skillner_core::metrics::{Metrics, MetricsAccumulator};
use skillner_core::model::{
    DistilBertTokenClassifier, ModelArtifact, TokenClassifier, masked_token_loss,
};
use skillner_core::tagging::LabelVocab;
use skillner_core::tagging::decoder::argmax;
use skillner_core::types::EncodedExample;
use tracing::info;

use crate::data::read_features;

/// Metrics plus the mean masked loss over the evaluated features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvalReport {
    #[serde(flatten)]
    pub metrics: Metrics,
    pub loss: Option<f32>,
    pub examples: usize,
}

/// Argmax label id of every token.
pub fn predict_ids<C: TokenClassifier>(classifier: &C, input_ids: &[u32]) -> Result<Vec<i64>> {
    let scores = classifier.predict(input_ids)?;
    Ok(scores.iter().map(|row| argmax(row).0 as i64).collect())
}

/// Entity-level metrics of `classifier` over `features`.
///
/// Empty features carry no tokens and are skipped.
pub fn evaluate_features<C: TokenClassifier>(
    classifier: &C,
    features: &[EncodedExample],
    vocab: &LabelVocab,
) -> Result<Metrics> {
    let mut acc = MetricsAccumulator::new();
    for feature in features.iter().filter(|f| !f.is_empty()) {
        let predicted = predict_ids(classifier, &feature.input_ids)?;
        acc.add(&feature.labels, &predicted, vocab);
    }
    Ok(acc.finish())
}

/// Metrics and mean masked loss from one forward pass per feature.
pub fn evaluate_model(
    classifier: &DistilBertTokenClassifier,
    features: &[EncodedExample],
    vocab: &LabelVocab,
) -> Result<EvalReport> {
    let mut acc = MetricsAccumulator::new();
    let mut total = 0.0f32;
    let mut counted = 0usize;

    for feature in features.iter().filter(|f| !f.is_empty()) {
        let logits = classifier.logits(&feature.input_ids)?;
        let predicted: Vec<i64> = logits
            .argmax(D::Minus1)?
            .to_vec1::<u32>()?
            .into_iter()
            .map(i64::from)
            .collect();
        acc.add(&feature.labels, &predicted, vocab);

        total += masked_token_loss(&logits, &feature.labels)?.to_scalar::<f32>()?;
        counted += 1;
    }

    Ok(EvalReport {
        metrics: acc.finish(),
        loss: (counted > 0).then(|| total / counted as f32),
        examples: features.len(),
    })
}

/// Evaluate the model in `model_dir` on the features in `features_path`.
pub fn run_evaluate(model_dir: &Path, features_path: &Path, vocab: &LabelVocab) -> Result<EvalReport> {
    let artifact = ModelArtifact::locate(model_dir)?;
    let classifier = artifact
        .load_classifier(vocab, &Device::Cpu)
        .context("loading token classifier")?;
    let features = read_features(features_path)?;

    let report = evaluate_model(&classifier, &features, vocab)?;
    info!(
        examples = report.examples,
        f1 = report.metrics.f1,
        precision = report.metrics.precision,
        recall = report.metrics.recall,
        accuracy = report.metrics.accuracy,
        "evaluation complete"
    );
    Ok(report)
}
