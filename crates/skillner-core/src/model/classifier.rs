use candle_core::{D, DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config, DistilBertModel};

use crate::error::{Result, SkillnerError};

/// Anything that scores every token of a sequence against the label set.
pub trait TokenClassifier {
    /// Per-token probabilities, `[seq_len][num_labels]`, in token order.
    fn predict(&self, input_ids: &[u32]) -> Result<Vec<Vec<f32>>>;
}

/// DistilBERT encoder with a linear token-classification head.
pub struct DistilBertTokenClassifier {
    distilbert: DistilBertModel,
    classifier: Linear,
    device: Device,
}

impl DistilBertTokenClassifier {
    /// Load the encoder and the `classifier` head from a var builder.
    ///
    /// `hidden_size` is the encoder width (`dim` in `config.json`).
    pub fn load(
        vb: VarBuilder,
        config: &Config,
        hidden_size: usize,
        num_labels: usize,
    ) -> candle_core::Result<Self> {
        let device = vb.device().clone();
        let distilbert = DistilBertModel::load(vb.pp("distilbert"), config)?;
        let classifier = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))?;

        Ok(Self {
            distilbert,
            classifier,
            device,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Raw label scores, `[seq_len, num_labels]`.
    pub fn logits(&self, input_ids: &[u32]) -> Result<Tensor> {
        if input_ids.is_empty() {
            return Err(SkillnerError::EmptyInput);
        }
        let seq_len = input_ids.len();
        let input_ids = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;
        // Non-zero entries are masked out; a single unpadded sequence attends everywhere.
        let mask = Tensor::zeros((seq_len, seq_len), DType::U8, &self.device)?;

        let hidden_states = self.distilbert.forward(&input_ids, &mask)?;
        let logits = self.classifier.forward(&hidden_states)?.squeeze(0)?;
        Ok(logits)
    }
}

impl TokenClassifier for DistilBertTokenClassifier {
    fn predict(&self, input_ids: &[u32]) -> Result<Vec<Vec<f32>>> {
        let logits = self.logits(input_ids)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;
        Ok(probs.to_vec2::<f32>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::loss::masked_token_loss;
    use crate::tagging::bio_tags::IGNORE_INDEX;
    use candle_nn::VarMap;

    fn tiny_classifier() -> DistilBertTokenClassifier {
        let config: Config = serde_json::from_str(
            r#"{"vocab_size": 32, "dim": 8, "n_layers": 1, "n_heads": 2, "hidden_dim": 16,
                "activation": "gelu", "max_position_embeddings": 16,
                "initializer_range": 0.02, "pad_token_id": 0}"#,
        )
        .unwrap();
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        DistilBertTokenClassifier::load(vb, &config, 8, 3).unwrap()
    }

    #[test]
    fn predict_gives_one_distribution_per_token() {
        let classifier = tiny_classifier();
        let rows = classifier.predict(&[2, 5, 7, 3]).unwrap();
        assert_eq!(rows.len(), 4);
        for row in &rows {
            assert_eq!(row.len(), 3);
            assert!((row.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
        assert_eq!(classifier.logits(&[2, 5, 7, 3]).unwrap().dims(), &[4, 3]);
    }

    #[test]
    fn early_tokens_attend_to_later_ones() {
        let classifier = tiny_classifier();
        let a = classifier.predict(&[2, 5, 7, 3]).unwrap();
        let b = classifier.predict(&[2, 5, 19, 3]).unwrap();
        let moved = a[0]
            .iter()
            .zip(&b[0])
            .map(|(x, y)| (x - y).abs())
            .fold(0.0f32, f32::max);
        assert!(moved > 1e-6, "first row unchanged: {:?}", a[0]);
    }

    #[test]
    fn loss_over_logits_is_finite() {
        let classifier = tiny_classifier();
        let logits = classifier.logits(&[2, 5, 7, 3]).unwrap();
        let loss = masked_token_loss(&logits, &[IGNORE_INDEX, 1, 2, IGNORE_INDEX])
            .unwrap()
            .to_scalar::<f32>()
            .unwrap();
        assert!(loss.is_finite() && loss > 0.0);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            tiny_classifier().logits(&[]),
            Err(SkillnerError::EmptyInput)
        ));
    }
}
