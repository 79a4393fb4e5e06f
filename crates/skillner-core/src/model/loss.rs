//! Token-classification loss with ignored positions.

use candle_core::{DType, Tensor};

use crate::tagging::bio_tags::IGNORE_INDEX;

/// Mean cross-entropy over the rows of `logits` (`[seq_len, num_labels]`)
/// whose label is not [`IGNORE_INDEX`].
///
/// A sequence with no labeled position has zero loss.
pub fn masked_token_loss(logits: &Tensor, labels: &[i64]) -> candle_core::Result<Tensor> {
    let (seq_len, num_labels) = logits.dims2()?;
    if labels.len() != seq_len {
        candle_core::bail!("{} labels for {} token rows", labels.len(), seq_len);
    }

    let mut rows = Vec::new();
    let mut targets = Vec::new();
    for (row, &label) in labels.iter().enumerate() {
        if label == IGNORE_INDEX {
            continue;
        }
        match u32::try_from(label) {
            Ok(target) if (target as usize) < num_labels => {
                rows.push(row as u32);
                targets.push(target);
            }
            _ => candle_core::bail!("label {label} outside 0..{num_labels}"),
        }
    }

    let device = logits.device();
    if rows.is_empty() {
        return Tensor::zeros((), DType::F32, device);
    }

    let rows = Tensor::new(rows.as_slice(), device)?;
    let targets = Tensor::new(targets.as_slice(), device)?;
    let kept = logits.index_select(&rows, 0)?;
    candle_nn::loss::cross_entropy(&kept, &targets)
}
