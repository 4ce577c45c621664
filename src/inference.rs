//! Prediction
//!
//! Maps model outputs back to class names: argmax over logits, index into
//! the class-name table.

use anyhow::{Context, Result};
use burn::tensor::{backend::Backend, Tensor};

use crate::model::classifier::TransferClassifier;

/// A single model prediction mapped back to its class name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    /// Index of the predicted class
    pub class_index: usize,
    /// Name of the predicted class
    pub class_name: String,
}

/// Predict the class of every image in a batch
pub fn predict_batch<B: Backend>(
    model: &TransferClassifier<B>,
    images: Tensor<B, 4>,
    class_names: &[String],
) -> Result<Vec<Prediction>> {
    let logits = model.forward(images);
    let indices = logits.argmax(1).flatten::<1>(0, 1);

    let indices: Vec<i64> = indices
        .into_data()
        .to_vec()
        .map_err(|e| anyhow::anyhow!("failed to read prediction indices: {e:?}"))?;

    indices
        .into_iter()
        .map(|idx| {
            let class_index = idx as usize;
            let class_name = class_names
                .get(class_index)
                .cloned()
                .with_context(|| format!("prediction index {class_index} out of range"))?;

            Ok(Prediction {
                class_index,
                class_name,
            })
        })
        .collect()
}
