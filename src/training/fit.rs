//! Supervised Training Loop
//!
//! Runs a fixed number of epochs over the training subset with a custom
//! batch loop: forward through the frozen backbone and the head, sparse
//! cross-entropy on logits, Adam updates applied to the head parameters
//! (the only ones carrying gradients).

use anyhow::{anyhow, Result};
use burn::{
    data::dataloader::batcher::Batcher,
    data::dataset::Dataset,
    module::AutodiffModule,
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, GradientsParams, Optimizer},
    tensor::{backend::AutodiffBackend, backend::Backend, ElementConversion, Int, Tensor},
};
use colored::Colorize;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::dataset::folder::{FolderImageDataset, ImageBatcher, ImageItem};
use crate::model::classifier::TransferClassifier;
use crate::training::history::TrainingHistory;
use crate::utils::logging::TrainingLogger;
use crate::{BATCH_SIZE, LEARNING_RATE, NUM_EPOCHS, SPLIT_SEED};

/// Fixed-schedule training parameters
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Number of passes over the training subset
    pub epochs: usize,
    /// Samples per batch
    pub batch_size: usize,
    /// Adam learning rate
    pub learning_rate: f64,
    /// Seed for the per-epoch index shuffle
    pub seed: u64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            epochs: NUM_EPOCHS,
            batch_size: BATCH_SIZE,
            learning_rate: LEARNING_RATE,
            seed: SPLIT_SEED,
        }
    }
}

/// Train the classification head for a fixed number of epochs
///
/// Records one (loss, accuracy) sample per processed batch; the accuracy is
/// that batch's own, not a running mean. Returns the trained model together
/// with the full history.
pub fn fit<B: AutodiffBackend>(
    mut model: TransferClassifier<B>,
    train_dataset: &FolderImageDataset,
    device: &B::Device,
    config: &FitConfig,
) -> Result<(TransferClassifier<B>, TrainingHistory)> {
    let batcher = ImageBatcher::<B>::new(device.clone());
    let mut optimizer = AdamConfig::new().init();
    let mut history = TrainingHistory::new();
    let mut epoch_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut logger = TrainingLogger::new(config.epochs);

    let num_batches = train_dataset.len().div_ceil(config.batch_size);

    println!("{}", "Starting training...".green().bold());

    for epoch in 0..config.epochs {
        logger.start_epoch(epoch);

        let mut indices: Vec<usize> = (0..train_dataset.len()).collect();
        indices.shuffle(&mut epoch_rng);

        let mut epoch_loss = 0.0f64;
        let mut epoch_correct = 0usize;
        let mut epoch_total = 0usize;

        for (batch_idx, chunk) in indices.chunks(config.batch_size).enumerate() {
            let items = load_items(train_dataset, chunk)?;
            let batch = batcher.batch(items, device);

            // Forward pass
            let output = model.forward(batch.images.clone());

            // Sparse categorical cross-entropy over logits
            let loss = CrossEntropyLossConfig::new()
                .init(&output.device())
                .forward(output.clone(), batch.targets.clone());

            let loss_value: f64 = loss.clone().into_scalar().elem();
            let batch_total = batch.targets.dims()[0];
            let batch_correct = count_correct(output, batch.targets.clone());
            let batch_accuracy = batch_correct as f64 / batch_total as f64;

            history.record(loss_value, batch_accuracy);

            epoch_loss += loss_value;
            epoch_correct += batch_correct;
            epoch_total += batch_total;

            // Backward pass and head update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optimizer.step(config.learning_rate, model, grads);

            if (batch_idx + 1) % 10 == 0 || batch_idx + 1 == num_batches {
                debug!(
                    "  Batch {}/{}: loss = {:.4}, acc = {:.2}%",
                    batch_idx + 1,
                    num_batches,
                    loss_value,
                    100.0 * batch_accuracy
                );
            }
        }

        let avg_loss = epoch_loss / num_batches.max(1) as f64;
        let epoch_accuracy = epoch_correct as f64 / epoch_total.max(1) as f64;
        logger.end_epoch(avg_loss, epoch_accuracy);
    }

    logger.log_complete();

    Ok((model, history))
}

/// Accuracy of the trained model over a dataset, on the inference backend
pub fn evaluate<B: AutodiffBackend>(
    model: &TransferClassifier<B>,
    dataset: &FolderImageDataset,
    batch_size: usize,
) -> Result<f64> {
    let device = <B::InnerBackend as Backend>::Device::default();
    let batcher = ImageBatcher::<B::InnerBackend>::new(device.clone());
    let inner_model = model.clone().valid();

    let len = dataset.len();
    let mut correct = 0usize;
    let mut total = 0usize;

    for start in (0..len).step_by(batch_size) {
        let end = (start + batch_size).min(len);
        let indices: Vec<usize> = (start..end).collect();
        let items = load_items(dataset, &indices)?;

        let batch = batcher.batch(items, &device);
        let output = inner_model.forward(batch.images);

        correct += count_correct(output, batch.targets);
        total += end - start;
    }

    if total == 0 {
        Ok(0.0)
    } else {
        Ok(correct as f64 / total as f64)
    }
}

/// Pull a chunk of items out of the dataset, failing on any decode error
fn load_items(dataset: &FolderImageDataset, indices: &[usize]) -> Result<Vec<ImageItem>> {
    indices
        .iter()
        .map(|&i| {
            dataset
                .get(i)
                .ok_or_else(|| anyhow!("failed to decode sample {i}"))
        })
        .collect()
}

/// Count how many argmax predictions match the targets
fn count_correct<B: Backend>(output: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    let predictions = output.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predictions.equal(targets).int().sum().into_scalar().elem();
    correct as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DefaultBackend;
    use burn::tensor::TensorData;

    #[test]
    fn test_fit_config_defaults() {
        let config = FitConfig::default();
        assert_eq!(config.epochs, NUM_EPOCHS);
        assert_eq!(config.batch_size, BATCH_SIZE);
        assert_eq!(config.seed, SPLIT_SEED);
    }

    #[test]
    fn test_batch_partitioning() {
        // 80 samples at batch size 32 give batches of 32, 32 and 16; every
        // batch is non-empty and at most the configured size.
        let indices: Vec<usize> = (0..80).collect();
        let sizes: Vec<usize> = indices.chunks(BATCH_SIZE).map(|c| c.len()).collect();

        assert_eq!(sizes, vec![32, 32, 16]);
        assert!(sizes.iter().all(|&s| s > 0 && s <= BATCH_SIZE));
    }

    #[test]
    fn test_count_correct() {
        let device = Default::default();

        // Rows argmax to classes 1, 0, 2; targets are 1, 1, 2.
        let logits = Tensor::<DefaultBackend, 2>::from_floats(
            TensorData::new(
                vec![0.1f32, 0.8, 0.1, 0.9, 0.05, 0.05, 0.0, 0.2, 0.8],
                [3, 3],
            ),
            &device,
        );
        let targets = Tensor::<DefaultBackend, 1, Int>::from_data(
            TensorData::new(vec![1i64, 1, 2], [3]),
            &device,
        );

        assert_eq!(count_correct(logits, targets), 2);
    }
}
