//! Transfer-learning training pipeline
//!
//! One linear run: load the labeled image directory, split it, fetch the
//! pretrained feature extractor, train the classification head, then render
//! the training curves and a grid of predicted-label images.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::Dataset;
use colored::Colorize;
use tracing::info;

use transfer_classifier::backend::{backend_name, default_device, TrainingBackend};
use transfer_classifier::dataset::folder::{FolderImageDataset, ImageBatcher, ImageItem};
use transfer_classifier::dataset::loader::ImageFolderDataset;
use transfer_classifier::dataset::split::{DatasetSplits, SplitConfig};
use transfer_classifier::inference::predict_batch;
use transfer_classifier::model::classifier::TransferClassifier;
use transfer_classifier::model::pretrained;
use transfer_classifier::report::{charts, grid};
use transfer_classifier::training::fit::{evaluate, fit, FitConfig};
use transfer_classifier::utils::logging::{init_logging, LogConfig};
use transfer_classifier::{
    ACCURACY_CHART_PATH, BATCH_SIZE, DATA_DIR, LOSS_CHART_PATH, PREDICTIONS_PATH,
};

fn main() -> Result<()> {
    init_logging(&LogConfig::default()).map_err(|e| anyhow::anyhow!(e))?;

    println!("{}", "Loading dataset...".cyan().bold());
    println!("  Backend: {}", backend_name());

    let dataset = ImageFolderDataset::new(DATA_DIR)?;
    dataset.stats().print();
    info!("Classes: {:?}", dataset.class_names);

    let splits = DatasetSplits::from_samples(
        dataset.samples.clone(),
        dataset.class_names.clone(),
        SplitConfig::default(),
    )
    .context("failed to split dataset")?;

    println!();
    println!("{}", "Dataset splits:".cyan().bold());
    println!("  Training samples:   {}", splits.training.len());
    println!("  Validation samples: {}", splits.validation.len());

    let to_pairs = |samples: &[transfer_classifier::ImageSample]| -> Vec<(PathBuf, usize)> {
        samples.iter().map(|s| (s.path.clone(), s.label)).collect()
    };
    let train_dataset = FolderImageDataset::new(to_pairs(&splits.training));
    let val_dataset = FolderImageDataset::new(to_pairs(&splits.validation));

    let device = default_device();

    println!();
    println!("{}", "Fetching feature extractor...".cyan().bold());
    let backbone = pretrained::load_frozen_backbone::<TrainingBackend>(&device)
        .context("failed to load pretrained feature extractor")?;

    let num_classes = splits.class_names.len();
    let model = TransferClassifier::new(backbone, num_classes, &device);

    let config = FitConfig::default();
    let (model, history) = fit(model, &train_dataset, &device, &config)?;

    charts::render_loss_chart(&history.losses(), Path::new(LOSS_CHART_PATH))
        .context("failed to render loss chart")?;
    charts::render_accuracy_chart(&history.accuracies(), Path::new(ACCURACY_CHART_PATH))
        .context("failed to render accuracy chart")?;
    info!("Wrote {} and {}", LOSS_CHART_PATH, ACCURACY_CHART_PATH);

    // One held batch of training images for the prediction grid
    let held: Vec<ImageItem> = (0..BATCH_SIZE.min(train_dataset.len()))
        .map(|i| train_dataset.get(i))
        .collect::<Option<Vec<_>>>()
        .context("failed to load images for the prediction grid")?;

    let batcher = ImageBatcher::<TrainingBackend>::new(device.clone());
    let batch = batcher.batch(held.clone(), &device);
    let predictions = predict_batch(&model, batch.images, &splits.class_names)?;
    grid::render_prediction_grid(&held, &predictions, Path::new(PREDICTIONS_PATH))
        .context("failed to render prediction grid")?;
    info!("Wrote {}", PREDICTIONS_PATH);

    let val_accuracy = evaluate(&model, &val_dataset, BATCH_SIZE)?;
    info!(
        "Validation accuracy after training: {:.2}%",
        100.0 * val_accuracy
    );

    println!();
    println!("{}", "Training complete!".green().bold());

    Ok(())
}
