//! # Transfer Classifier
//!
//! Transfer-learning image classification with the Burn framework: a frozen,
//! pretrained feature extractor feeds a freshly initialized linear head that
//! is trained on a class-per-subdirectory image dataset.
//!
//! The pipeline is a single pass: load the labeled directory, split it
//! deterministically into training and validation subsets, fetch the
//! pretrained backbone, train the head for a fixed number of epochs on
//! cross-entropy, then render loss/accuracy curves and an annotated grid of
//! predicted-label images.
//!
//! ## Modules
//!
//! - `dataset`: directory scanning, deterministic splitting, pixel
//!   normalization, and batching for Burn
//! - `model`: feature-extractor backbone, pretrained weight loading, and the
//!   trainable classification head
//! - `training`: the training loop and the per-batch loss/accuracy history
//! - `inference`: argmax predictions mapped back to class names
//! - `report`: SVG training curves and the prediction grid
//! - `utils`: logging and error types

pub mod backend;
pub mod dataset;
pub mod inference;
pub mod model;
pub mod report;
pub mod training;
pub mod utils;

// Re-export commonly used items for convenience
pub use dataset::folder::{FolderImageDataset, ImageBatch, ImageBatcher, ImageItem};
pub use dataset::loader::{DatasetStats, ImageFolderDataset, ImageSample};
pub use dataset::split::{DatasetSplits, SplitConfig};
pub use inference::Prediction;
pub use model::classifier::TransferClassifier;
pub use model::resnet::ResNet50;
pub use training::fit::FitConfig;
pub use training::history::{BatchRecord, TrainingHistory};
pub use utils::error::{ClassifierError, Result};

/// Square edge length every image is resized to before batching
pub const IMAGE_SIZE: usize = 224;

/// Number of samples per training batch
pub const BATCH_SIZE: usize = 32;

/// Fixed number of passes over the training subset
pub const NUM_EPOCHS: usize = 100;

/// Fraction of samples held out for validation
pub const VALIDATION_FRACTION: f64 = 0.2;

/// Seed of the shuffle that decides subset membership
pub const SPLIT_SEED: u64 = 123;

/// Adam learning rate for the classification head
pub const LEARNING_RATE: f64 = 1e-3;

/// Length of the embedding vector produced by the feature extractor
pub const FEATURE_DIM: usize = 2048;

/// Root directory scanned for class subdirectories
pub const DATA_DIR: &str = "data";

/// Cache directory for downloaded pretrained weights
pub const WEIGHTS_DIR: &str = "weights";

/// Output path of the loss curve
pub const LOSS_CHART_PATH: &str = "loss.svg";

/// Output path of the accuracy curve
pub const ACCURACY_CHART_PATH: &str = "accuracy.svg";

/// Output path of the annotated prediction grid
pub const PREDICTIONS_PATH: &str = "predictions.svg";

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
