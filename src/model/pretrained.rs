//! Pretrained Backbone Weights
//!
//! Fetches the published ImageNet record for the feature extractor from a
//! fixed remote location at startup and loads it into the backbone. The host
//! being unreachable is a fatal startup error; there is no retry policy.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::module::Module;
use burn::record::CompactRecorder;
use burn::tensor::backend::Backend;
use tracing::info;

use crate::model::resnet::ResNet50;
use crate::WEIGHTS_DIR;

/// Remote record holding the ImageNet-trained feature-extractor weights
pub const WEIGHTS_URL: &str =
    "https://huggingface.co/wsnaet/resnet50-burn/resolve/main/resnet50-imagenet.mpk";

/// File name of the cached record
const WEIGHTS_FILE: &str = "resnet50-imagenet.mpk";

/// Download the pretrained record into the cache directory unless it is
/// already present; returns the cached file path
fn fetch_weights(cache_dir: &Path) -> Result<PathBuf> {
    let target = cache_dir.join(WEIGHTS_FILE);
    if target.exists() {
        info!("Using cached pretrained weights at {:?}", target);
        return Ok(target);
    }

    fs::create_dir_all(cache_dir)
        .with_context(|| format!("failed to create weights cache dir {:?}", cache_dir))?;

    info!("Downloading pretrained weights from {}", WEIGHTS_URL);
    let response = reqwest::blocking::get(WEIGHTS_URL)
        .with_context(|| format!("failed to reach pretrained weight host: {WEIGHTS_URL}"))?
        .error_for_status()
        .context("pretrained weight host returned an error status")?;

    let bytes = response
        .bytes()
        .context("failed to read pretrained weight response")?;
    fs::write(&target, &bytes)
        .with_context(|| format!("failed to write pretrained weights to {:?}", target))?;

    info!("Cached pretrained weights at {:?}", target);
    Ok(target)
}

/// Build the backbone, load the pretrained record into it, and freeze it so
/// its parameters are excluded from gradient updates
pub fn load_frozen_backbone<B: Backend>(device: &B::Device) -> Result<ResNet50<B>> {
    let weights = fetch_weights(Path::new(WEIGHTS_DIR))?;

    // The recorder appends its own extension to the path it is given.
    let record_path = weights.with_extension("");
    let backbone = ResNet50::<B>::new(device)
        .load_file(record_path, &CompactRecorder::new(), device)
        .map_err(|e| anyhow::anyhow!("failed to load pretrained record: {e:?}"))?;

    Ok(backbone.no_grad())
}
