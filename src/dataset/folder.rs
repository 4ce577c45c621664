//! Burn Dataset Integration
//!
//! Implements Burn's `Dataset` trait and a `Batcher` over the sample list.
//! Items are decoded and normalized lazily on first access and retained in an
//! in-memory cache, so epochs after the first skip the redundant decode work.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::Dataset;
use burn::prelude::*;
use image::ImageReader;
use serde::{Deserialize, Serialize};

use crate::dataset::normalize;
use crate::IMAGE_SIZE;

/// A single image ready for batching
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageItem {
    /// Image data as a flattened CHW float array, values in [0.0, 1.0]
    pub pixels: Vec<f32>,
    /// Class label
    pub label: usize,
    /// Image path (for debugging/logging)
    pub path: String,
}

impl ImageItem {
    /// Create an item by decoding, resizing and normalizing an image file
    pub fn from_path(path: &PathBuf, label: usize) -> anyhow::Result<Self> {
        let image = ImageReader::open(path)?.decode()?;

        Ok(Self {
            pixels: normalize::to_chw_floats(&image),
            label,
            path: path.to_string_lossy().to_string(),
        })
    }

    /// Create from pre-loaded pixel data
    pub fn from_data(pixels: Vec<f32>, label: usize, path: String) -> Self {
        Self {
            pixels,
            label,
            path,
        }
    }
}

/// Image dataset over (path, label) pairs with a decode-once cache
#[derive(Clone)]
pub struct FolderImageDataset {
    /// List of (image_path, label) pairs
    samples: Vec<(PathBuf, usize)>,
    /// Items decoded so far; slot filled on first access
    cache: Arc<RwLock<Vec<Option<ImageItem>>>>,
}

impl std::fmt::Debug for FolderImageDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderImageDataset")
            .field("len", &self.samples.len())
            .finish()
    }
}

impl FolderImageDataset {
    /// Create a new dataset from a list of samples
    pub fn new(samples: Vec<(PathBuf, usize)>) -> Self {
        let cache = Arc::new(RwLock::new(vec![None; samples.len()]));
        Self { samples, cache }
    }

    /// Get the number of classes in the dataset
    pub fn num_classes(&self) -> usize {
        self.samples
            .iter()
            .map(|(_, label)| *label)
            .max()
            .map(|m| m + 1)
            .unwrap_or(0)
    }

    /// Get samples per class count
    pub fn class_distribution(&self) -> Vec<usize> {
        let num_classes = self.num_classes();
        let mut counts = vec![0usize; num_classes];
        for (_, label) in &self.samples {
            if *label < num_classes {
                counts[*label] += 1;
            }
        }
        counts
    }
}

impl Dataset<ImageItem> for FolderImageDataset {
    fn get(&self, index: usize) -> Option<ImageItem> {
        if index >= self.samples.len() {
            return None;
        }

        if let Ok(cache) = self.cache.read() {
            if let Some(Some(item)) = cache.get(index) {
                return Some(item.clone());
            }
        }

        let (path, label) = &self.samples[index];
        let item = ImageItem::from_path(path, *label).ok()?;

        if let Ok(mut cache) = self.cache.write() {
            cache[index] = Some(item.clone());
        }

        Some(item)
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

/// A batch of images for training or inference
#[derive(Clone, Debug)]
pub struct ImageBatch<B: Backend> {
    /// Batch of images with shape [batch_size, 3, height, width]
    pub images: Tensor<B, 4>,
    /// Batch of labels with shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Batcher that stacks items into image/target tensors
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    #[allow(dead_code)]
    device: B::Device,
    image_size: usize,
}

impl<B: Backend> ImageBatcher<B> {
    /// Create a new batcher for the given device
    pub fn new(device: B::Device) -> Self {
        Self {
            device,
            image_size: IMAGE_SIZE,
        }
    }
}

impl<B: Backend> Batcher<B, ImageItem, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageItem>, device: &B::Device) -> ImageBatch<B> {
        let batch_size = items.len();
        let channels = 3;
        let height = self.image_size;
        let width = self.image_size;

        // Values stay in [0, 1]; the rescale in `normalize` is the whole
        // normalization contract for this pipeline.
        let images_data: Vec<f32> = items.iter().flat_map(|item| item.pixels.clone()).collect();
        let images = Tensor::<B, 4>::from_floats(
            TensorData::new(images_data, [batch_size, channels, height, width]),
            device,
        );

        let targets_data: Vec<i64> = items.iter().map(|item| item.label as i64).collect();
        let targets =
            Tensor::<B, 1, Int>::from_data(TensorData::new(targets_data, [batch_size]), device);

        ImageBatch { images, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DefaultBackend;

    fn fixture(count: usize) -> (tempfile::TempDir, Vec<(PathBuf, usize)>) {
        let dir = tempfile::tempdir().unwrap();
        let mut samples = Vec::new();
        for i in 0..count {
            let path = dir.path().join(format!("img{i}.png"));
            image::RgbImage::from_pixel(8, 8, image::Rgb([i as u8 * 40, 0, 0]))
                .save(&path)
                .unwrap();
            samples.push((path, i % 2));
        }
        (dir, samples)
    }

    #[test]
    fn test_item_from_data() {
        let pixels = vec![0.5f32; 3 * IMAGE_SIZE * IMAGE_SIZE];
        let item = ImageItem::from_data(pixels, 3, "test.jpg".to_string());

        assert_eq!(item.label, 3);
        assert_eq!(item.pixels.len(), 3 * IMAGE_SIZE * IMAGE_SIZE);
    }

    #[test]
    fn test_lazy_load_and_cache() {
        let (_dir, samples) = fixture(3);
        let dataset = FolderImageDataset::new(samples);

        assert_eq!(dataset.len(), 3);

        let first = dataset.get(1).unwrap();
        assert_eq!(first.label, 1);
        assert!(first.pixels.iter().all(|p| (0.0..=1.0).contains(p)));

        // Second access comes from the cache and matches the first
        let second = dataset.get(1).unwrap();
        assert_eq!(first.pixels, second.pixels);
        assert!(dataset.cache.read().unwrap()[1].is_some());
        assert!(dataset.cache.read().unwrap()[0].is_none());
    }

    #[test]
    fn test_out_of_range_returns_none() {
        let (_dir, samples) = fixture(2);
        let dataset = FolderImageDataset::new(samples);
        assert!(dataset.get(2).is_none());
    }

    #[test]
    fn test_class_distribution() {
        let dataset = FolderImageDataset::new(vec![
            (PathBuf::from("a.jpg"), 0),
            (PathBuf::from("b.jpg"), 0),
            (PathBuf::from("c.jpg"), 1),
            (PathBuf::from("d.jpg"), 2),
        ]);

        assert_eq!(dataset.num_classes(), 3);
        assert_eq!(dataset.class_distribution(), vec![2, 1, 1]);
    }

    #[test]
    fn test_batch_shapes() {
        let device = Default::default();
        let batcher = ImageBatcher::<DefaultBackend>::new(device);

        let items: Vec<ImageItem> = (0..5)
            .map(|i| {
                ImageItem::from_data(
                    vec![0.25f32; 3 * IMAGE_SIZE * IMAGE_SIZE],
                    i,
                    format!("img{i}.jpg"),
                )
            })
            .collect();

        let batch = batcher.batch(items, &Default::default());

        assert_eq!(batch.images.dims(), [5, 3, IMAGE_SIZE, IMAGE_SIZE]);
        assert_eq!(batch.targets.dims(), [5]);
    }
}
