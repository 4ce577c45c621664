//! Image Folder Loader
//!
//! Scans a directory tree where each immediate subdirectory is a class name
//! and every file inside it is an image belonging to that class.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

/// File extensions treated as images
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// A single image sample with its label and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSample {
    /// Path to the image file
    pub path: PathBuf,
    /// Class label index
    pub label: usize,
    /// Class name (the subdirectory name)
    pub class_name: String,
}

/// Labeled image dataset backed by a class-per-subdirectory layout
#[derive(Debug)]
pub struct ImageFolderDataset {
    /// Root directory of the dataset
    pub root_dir: PathBuf,
    /// All samples in the dataset
    pub samples: Vec<ImageSample>,
    /// Class names sorted lexicographically; index == label
    pub class_names: Vec<String>,
    /// Mapping from class name to label index
    pub class_to_idx: HashMap<String, usize>,
}

impl ImageFolderDataset {
    /// Create a dataset from a directory
    ///
    /// The directory should be structured as:
    /// ```text
    /// root_dir/
    /// ├── cat/
    /// │   ├── image1.jpg
    /// │   └── image2.jpg
    /// ├── dog/
    /// │   └── ...
    /// └── ...
    /// ```
    ///
    /// Subdirectories without a single image file are skipped, so the label
    /// space covers exactly the classes that have at least one sample.
    pub fn new<P: AsRef<Path>>(root_dir: P) -> Result<Self> {
        let root_dir = root_dir.as_ref().to_path_buf();
        info!("Loading image dataset from: {:?}", root_dir);

        if !root_dir.exists() {
            anyhow::bail!("Dataset directory does not exist: {:?}", root_dir);
        }

        // Discover class directories
        let mut class_dirs: Vec<String> = Vec::new();
        for entry in std::fs::read_dir(&root_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    class_dirs.push(name.to_string());
                }
            }
        }
        class_dirs.sort();

        let mut class_names: Vec<String> = Vec::new();
        let mut samples: Vec<ImageSample> = Vec::new();

        for class_name in &class_dirs {
            let class_dir = root_dir.join(class_name);

            let mut files: Vec<PathBuf> = WalkDir::new(&class_dir)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.path().to_path_buf())
                .filter(|path| {
                    path.extension()
                        .map(|ext| {
                            let ext = ext.to_string_lossy().to_lowercase();
                            IMAGE_EXTENSIONS.contains(&ext.as_str())
                        })
                        .unwrap_or(false)
                })
                .collect();
            files.sort();

            if files.is_empty() {
                debug!("Skipping class '{}': no image files", class_name);
                continue;
            }

            let label = class_names.len();
            for path in files {
                samples.push(ImageSample {
                    path,
                    label,
                    class_name: class_name.clone(),
                });
            }
            class_names.push(class_name.clone());
        }

        if samples.is_empty() {
            anyhow::bail!("No images found under {:?}", root_dir);
        }

        let class_to_idx: HashMap<String, usize> = class_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();

        info!(
            "Loaded {} samples across {} classes",
            samples.len(),
            class_names.len()
        );

        Ok(Self {
            root_dir,
            samples,
            class_names,
            class_to_idx,
        })
    }

    /// Get the number of samples in the dataset
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the number of classes
    pub fn num_classes(&self) -> usize {
        self.class_names.len()
    }

    /// Get statistics about the dataset
    pub fn stats(&self) -> DatasetStats {
        let mut class_counts = vec![0usize; self.num_classes()];
        for sample in &self.samples {
            class_counts[sample.label] += 1;
        }

        DatasetStats {
            total_samples: self.samples.len(),
            num_classes: self.num_classes(),
            class_counts,
            class_names: self.class_names.clone(),
        }
    }
}

/// Statistics about the dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_samples: usize,
    pub num_classes: usize,
    pub class_counts: Vec<usize>,
    pub class_names: Vec<String>,
}

impl DatasetStats {
    /// Print statistics to console
    pub fn print(&self) {
        println!("\nDataset statistics:");
        println!("  Total samples: {}", self.total_samples);
        println!("  Number of classes: {}", self.num_classes);
        println!("\n  Samples per class:");

        for (idx, name) in self.class_names.iter().enumerate() {
            let count = self.class_counts[idx];
            let bar_len = (count as f32 / self.total_samples as f32 * 40.0) as usize;
            let bar: String = "█".repeat(bar_len);
            println!("    {:3}. {:30} {:5} {}", idx, name, count, bar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_image(path: &Path) {
        image::RgbImage::new(8, 8).save(path).unwrap();
    }

    fn fixture(classes: &[(&str, usize)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, count) in classes {
            let class_dir = dir.path().join(name);
            std::fs::create_dir(&class_dir).unwrap();
            for i in 0..*count {
                write_image(&class_dir.join(format!("img{i}.png")));
            }
        }
        dir
    }

    #[test]
    fn test_classes_sorted_and_counted() {
        let dir = fixture(&[("dog", 3), ("cat", 2)]);
        let dataset = ImageFolderDataset::new(dir.path()).unwrap();

        assert_eq!(dataset.class_names, vec!["cat", "dog"]);
        assert_eq!(dataset.num_classes(), 2);
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.class_to_idx["cat"], 0);
        assert_eq!(dataset.class_to_idx["dog"], 1);
    }

    #[test]
    fn test_empty_class_dir_is_skipped() {
        let dir = fixture(&[("cat", 2)]);
        std::fs::create_dir(dir.path().join("empty")).unwrap();

        let dataset = ImageFolderDataset::new(dir.path()).unwrap();
        assert_eq!(dataset.class_names, vec!["cat"]);
        assert_eq!(dataset.num_classes(), 1);
    }

    #[test]
    fn test_non_image_files_ignored() {
        let dir = fixture(&[("cat", 1)]);
        std::fs::write(dir.path().join("cat").join("notes.txt"), "hi").unwrap();

        let dataset = ImageFolderDataset::new(dir.path()).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_missing_directory_errors() {
        assert!(ImageFolderDataset::new("/definitely/not/here").is_err());
    }

    #[test]
    fn test_directory_without_images_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("cat")).unwrap();
        assert!(ImageFolderDataset::new(dir.path()).is_err());
    }

    #[test]
    fn test_stats() {
        let dir = fixture(&[("dog", 3), ("cat", 2)]);
        let stats = ImageFolderDataset::new(dir.path()).unwrap().stats();

        assert_eq!(stats.total_samples, 5);
        assert_eq!(stats.class_counts, vec![2, 3]);
    }
}
