//! Train/validation split
//!
//! Partitions the sample list into training and validation subsets with a
//! seeded shuffle, so repeated runs over the same directory produce identical
//! subset membership.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::dataset::loader::ImageSample;
use crate::utils::error::{ClassifierError, Result};
use crate::{SPLIT_SEED, VALIDATION_FRACTION};

/// Configuration for dataset splitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of samples held out for validation
    pub validation_fraction: f64,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            validation_fraction: VALIDATION_FRACTION,
            seed: SPLIT_SEED,
        }
    }
}

impl SplitConfig {
    /// Create a split configuration, validating the fraction
    pub fn new(validation_fraction: f64, seed: u64) -> Result<Self> {
        if !(0.0..1.0).contains(&validation_fraction) {
            return Err(ClassifierError::Config(
                "Validation fraction must be in [0.0, 1.0)".to_string(),
            ));
        }

        Ok(Self {
            validation_fraction,
            seed,
        })
    }
}

/// Training and validation subsets of a labeled dataset
#[derive(Debug, Clone)]
pub struct DatasetSplits {
    /// Samples used for training
    pub training: Vec<ImageSample>,
    /// Samples held out for validation
    pub validation: Vec<ImageSample>,
    /// Shared class-name table (index == label)
    pub class_names: Vec<String>,
    /// Configuration used to create these splits
    pub config: SplitConfig,
}

impl DatasetSplits {
    /// Split a sample list into training and validation subsets
    ///
    /// Samples are shuffled once with a seeded RNG; the first
    /// `floor(n * validation_fraction)` shuffled samples become the
    /// validation subset and the remainder the training subset. Every sample
    /// lands in exactly one subset.
    pub fn from_samples(
        samples: Vec<ImageSample>,
        class_names: Vec<String>,
        config: SplitConfig,
    ) -> Result<Self> {
        if samples.is_empty() {
            return Err(ClassifierError::Dataset(
                "No samples provided for splitting".to_string(),
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut shuffled = samples;
        shuffled.shuffle(&mut rng);

        let n_validation = (shuffled.len() as f64 * config.validation_fraction).floor() as usize;
        let validation: Vec<ImageSample> = shuffled.drain(..n_validation).collect();

        Ok(Self {
            training: shuffled,
            validation,
            class_names,
            config,
        })
    }

    /// Total number of samples across both subsets
    pub fn total(&self) -> usize {
        self.training.len() + self.validation.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn samples(n: usize) -> Vec<ImageSample> {
        (0..n)
            .map(|i| ImageSample {
                path: PathBuf::from(format!("img{i}.jpg")),
                label: i % 2,
                class_name: if i % 2 == 0 { "cat" } else { "dog" }.to_string(),
            })
            .collect()
    }

    fn names() -> Vec<String> {
        vec!["cat".to_string(), "dog".to_string()]
    }

    #[test]
    fn test_fraction_validation() {
        assert!(SplitConfig::new(1.0, 42).is_err());
        assert!(SplitConfig::new(-0.1, 42).is_err());
        assert!(SplitConfig::new(0.2, 42).is_ok());
    }

    #[test]
    fn test_split_sizes() {
        let config = SplitConfig::new(0.2, 123).unwrap();
        let splits = DatasetSplits::from_samples(samples(100), names(), config).unwrap();

        assert_eq!(splits.training.len(), 80);
        assert_eq!(splits.validation.len(), 20);
        assert_eq!(splits.total(), 100);
    }

    #[test]
    fn test_split_is_deterministic() {
        let config = SplitConfig::new(0.2, 123).unwrap();
        let a = DatasetSplits::from_samples(samples(50), names(), config.clone()).unwrap();
        let b = DatasetSplits::from_samples(samples(50), names(), config).unwrap();

        let paths = |set: &[ImageSample]| -> Vec<PathBuf> {
            set.iter().map(|s| s.path.clone()).collect()
        };

        assert_eq!(paths(&a.training), paths(&b.training));
        assert_eq!(paths(&a.validation), paths(&b.validation));
    }

    #[test]
    fn test_subsets_are_disjoint() {
        let config = SplitConfig::new(0.3, 7).unwrap();
        let splits = DatasetSplits::from_samples(samples(40), names(), config).unwrap();

        for sample in &splits.validation {
            assert!(!splits.training.iter().any(|s| s.path == sample.path));
        }
        assert_eq!(splits.total(), 40);
    }

    #[test]
    fn test_empty_input_errors() {
        let result = DatasetSplits::from_samples(Vec::new(), names(), SplitConfig::default());
        assert!(result.is_err());
    }
}
