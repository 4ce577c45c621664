//! Error Handling Module
//!
//! Defines the crate's typed error surface. Uses thiserror for ergonomic
//! error definitions; everything here is fatal to the pipeline.

use thiserror::Error;

/// Main error type for the training pipeline
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Error with dataset operations
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error rendering an output artifact
    #[error("Rendering error: {0}")]
    Render(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for pipeline operations
pub type Result<T> = std::result::Result<T, ClassifierError>;
