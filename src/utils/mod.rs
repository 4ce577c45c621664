//! Utilities
//!
//! - `error`: typed errors for the crate's validated surfaces
//! - `logging`: tracing setup and the epoch progress logger

pub mod error;
pub mod logging;

pub use error::{ClassifierError, Result};
pub use logging::{init_logging, LogConfig, TrainingLogger};
