//! Training
//!
//! - `fit`: the supervised epoch/batch loop updating only the head
//! - `history`: the append-only per-batch loss/accuracy record

pub mod fit;
pub mod history;

// Re-export main types for convenience
pub use fit::{evaluate, fit, FitConfig};
pub use history::{BatchRecord, TrainingHistory};
