//! Reporting
//!
//! Terminal, one-shot rendering of the training outcome: SVG line charts for
//! the loss and accuracy series, and an annotated grid of predicted-label
//! images. Output files are overwritten unconditionally.

pub mod charts;
pub mod grid;

pub use charts::{render_accuracy_chart, render_loss_chart};
pub use grid::render_prediction_grid;
