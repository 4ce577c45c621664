//! Backend selection
//!
//! The pipeline runs on the CPU `NdArray` backend. Swapping in another Burn
//! backend only requires changing these aliases.

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::{Autodiff, NdArray};

/// The backend used for inference
pub type DefaultBackend = NdArray;

/// The autodiff backend used for training
pub type TrainingBackend = Autodiff<DefaultBackend>;

/// Get the device the pipeline allocates tensors on
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

/// Get a human-readable name for the current backend
pub fn backend_name() -> &'static str {
    "NdArray (CPU)"
}
