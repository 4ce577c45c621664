//! Transfer Classifier
//!
//! Composes the frozen feature extractor with a single trainable linear head
//! mapping embeddings to per-class logits.

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{activation::softmax, backend::Backend, Tensor},
};

use crate::model::resnet::ResNet50;
use crate::FEATURE_DIM;

/// Frozen pretrained backbone with a freshly initialized classification head
#[derive(Module, Debug)]
pub struct TransferClassifier<B: Backend> {
    backbone: ResNet50<B>,
    head: Linear<B>,
    num_classes: usize,
}

impl<B: Backend> TransferClassifier<B> {
    /// Attach a new classification head to a backbone
    ///
    /// The head uses the library's default weight initializer; only its
    /// parameters are updated during training.
    pub fn new(backbone: ResNet50<B>, num_classes: usize, device: &B::Device) -> Self {
        Self {
            backbone,
            head: LinearConfig::new(FEATURE_DIM, num_classes).init(device),
            num_classes,
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `images` - Input tensor of shape [batch_size, 3, height, width]
    ///
    /// # Returns
    /// * Logits tensor of shape [batch_size, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        // Embeddings are detached: gradients stop at the head and never
        // reach the backbone.
        let features = self.backbone.forward(images).detach();
        self.head.forward(features)
    }

    /// Forward pass with softmax for inference
    pub fn forward_softmax(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        softmax(self.forward(images), 1)
    }

    /// Get the number of output classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DefaultBackend;

    #[test]
    fn test_logit_shape() {
        let device = Default::default();
        let backbone = ResNet50::<DefaultBackend>::new(&device);
        let model = TransferClassifier::new(backbone, 5, &device);

        let input = Tensor::<DefaultBackend, 4>::zeros([2, 3, 64, 64], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [2, 5]);
        assert_eq!(model.num_classes(), 5);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let device = Default::default();
        let backbone = ResNet50::<DefaultBackend>::new(&device);
        let model = TransferClassifier::new(backbone, 3, &device);

        let input = Tensor::<DefaultBackend, 4>::zeros([1, 3, 64, 64], &device);
        let probabilities = model.forward_softmax(input);

        let sum: f32 = probabilities.sum().into_scalar();
        assert!((sum - 1.0).abs() < 1e-4);
    }
}
