//! Residual Feature Extractor
//!
//! The 50-layer residual network used as the embedding backbone, built from
//! Burn's `nn` modules. The classifier consumes it as a black-box function
//! from normalized image batches to fixed-length embedding vectors; the
//! architecture exists here so the published pretrained record can be loaded
//! into it.

use burn::{
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

/// Blocks per stage in the 50-layer variant
const STAGE_BLOCKS: [usize; 4] = [3, 4, 6, 3];

/// Channel expansion of a bottleneck block
const EXPANSION: usize = 4;

/// A convolution followed by batch normalization
#[derive(Module, Debug)]
pub struct ConvNorm<B: Backend> {
    conv: Conv2d<B>,
    bn: BatchNorm<B, 2>,
}

impl<B: Backend> ConvNorm<B> {
    fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        device: &B::Device,
    ) -> Self {
        let padding = kernel_size / 2;
        let conv = Conv2dConfig::new([in_channels, out_channels], [kernel_size, kernel_size])
            .with_stride([stride, stride])
            .with_padding(PaddingConfig2d::Explicit(padding, padding))
            .with_bias(false)
            .init(device);
        let bn = BatchNormConfig::new(out_channels).init(device);

        Self { conv, bn }
    }

    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.bn.forward(self.conv.forward(x))
    }
}

/// Bottleneck residual block: 1x1 reduce, 3x3 spatial, 1x1 expand,
/// with a projection shortcut whenever the shape changes
#[derive(Module, Debug)]
pub struct Bottleneck<B: Backend> {
    reduce: ConvNorm<B>,
    spatial: ConvNorm<B>,
    expand: ConvNorm<B>,
    shortcut: Option<ConvNorm<B>>,
    relu: Relu,
}

impl<B: Backend> Bottleneck<B> {
    fn new(in_channels: usize, width: usize, stride: usize, device: &B::Device) -> Self {
        let out_channels = width * EXPANSION;

        let shortcut = (stride != 1 || in_channels != out_channels)
            .then(|| ConvNorm::new(in_channels, out_channels, 1, stride, device));

        Self {
            reduce: ConvNorm::new(in_channels, width, 1, 1, device),
            spatial: ConvNorm::new(width, width, 3, stride, device),
            expand: ConvNorm::new(width, out_channels, 1, 1, device),
            shortcut,
            relu: Relu::new(),
        }
    }

    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let identity = match &self.shortcut {
            Some(projection) => projection.forward(x.clone()),
            None => x.clone(),
        };

        let y = self.relu.forward(self.reduce.forward(x));
        let y = self.relu.forward(self.spatial.forward(y));
        let y = self.expand.forward(y);

        self.relu.forward(y.add(identity))
    }
}

/// 50-layer residual feature extractor
///
/// Maps a normalized image batch [batch_size, 3, H, W] to an embedding batch
/// [batch_size, 2048].
#[derive(Module, Debug)]
pub struct ResNet50<B: Backend> {
    stem: ConvNorm<B>,
    relu: Relu,
    pool: MaxPool2d,
    layer1: Vec<Bottleneck<B>>,
    layer2: Vec<Bottleneck<B>>,
    layer3: Vec<Bottleneck<B>>,
    layer4: Vec<Bottleneck<B>>,
    avgpool: AdaptiveAvgPool2d,
}

impl<B: Backend> ResNet50<B> {
    /// Create the backbone with freshly initialized weights
    pub fn new(device: &B::Device) -> Self {
        let stem = ConvNorm::new(3, 64, 7, 2, device);
        let pool = MaxPool2dConfig::new([3, 3])
            .with_strides([2, 2])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init();

        let layer1 = Self::make_stage(64, 64, 1, STAGE_BLOCKS[0], device);
        let layer2 = Self::make_stage(64 * EXPANSION, 128, 2, STAGE_BLOCKS[1], device);
        let layer3 = Self::make_stage(128 * EXPANSION, 256, 2, STAGE_BLOCKS[2], device);
        let layer4 = Self::make_stage(256 * EXPANSION, 512, 2, STAGE_BLOCKS[3], device);

        Self {
            stem,
            relu: Relu::new(),
            pool,
            layer1,
            layer2,
            layer3,
            layer4,
            avgpool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
        }
    }

    fn make_stage(
        in_channels: usize,
        width: usize,
        stride: usize,
        blocks: usize,
        device: &B::Device,
    ) -> Vec<Bottleneck<B>> {
        let mut stage = Vec::with_capacity(blocks);
        stage.push(Bottleneck::new(in_channels, width, stride, device));
        for _ in 1..blocks {
            stage.push(Bottleneck::new(width * EXPANSION, width, 1, device));
        }
        stage
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `x` - Input tensor of shape [batch_size, 3, height, width]
    ///
    /// # Returns
    /// * Embedding tensor of shape [batch_size, 2048]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.relu.forward(self.stem.forward(x));
        let mut x = self.pool.forward(x);

        for block in &self.layer1 {
            x = block.forward(x);
        }
        for block in &self.layer2 {
            x = block.forward(x);
        }
        for block in &self.layer3 {
            x = block.forward(x);
        }
        for block in &self.layer4 {
            x = block.forward(x);
        }

        // Global pooling: [B, C, H, W] -> [B, C, 1, 1] -> [B, C]
        let x = self.avgpool.forward(x);
        let [batch_size, channels, _, _] = x.dims();
        x.reshape([batch_size, channels])
    }
}
