//! Discriminator (critic) network for WGAN-GP
//!
//! The critic scores images with unbounded real values rather than
//! classifying them; there is no final activation, per WGAN theory.
//! Architecture uses strided 2D convolutions to downsample followed by
//! global average pooling.

use tch::{nn, nn::Module, nn::ModuleT, Tensor};

use super::leaky_relu;

/// Discriminator network configuration
#[derive(Debug, Clone)]
pub struct DiscriminatorConfig {
    /// Number of input image channels (3 for RGB)
    pub image_channels: i64,
    /// Number of filters in the first convolution block
    pub base_filters: i64,
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self {
            image_channels: 3,
            base_filters: 64,
        }
    }
}

/// Discriminator (critic) network
///
/// Architecture:
/// 1. Four stride-2 Conv2d blocks with LeakyReLU(0.2) activations,
///    channel progression base -> 2x -> 4x -> 8x (64 -> 128 -> 256 -> 512
///    with the default configuration)
/// 2. Final Conv2d to 1 channel, no activation
/// 3. Global average pool over spatial dimensions -> one score per sample
#[derive(Debug)]
pub struct Discriminator {
    config: DiscriminatorConfig,
    /// Downsampling convolution layers
    conv1: nn::Conv2D,
    conv2: nn::Conv2D,
    conv3: nn::Conv2D,
    conv4: nn::Conv2D,
    /// Final projection to a single score map
    conv_out: nn::Conv2D,
}

impl Discriminator {
    /// Create a new Discriminator network
    pub fn new(vs: &nn::Path, config: DiscriminatorConfig) -> Self {
        let base = config.base_filters;

        let down_config = nn::ConvConfig {
            stride: 2,
            padding: 1,
            ..Default::default()
        };

        let conv1 = nn::conv2d(vs / "conv1", config.image_channels, base, 3, down_config);
        let conv2 = nn::conv2d(vs / "conv2", base, base * 2, 3, down_config);
        let conv3 = nn::conv2d(vs / "conv3", base * 2, base * 4, 3, down_config);
        let conv4 = nn::conv2d(vs / "conv4", base * 4, base * 8, 3, down_config);

        let out_config = nn::ConvConfig {
            stride: 1,
            padding: 1,
            ..Default::default()
        };
        let conv_out = nn::conv2d(vs / "conv_out", base * 8, 1, 3, out_config);

        Self {
            config,
            conv1,
            conv2,
            conv3,
            conv4,
            conv_out,
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    ///
    /// * `input` - Tensor of shape (batch_size, image_channels, h, w)
    /// * `train` - Whether in training mode
    ///
    /// # Returns
    ///
    /// Tensor of shape (batch_size, 1) with unbounded critic scores
    pub fn forward_t(&self, input: &Tensor, _train: bool) -> Tensor {
        let x = self.conv1.forward(input);
        let x = leaky_relu(&x, 0.2);

        let x = self.conv2.forward(&x);
        let x = leaky_relu(&x, 0.2);

        let x = self.conv3.forward(&x);
        let x = leaky_relu(&x, 0.2);

        let x = self.conv4.forward(&x);
        let x = leaky_relu(&x, 0.2);

        let x = self.conv_out.forward(&x);

        // Global average pool collapses whatever spatial size remains
        x.mean_dim(&[2i64, 3][..], false, tch::Kind::Float)
    }

    /// Score samples (inference mode)
    pub fn score(&self, input: &Tensor) -> Tensor {
        self.forward_t(input, false)
    }

    /// Get configuration
    pub fn config(&self) -> &DiscriminatorConfig {
        &self.config
    }
}

impl ModuleT for Discriminator {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        Discriminator::forward_t(self, xs, train)
    }
}
