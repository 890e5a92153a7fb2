//! Generator network for WGAN-GP
//!
//! The Generator transforms random noise tensors into synthetic images.
//! Architecture uses transposed 2D convolutions to upsample from latent space.

use tch::{nn, nn::Module, nn::ModuleT, Device, Tensor};

use super::leaky_relu;

/// Generator network configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of channels in the noise tensor
    pub noise_channels: i64,
    /// Number of output image channels (3 for RGB)
    pub image_channels: i64,
    /// Number of filters in the first upsampling block
    pub base_filters: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            noise_channels: 128,
            image_channels: 3,
            base_filters: 512,
        }
    }
}

/// Generator network
///
/// Architecture:
/// 1. Four ConvTranspose2d blocks, each doubling spatial resolution,
///    with LeakyReLU(0.2) activations
/// 2. Final Conv2d to `image_channels` with Tanh activation
///
/// Channel progression: base_filters -> /2 -> /4 -> /8 -> image_channels,
/// i.e. 512 -> 256 -> 128 -> 64 -> 3 with the default configuration.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    /// Upsampling transposed convolution layers
    conv1: nn::ConvTranspose2D,
    conv2: nn::ConvTranspose2D,
    conv3: nn::ConvTranspose2D,
    conv4: nn::ConvTranspose2D,
    /// Final projection to image channels
    conv_out: nn::Conv2D,
}

impl Generator {
    /// Create a new Generator network
    pub fn new(vs: &nn::Path, config: GeneratorConfig) -> Self {
        let base = config.base_filters;

        // stride 2 / padding 1 / output_padding 1 with a 3x3 kernel doubles
        // the spatial size exactly, matching "same"-padded upsampling
        let up_config = nn::ConvTransposeConfig {
            stride: 2,
            padding: 1,
            output_padding: 1,
            ..Default::default()
        };

        let conv1 = nn::conv_transpose2d(vs / "conv1", config.noise_channels, base, 3, up_config);
        let conv2 = nn::conv_transpose2d(vs / "conv2", base, base / 2, 3, up_config);
        let conv3 = nn::conv_transpose2d(vs / "conv3", base / 2, base / 4, 3, up_config);
        let conv4 = nn::conv_transpose2d(vs / "conv4", base / 4, base / 8, 3, up_config);

        // Final layer: stride 1, tanh activation, no further upsampling
        let out_config = nn::ConvConfig {
            stride: 1,
            padding: 1,
            ..Default::default()
        };
        let conv_out = nn::conv2d(
            vs / "conv_out",
            base / 8,
            config.image_channels,
            3,
            out_config,
        );

        Self {
            config,
            conv1,
            conv2,
            conv3,
            conv4,
            conv_out,
        }
    }

    /// Generate synthetic images from noise
    ///
    /// # Arguments
    ///
    /// * `noise` - Tensor of shape (batch_size, noise_channels, h, w)
    /// * `train` - Whether in training mode
    ///
    /// # Returns
    ///
    /// Tensor of shape (batch_size, image_channels, 16*h, 16*w)
    /// with values in [-1, 1]
    pub fn forward_t(&self, noise: &Tensor, _train: bool) -> Tensor {
        let x = self.conv1.forward(noise);
        let x = leaky_relu(&x, 0.2);

        let x = self.conv2.forward(&x);
        let x = leaky_relu(&x, 0.2);

        let x = self.conv3.forward(&x);
        let x = leaky_relu(&x, 0.2);

        let x = self.conv4.forward(&x);
        let x = leaky_relu(&x, 0.2);

        self.conv_out.forward(&x).tanh()
    }

    /// Generate samples (inference mode)
    pub fn generate(&self, noise: &Tensor) -> Tensor {
        self.forward_t(noise, false)
    }

    /// Generate samples from fresh standard-normal noise
    ///
    /// # Arguments
    ///
    /// * `num_samples` - Number of samples to generate
    /// * `noise_hw` - Spatial size (height, width) of the noise tensor
    /// * `device` - Device to create tensors on
    pub fn generate_random(&self, num_samples: i64, noise_hw: (i64, i64), device: Device) -> Tensor {
        let noise = Tensor::randn(
            [num_samples, self.config.noise_channels, noise_hw.0, noise_hw.1],
            (tch::Kind::Float, device),
        );
        self.generate(&noise)
    }

    /// Get configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl ModuleT for Generator {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        Generator::forward_t(self, xs, train)
    }
}
