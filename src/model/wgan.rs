//! WGAN-GP wrapper combining Generator and Discriminator
//!
//! Owns both networks and their variable stores, and builds the Adam
//! optimizers used for the paired training updates.

use anyhow::Result;
use tch::{nn, nn::OptimizerConfig, nn::VarStore, Device, Tensor};

use super::discriminator::{Discriminator, DiscriminatorConfig};
use super::generator::{Generator, GeneratorConfig};

/// Complete WGAN-GP model pair
pub struct WganGp {
    /// Generator network
    pub generator: Generator,
    /// Discriminator (critic) network
    pub discriminator: Discriminator,
    /// Variable store for generator
    pub gen_vs: VarStore,
    /// Variable store for discriminator
    pub disc_vs: VarStore,
    /// Device (CPU/GPU)
    pub device: Device,
}

impl WganGp {
    /// Create a new WGAN-GP model pair
    ///
    /// # Arguments
    ///
    /// * `gen_config` - Generator configuration
    /// * `disc_config` - Discriminator configuration
    /// * `device` - Device to create the model on
    pub fn new(
        gen_config: GeneratorConfig,
        disc_config: DiscriminatorConfig,
        device: Device,
    ) -> Self {
        let gen_vs = VarStore::new(device);
        let disc_vs = VarStore::new(device);

        let generator = Generator::new(&gen_vs.root(), gen_config);
        let discriminator = Discriminator::new(&disc_vs.root(), disc_config);

        Self {
            generator,
            discriminator,
            gen_vs,
            disc_vs,
            device,
        }
    }

    /// Create a WGAN-GP pair with default filter counts for the given shapes
    ///
    /// # Arguments
    ///
    /// * `noise_channels` - Number of channels in the noise tensor
    /// * `image_channels` - Number of image channels (3 for RGB)
    /// * `device` - Device to create the model on
    pub fn with_defaults(noise_channels: i64, image_channels: i64, device: Device) -> Self {
        let gen_config = GeneratorConfig {
            noise_channels,
            image_channels,
            ..Default::default()
        };

        let disc_config = DiscriminatorConfig {
            image_channels,
            ..Default::default()
        };

        Self::new(gen_config, disc_config, device)
    }

    /// Generate images from specific noise tensors
    pub fn generate(&self, noise: &Tensor) -> Tensor {
        self.generator.generate(noise)
    }

    /// Generate images from fresh standard-normal noise
    pub fn generate_random(&self, num_samples: i64, noise_hw: (i64, i64)) -> Tensor {
        self.generator.generate_random(num_samples, noise_hw, self.device)
    }

    /// Score images with the critic
    pub fn critic_score(&self, images: &Tensor) -> Tensor {
        self.discriminator.score(images)
    }

    /// Build the generator optimizer
    pub fn gen_optimizer(&self, lr: f64, beta1: f64, beta2: f64) -> Result<nn::Optimizer> {
        let opt = nn::Adam {
            beta1,
            beta2,
            wd: 0.0,
            ..Default::default()
        }
        .build(&self.gen_vs, lr)?;
        Ok(opt)
    }

    /// Build the discriminator optimizer
    pub fn disc_optimizer(&self, lr: f64, beta1: f64, beta2: f64) -> Result<nn::Optimizer> {
        let opt = nn::Adam {
            beta1,
            beta2,
            wd: 0.0,
            ..Default::default()
        }
        .build(&self.disc_vs, lr)?;
        Ok(opt)
    }

    /// Get the noise channel count
    pub fn noise_channels(&self) -> i64 {
        self.generator.config().noise_channels
    }

    /// Get the image channel count
    pub fn image_channels(&self) -> i64 {
        self.generator.config().image_channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_pair() -> WganGp {
        WganGp::new(
            GeneratorConfig {
                noise_channels: 16,
                image_channels: 3,
                base_filters: 32,
            },
            DiscriminatorConfig {
                image_channels: 3,
                base_filters: 8,
            },
            Device::Cpu,
        )
    }

    #[test]
    fn test_wgan_creation() {
        let model = WganGp::with_defaults(128, 3, Device::Cpu);

        assert_eq!(model.noise_channels(), 128);
        assert_eq!(model.image_channels(), 3);
    }

    #[test]
    fn test_wgan_generate_and_score() {
        let model = small_pair();

        let images = model.generate_random(4, (1, 1));
        assert_eq!(images.size(), vec![4, 3, 16, 16]);

        let scores = model.critic_score(&images);
        assert_eq!(scores.size(), vec![4, 1]);
    }

    #[test]
    fn test_independent_initialization() {
        // identical configs give structurally identical but independently
        // initialized networks
        let a = small_pair();
        let b = small_pair();

        let noise = Tensor::randn([2, 16, 1, 1], (tch::Kind::Float, Device::Cpu));
        let out_a = a.generate(&noise);
        let out_b = b.generate(&noise);

        assert_eq!(out_a.size(), out_b.size());
        let diff: f64 = (out_a - out_b).abs().max().double_value(&[]);
        assert!(diff > 0.0);
    }

    #[test]
    fn test_optimizer_construction() {
        let model = small_pair();
        assert!(model.gen_optimizer(1e-4, 0.0, 0.9).is_ok());
        assert!(model.disc_optimizer(1e-4, 0.0, 0.9).is_ok());
    }
}
