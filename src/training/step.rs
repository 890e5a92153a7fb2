//! Training-step construction for WGAN-GP
//!
//! Binds a model pair to its two Adam optimizers and exposes the paired
//! update operations: a critic step and a generator step. Optimizer moment
//! buffers live inside the optimizers and persist across calls.

use anyhow::{bail, Result};
use tch::{nn, Kind, Tensor};
use tracing::info;

use crate::model::WganGp;
use super::losses::{critic_loss, generator_loss, gradient_penalty};

/// Training-step configuration
#[derive(Debug, Clone)]
pub struct TrainStepConfig {
    /// Number of samples per batch
    pub batch_size: i64,
    /// Noise tensor shape sans batch dim: (channels, height, width)
    pub noise_size: [i64; 3],
    /// Image tensor shape sans batch dim: (channels, height, width)
    pub image_size: [i64; 3],
    /// Gradient penalty coefficient (lambda)
    pub gradient_penalty_weight: f64,
    /// Learning rate for both Adam optimizers
    pub lr: f64,
    /// Adam first-moment decay
    pub beta1: f64,
    /// Adam second-moment decay
    pub beta2: f64,
}

impl Default for TrainStepConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            noise_size: [128, 1, 1],
            image_size: [3, 16, 16],
            gradient_penalty_weight: 10.0,
            lr: 1e-4,
            beta1: 0.0,
            beta2: 0.9,
        }
    }
}

/// WGAN-GP training step
///
/// Created once per generator/discriminator pair. `d_step` and `g_step`
/// mutate the network weights and the Adam moment buffers in place, so the
/// receiver is `&mut self`; the two updates are not atomic as a pair and
/// must not be interleaved across threads.
pub struct TrainStep {
    config: TrainStepConfig,
    model: WganGp,
    d_opt: nn::Optimizer,
    g_opt: nn::Optimizer,
}

impl TrainStep {
    /// Build the training step for a model pair
    ///
    /// Validates the shape invariants between the noise, the generator
    /// output, and the critic input before any tensor work, and constructs
    /// one Adam optimizer per network.
    pub fn new(config: TrainStepConfig, model: WganGp) -> Result<Self> {
        if config.batch_size <= 0 {
            bail!("Batch size must be > 0");
        }
        if config.noise_size.iter().any(|&d| d <= 0) || config.image_size.iter().any(|&d| d <= 0) {
            bail!("Noise and image dimensions must be > 0");
        }
        if config.noise_size[0] != model.noise_channels() {
            bail!(
                "Noise channel mismatch: config has {}, generator expects {}",
                config.noise_size[0],
                model.noise_channels()
            );
        }
        if config.image_size[0] != model.image_channels() {
            bail!(
                "Image channel mismatch: config has {}, model produces {}",
                config.image_size[0],
                model.image_channels()
            );
        }
        // four stride-2 upsamples
        if config.noise_size[1] * 16 != config.image_size[1]
            || config.noise_size[2] * 16 != config.image_size[2]
        {
            bail!(
                "Generator output size {}x{} does not match image size {}x{}",
                config.noise_size[1] * 16,
                config.noise_size[2] * 16,
                config.image_size[1],
                config.image_size[2]
            );
        }

        let d_opt = model.disc_optimizer(config.lr, config.beta1, config.beta2)?;
        let g_opt = model.gen_optimizer(config.lr, config.beta1, config.beta2)?;

        info!(
            "Built WGAN-GP training step: batch_size={}, noise={:?}, image={:?}, lambda={}",
            config.batch_size, config.noise_size, config.image_size,
            config.gradient_penalty_weight
        );

        Ok(Self {
            config,
            model,
            d_opt,
            g_opt,
        })
    }

    /// Fresh standard-normal noise, re-sampled on every call
    fn sample_noise(&self) -> Tensor {
        let [c, h, w] = self.config.noise_size;
        Tensor::randn(
            [self.config.batch_size, c, h, w],
            (Kind::Float, self.model.device),
        )
    }

    /// Run one critic update
    ///
    /// Computes `mean(D(fake)) - mean(D(real)) + lambda * penalty` on a
    /// fresh generator sample and applies the critic's Adam update.
    ///
    /// # Arguments
    ///
    /// * `real` - Real image batch of shape (batch_size,) + image_size
    /// * `train` - Whether the networks run in training mode
    ///
    /// # Returns
    ///
    /// The scalar critic loss
    pub fn d_step(&mut self, real: &Tensor, train: bool) -> Result<f64> {
        let [c, h, w] = self.config.image_size;
        let expected = vec![self.config.batch_size, c, h, w];
        if real.size() != expected {
            bail!(
                "Real batch shape {:?} does not match expected {:?}",
                real.size(),
                expected
            );
        }

        let noise = self.sample_noise();
        // detached: only the critic's weights receive gradients here
        let fake = self.model.generator.forward_t(&noise, train).detach();

        let pred_real = self.model.discriminator.forward_t(real, train);
        let pred_fake = self.model.discriminator.forward_t(&fake, train);

        let penalty = gradient_penalty(&self.model.discriminator, real, &fake, train);
        let d_loss =
            critic_loss(&pred_real, &pred_fake) + penalty * self.config.gradient_penalty_weight;

        self.d_opt.zero_grad();
        d_loss.backward();
        self.d_opt.step();

        Ok(d_loss.double_value(&[]))
    }

    /// Run one generator update
    ///
    /// Computes `-mean(D(G(noise)))` on fresh noise and applies the
    /// generator's Adam update.
    ///
    /// # Returns
    ///
    /// The scalar generator loss
    pub fn g_step(&mut self, train: bool) -> Result<f64> {
        let noise = self.sample_noise();
        let fake = self.model.generator.forward_t(&noise, train);
        let pred_fake = self.model.discriminator.forward_t(&fake, train);

        let g_loss = generator_loss(&pred_fake);

        self.g_opt.zero_grad();
        g_loss.backward();
        self.g_opt.step();

        Ok(g_loss.double_value(&[]))
    }

    /// Run one critic update followed by one generator update
    ///
    /// # Returns
    ///
    /// Tuple of (critic loss, generator loss)
    pub fn step(&mut self, real: &Tensor, train: bool) -> Result<(f64, f64)> {
        let d_loss = self.d_step(real, train)?;
        let g_loss = self.g_step(train)?;
        Ok((d_loss, g_loss))
    }

    /// Get configuration
    pub fn config(&self) -> &TrainStepConfig {
        &self.config
    }

    /// Borrow the underlying model pair
    pub fn model(&self) -> &WganGp {
        &self.model
    }

    /// Consume the step and recover the model pair
    pub fn into_model(self) -> WganGp {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiscriminatorConfig, GeneratorConfig};
    use tch::Device;

    fn small_config() -> TrainStepConfig {
        TrainStepConfig {
            batch_size: 4,
            noise_size: [16, 1, 1],
            image_size: [3, 16, 16],
            ..Default::default()
        }
    }

    fn small_model() -> WganGp {
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
    fn test_train_step_construction() {
        let step = TrainStep::new(small_config(), small_model());
        assert!(step.is_ok());
    }

    #[test]
    fn test_rejects_mismatched_image_size() {
        let config = TrainStepConfig {
            image_size: [3, 32, 32],
            ..small_config()
        };
        assert!(TrainStep::new(config, small_model()).is_err());
    }

    #[test]
    fn test_rejects_mismatched_channels() {
        let config = TrainStepConfig {
            noise_size: [8, 1, 1],
            ..small_config()
        };
        assert!(TrainStep::new(config, small_model()).is_err());
    }

    #[test]
    fn test_rejects_bad_real_batch() {
        let mut step = TrainStep::new(small_config(), small_model()).unwrap();

        let wrong = Tensor::randn([4, 3, 8, 8], (Kind::Float, Device::Cpu));
        assert!(step.d_step(&wrong, true).is_err());
    }

    #[test]
    fn test_d_then_g_step() {
        let mut step = TrainStep::new(small_config(), small_model()).unwrap();

        let real = Tensor::randn([4, 3, 16, 16], (Kind::Float, Device::Cpu));
        let d_loss = step.d_step(&real, true).unwrap();
        let g_loss = step.g_step(true).unwrap();

        assert!(d_loss.is_finite());
        assert!(g_loss.is_finite());

        // optimizer state persists; a second round must also succeed
        let (d2, g2) = step.step(&real, true).unwrap();
        assert!(d2.is_finite());
        assert!(g2.is_finite());
    }

    #[test]
    fn test_d_step_moves_weights() {
        let mut step = TrainStep::new(small_config(), small_model()).unwrap();

        let probe = Tensor::randn([2, 3, 16, 16], (Kind::Float, Device::Cpu));
        let before = step.model().critic_score(&probe);

        let real = Tensor::randn([4, 3, 16, 16], (Kind::Float, Device::Cpu));
        step.d_step(&real, true).unwrap();

        let after = step.model().critic_score(&probe);
        let diff: f64 = (before - after).abs().max().double_value(&[]);
        assert!(diff > 0.0);
    }
}
