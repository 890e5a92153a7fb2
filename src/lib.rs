//! # WGAN-GP
//!
//! This crate provides a modular implementation of a Wasserstein GAN with
//! gradient penalty (WGAN-GP) for image synthesis, following
//! "Improved Training of Wasserstein GANs" (<https://arxiv.org/abs/1704.00028>).
//!
//! ## Modules
//!
//! - `model`: Generator and critic (discriminator) networks
//! - `training`: WGAN-GP losses, gradient penalty, and training-step updates
//! - `utils`: Configuration handling

pub mod model;
pub mod training;
pub mod utils;

pub use model::{Discriminator, DiscriminatorConfig, Generator, GeneratorConfig, WganGp};
pub use training::{critic_loss, generator_loss, gradient_penalty};
pub use training::{TrainStep, TrainStepConfig, TrainingMetrics};
pub use utils::Config;
