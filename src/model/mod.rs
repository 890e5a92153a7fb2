//! Model module containing GAN architecture components
//!
//! This module provides:
//! - Generator network for upsampling noise into images
//! - Discriminator (critic) network producing unbounded per-sample scores
//! - WganGp wrapper combining both networks

mod generator;
mod discriminator;
mod wgan;

pub use generator::{Generator, GeneratorConfig};
pub use discriminator::{Discriminator, DiscriminatorConfig};
pub use wgan::WganGp;

use tch::Tensor;

/// LeakyReLU with an explicit negative slope.
///
/// `Tensor::leaky_relu` is fixed at the libtorch default slope of 0.01;
/// both networks here use 0.2.
pub(crate) fn leaky_relu(xs: &Tensor, slope: f64) -> Tensor {
    xs.maximum(&(xs * slope))
}
