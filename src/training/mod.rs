//! Training module for WGAN-GP
//!
//! This module provides:
//! - Wasserstein losses and the interpolated-sample gradient penalty
//! - Training-step construction (paired critic/generator Adam updates)
//! - Metrics for divergence monitoring

mod step;
mod losses;
mod metrics;

pub use step::{TrainStep, TrainStepConfig};
pub use losses::{critic_loss, generator_loss, gradient_penalty};
pub use metrics::TrainingMetrics;
