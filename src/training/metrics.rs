//! Training metrics for monitoring WGAN-GP progress
//!
//! The critic loss approximates the negative Wasserstein distance, so the
//! interesting signals are its trend and the gradient penalty magnitude
//! rather than classification accuracies.

/// Metrics collected during training
#[derive(Debug, Clone, Default)]
pub struct TrainingMetrics {
    /// Critic losses per recorded step
    pub critic_losses: Vec<f64>,
    /// Generator losses per recorded step
    pub gen_losses: Vec<f64>,
}

impl TrainingMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one training step
    pub fn record_step(&mut self, critic_loss: f64, gen_loss: f64) {
        self.critic_losses.push(critic_loss);
        self.gen_losses.push(gen_loss);
    }

    /// Get number of recorded steps
    pub fn num_steps(&self) -> usize {
        self.critic_losses.len()
    }

    /// Get latest critic loss
    pub fn latest_critic_loss(&self) -> Option<f64> {
        self.critic_losses.last().copied()
    }

    /// Get latest generator loss
    pub fn latest_gen_loss(&self) -> Option<f64> {
        self.gen_losses.last().copied()
    }

    /// Calculate moving average of critic loss
    pub fn critic_loss_ma(&self, window: usize) -> f64 {
        moving_average(&self.critic_losses, window)
    }

    /// Calculate moving average of generator loss
    pub fn gen_loss_ma(&self, window: usize) -> f64 {
        moving_average(&self.gen_losses, window)
    }

    /// Check whether training appears to be diverging
    ///
    /// Divergence indicators:
    /// - Non-finite losses (NaN/Inf from gradient penalty instability)
    /// - Loss magnitudes blowing up over the recent window
    pub fn is_diverging(&self, window: usize) -> bool {
        let recent = |values: &[f64]| {
            values
                .iter()
                .rev()
                .take(window)
                .any(|v| !v.is_finite() || v.abs() > 1e4)
        };

        recent(&self.critic_losses) || recent(&self.gen_losses)
    }
}

/// Calculate moving average of last `window` values
fn moving_average(values: &[f64], window: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = window.min(values.len());
    let sum: f64 = values.iter().rev().take(n).sum();
    sum / n as f64
}
