//! Loss functions for WGAN-GP training
//!
//! Implements the Wasserstein critic/generator losses and the gradient
//! penalty enforcing the 1-Lipschitz constraint on the critic.

use tch::{nn::ModuleT, Kind, Tensor};

/// Stabilizer added under the square root of the gradient norm.
const NORM_EPS: f64 = 1e-7;

/// Critic (discriminator) loss: E[D(G(z))] - E[D(x)]
///
/// The critic minimizes this, pushing scores down on fake samples and up
/// on real ones. The gradient penalty is added separately.
///
/// # Arguments
///
/// * `pred_real` - Critic output on real samples
/// * `pred_fake` - Critic output on generated samples
///
/// # Returns
///
/// Scalar loss tensor
pub fn critic_loss(pred_real: &Tensor, pred_fake: &Tensor) -> Tensor {
    pred_fake.mean(Kind::Float) - pred_real.mean(Kind::Float)
}

/// Generator loss: -E[D(G(z))]
///
/// The generator maximizes the critic's score on its samples.
pub fn generator_loss(pred_fake: &Tensor) -> Tensor {
    -pred_fake.mean(Kind::Float)
}

/// Gradient penalty evaluated at random interpolations between real and
/// fake samples
///
/// For each sample, draws alpha ~ U(0,1), forms
/// `interpolates = (1 - alpha) * real + alpha * fake`, and computes the
/// gradient of the critic's score with respect to the interpolates. The
/// penalty is the mean squared deviation of the per-sample gradient L2 norm
/// from 1 (the 1-Lipschitz target). Non-negative, and zero when the norm is
/// identically 1.
///
/// The backward pass is run with `create_graph` so the penalty itself is
/// differentiable with respect to the critic weights.
///
/// # Arguments
///
/// * `critic` - Critic network
/// * `real` - Real sample batch, shape (batch_size, c, h, w)
/// * `fake` - Generated sample batch of the same shape
/// * `train` - Whether the critic runs in training mode
///
/// # Returns
///
/// Scalar penalty tensor
pub fn gradient_penalty<D: ModuleT>(critic: &D, real: &Tensor, fake: &Tensor, train: bool) -> Tensor {
    let batch_size = real.size()[0];
    let device = real.device();

    // alpha broadcast over channel and spatial dims
    let alpha = Tensor::rand([batch_size, 1, 1, 1], (Kind::Float, device));

    // (1 - alpha) * real + alpha * fake, cut loose from both input graphs
    // so gradients flow only through the critic
    let interpolates = (real + (fake.detach() - real) * &alpha)
        .detach()
        .set_requires_grad(true);

    let scores = critic.forward_t(&interpolates, train);

    // Samples are independent, so the gradient of the summed scores gives
    // the per-sample gradients in one backward pass.
    let grads = Tensor::run_backward(&[scores.sum(Kind::Float)], &[&interpolates], true, true);
    let grad = &grads[0];

    let norm = (grad
        .square()
        .sum_dim_intlist(&[1i64, 2, 3][..], false, Kind::Float)
        + NORM_EPS)
        .sqrt();

    (norm - 1.0).square().mean(Kind::Float)
}
