//! End-to-end test: configuration -> model pair -> training steps

use tch::{Device, Kind, Tensor};
use wgan_gp::model::{DiscriminatorConfig, GeneratorConfig, WganGp};
use wgan_gp::training::{TrainStep, TrainStepConfig, TrainingMetrics};
use wgan_gp::utils::Config;

fn small_setup() -> TrainStep {
    let model = WganGp::new(
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
    );

    let config = TrainStepConfig {
        batch_size: 4,
        noise_size: [16, 1, 1],
        image_size: [3, 16, 16],
        ..Default::default()
    };

    TrainStep::new(config, model).expect("valid configuration")
}

#[test]
fn train_steps_produce_finite_scalar_losses() {
    let mut step = small_setup();
    let mut metrics = TrainingMetrics::new();

    let real = Tensor::randn([4, 3, 16, 16], (Kind::Float, Device::Cpu));

    for _ in 0..3 {
        let (d_loss, g_loss) = step.step(&real, true).unwrap();
        metrics.record_step(d_loss, g_loss);
    }

    assert_eq!(metrics.num_steps(), 3);
    assert!(metrics.latest_critic_loss().unwrap().is_finite());
    assert!(metrics.latest_gen_loss().unwrap().is_finite());
    assert!(!metrics.is_diverging(3));
}

#[test]
fn generator_and_critic_shapes_line_up() {
    let step = small_setup();

    // 16x generator upsampling feeds the critic's expected input exactly
    let images = step.model().generate_random(2, (1, 1));
    assert_eq!(images.size(), vec![2, 3, 16, 16]);

    let scores = step.model().critic_score(&images);
    assert_eq!(scores.size(), vec![2, 1]);
}

#[test]
fn config_projects_consistent_step_settings() {
    let mut config = Config::default();
    config.model.gen_base_filters = 32;
    config.model.disc_base_filters = 8;
    config.model.noise_channels = 16;
    config.training.batch_size = 4;
    config.validate().unwrap();

    let model = WganGp::new(
        config.generator_config(),
        config.discriminator_config(),
        config.get_device(),
    );

    let mut step = TrainStep::new(config.train_step_config(), model).unwrap();

    let real = Tensor::randn([4, 3, 16, 16], (Kind::Float, Device::Cpu));
    let d_loss = step.d_step(&real, true).unwrap();
    let g_loss = step.g_step(true).unwrap();

    assert!(d_loss.is_finite());
    assert!(g_loss.is_finite());
}
