//! Configuration management
//!
//! Provides unified configuration for the model pair and the training step.

use serde::{Deserialize, Serialize};

use crate::model::{DiscriminatorConfig, GeneratorConfig};
use crate::training::TrainStepConfig;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model configuration
    pub model: ModelConfig,
    /// Training configuration
    pub training: TrainingSection,
}

/// Model-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of noise channels
    pub noise_channels: i64,
    /// Spatial size of the noise tensor (height, width)
    pub noise_height: i64,
    pub noise_width: i64,
    /// Number of image channels (3 for RGB)
    pub image_channels: i64,
    /// Base filters for generator
    pub gen_base_filters: i64,
    /// Base filters for discriminator
    pub disc_base_filters: i64,
}

/// Training-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSection {
    /// Batch size
    pub batch_size: i64,
    /// Learning rate for both optimizers
    pub lr: f64,
    /// Adam first-moment decay
    pub beta1: f64,
    /// Adam second-moment decay
    pub beta2: f64,
    /// Gradient penalty coefficient (lambda)
    pub gradient_penalty_weight: f64,
    /// Device: "cpu" or "cuda"
    pub device: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                noise_channels: 128,
                noise_height: 1,
                noise_width: 1,
                image_channels: 3,
                gen_base_filters: 512,
                disc_base_filters: 64,
            },
            training: TrainingSection {
                batch_size: 64,
                lr: 1e-4,
                beta1: 0.0,
                beta2: 0.9,
                gradient_penalty_weight: 10.0,
                device: "cpu".to_string(),
            },
        }
    }
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_toml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_toml(&self, path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn save_json(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get device from configuration
    pub fn get_device(&self) -> tch::Device {
        match self.training.device.to_lowercase().as_str() {
            "cuda" | "gpu" => {
                if tch::Cuda::is_available() {
                    tch::Device::Cuda(0)
                } else {
                    tracing::warn!("CUDA requested but not available, falling back to CPU");
                    tch::Device::Cpu
                }
            }
            _ => tch::Device::Cpu,
        }
    }

    /// Image spatial size implied by the noise size (four stride-2 upsamples)
    pub fn image_size(&self) -> [i64; 3] {
        [
            self.model.image_channels,
            self.model.noise_height * 16,
            self.model.noise_width * 16,
        ]
    }

    /// Generator configuration
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            noise_channels: self.model.noise_channels,
            image_channels: self.model.image_channels,
            base_filters: self.model.gen_base_filters,
        }
    }

    /// Discriminator configuration
    pub fn discriminator_config(&self) -> DiscriminatorConfig {
        DiscriminatorConfig {
            image_channels: self.model.image_channels,
            base_filters: self.model.disc_base_filters,
        }
    }

    /// Training-step configuration
    pub fn train_step_config(&self) -> TrainStepConfig {
        TrainStepConfig {
            batch_size: self.training.batch_size,
            noise_size: [
                self.model.noise_channels,
                self.model.noise_height,
                self.model.noise_width,
            ],
            image_size: self.image_size(),
            gradient_penalty_weight: self.training.gradient_penalty_weight,
            lr: self.training.lr,
            beta1: self.training.beta1,
            beta2: self.training.beta2,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.training.batch_size <= 0 {
            anyhow::bail!("Batch size must be > 0");
        }
        if self.model.noise_channels <= 0 {
            anyhow::bail!("Noise channels must be > 0");
        }
        if self.model.noise_height <= 0 || self.model.noise_width <= 0 {
            anyhow::bail!("Noise spatial dimensions must be > 0");
        }
        if self.model.image_channels <= 0 {
            anyhow::bail!("Image channels must be > 0");
        }
        // generator channel stack halves three times
        if self.model.gen_base_filters < 8 {
            anyhow::bail!("Generator base filters must be >= 8");
        }
        if self.training.gradient_penalty_weight < 0.0 {
            anyhow::bail!("Gradient penalty weight must be >= 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.model.noise_channels, 128);
        assert_eq!(config.training.gradient_penalty_weight, 10.0);
        assert_eq!(config.image_size(), [3, 16, 16]);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let loaded: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.model.noise_channels, loaded.model.noise_channels);
        assert_eq!(config.training.lr, loaded.training.lr);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default();
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        config.save_toml(&path).unwrap();
        let loaded = Config::from_toml(&path).unwrap();

        assert_eq!(config.training.beta2, loaded.training.beta2);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.training.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_train_step_config_projection() {
        let config = Config::default();
        let step = config.train_step_config();

        assert_eq!(step.noise_size, [128, 1, 1]);
        assert_eq!(step.image_size, [3, 16, 16]);
        assert_eq!(step.beta1, 0.0);
        assert_eq!(step.beta2, 0.9);
    }
}
