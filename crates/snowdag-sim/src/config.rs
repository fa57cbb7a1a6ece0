//! Simulation configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use snowdag_consensus::Parameters;

/// All knobs for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Transactions to generate, double-spends included.
    pub transactions: usize,
    /// Probability that a generation reuses an earlier `data` value
    /// from a different author.
    pub double_spend_ratio: f64,
    /// Number of nodes.
    pub nodes: usize,
    /// Peers sampled per query (k).
    pub sample_size: usize,
    /// Quorum threshold as a fraction of the sample.
    pub alpha: f64,
    /// Confidence threshold for the uncontested acceptance path.
    pub beta1: u64,
    /// Stability threshold for the contested acceptance path.
    pub beta2: u64,
    /// Master RNG seed.
    pub seed: u64,
    /// Emit one DOT file per node after the run.
    pub dump_graphs: bool,
    /// Directory for DOT output.
    pub dump_dir: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            transactions: 100,
            double_spend_ratio: 0.05,
            nodes: 50,
            sample_size: 10,
            alpha: 0.8,
            beta1: 11,
            beta2: 150,
            seed: 42,
            dump_graphs: false,
            dump_dir: PathBuf::from("graphs"),
        }
    }
}

impl SimConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transactions == 0 {
            return Err(ConfigError::InvalidValue(
                "transactions must be positive".to_string(),
            ));
        }
        if self.nodes == 0 {
            return Err(ConfigError::InvalidValue(
                "nodes must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.double_spend_ratio) {
            return Err(ConfigError::InvalidValue(
                "double_spend_ratio must be in [0, 1)".to_string(),
            ));
        }
        self.parameters()
            .validate()
            .map_err(ConfigError::InvalidValue)?;
        Ok(())
    }

    /// The consensus parameters this configuration describes.
    pub fn parameters(&self) -> Parameters {
        Parameters::new(self.sample_size, self.alpha, self.beta1, self.beta2)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("serialize error: {0}")]
    SerializeError(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
}
