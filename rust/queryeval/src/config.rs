//! Optimizer configuration.

use std::path::Path;

use queryeval_common::{Result, error::Error, verify_arg};
use serde::{Deserialize, Serialize};

/// Controls the bit-vector fusion pass.
///
/// Missing fields take their default values, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// When false, [`optimize_with`](crate::optimize_with) returns its input.
    pub enabled: bool,
    /// Minimum number of bit-vector children a composite needs before they are
    /// fused. At least 2.
    pub min_bit_vectors: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            enabled: true,
            min_bit_vectors: 2,
        }
    }
}

impl OptimizerConfig {
    pub fn from_json(json: &str) -> Result<OptimizerConfig> {
        let config: OptimizerConfig =
            serde_json::from_str(json).map_err(|e| Error::invalid_config("json", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<OptimizerConfig> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::io(path.display().to_string(), e))?;
        let config: OptimizerConfig = serde_json::from_str(&json)
            .map_err(|e| Error::invalid_config(path.display().to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        verify_arg!(min_bit_vectors, self.min_bit_vectors >= 2);
        Ok(())
    }
}
