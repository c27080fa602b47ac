// src/config.rs
//
// Engine configuration. Every field has a default so a partial JSON
// document (or none at all) is valid.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dnd::Modifier;
use crate::error::{PedalboardError, Result};

// Default audio configuration
const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;
const DEFAULT_MAX_BLOCK: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate in Hz used when no clip dictates one.
    pub sample_rate: f64,

    /// Largest block processed in one call, in frames.
    pub max_block_size: usize,

    /// Lock drags to the vertical axis.
    pub vertical_axis_only: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_block_size: DEFAULT_MAX_BLOCK,
            vertical_axis_only: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(PedalboardError::Config(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.max_block_size == 0 {
            return Err(PedalboardError::Config("max_block_size must be non-zero".into()));
        }
        Ok(())
    }

    /// Drag modifiers implied by this configuration.
    pub fn drag_modifiers(&self) -> Vec<Modifier> {
        if self.vertical_axis_only {
            vec![Modifier::RestrictToVerticalAxis]
        } else {
            Vec::new()
        }
    }
}
