//! Error types.
//!
//! Stack and drag operations never fail; they degrade to no-ops. Errors only
//! come from configuration, file I/O and user-supplied names.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PedalboardError {
    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration or snapshot JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WAV decode/encode failure
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Effect name not in the catalog
    #[error("Unknown effect: {0}")]
    UnknownEffect(String),
}

pub type Result<T> = std::result::Result<T, PedalboardError>;
