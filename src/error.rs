use std::path::PathBuf;

use thiserror::Error;

/// Configuration failures surfaced to the host. The simulation itself has no
/// recoverable runtime errors.
#[derive(Debug, Error)]
pub enum EmitterError {
    /// Emission needs the texture extent and rendering needs the handle.
    #[error("emitter has no texture assigned")]
    MissingTexture,

    #[error("curve `{name}` has no points")]
    EmptyCurve { name: &'static str },

    #[error("failed to read scene file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML scene: {0}")]
    ConfigToml(#[from] toml::de::Error),

    #[error("invalid JSON scene: {0}")]
    ConfigJson(#[from] serde_json::Error),
}
