//! Startup configuration — the pitch/frequency table and per-conversion settings.

pub mod motivic;
pub mod settings;

pub use motivic::{MotivicConfig, CHROMATIC_NAMES, NOTES_PER_OCTAVE};
pub use settings::ConvertSettings;

use std::path::PathBuf;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("malformed config: {0}")]
    Malformed(String),
}
