//! Conversion error taxonomy — every stage error, surfaced through one type.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::midi::MidiError;
use crate::pitch::PitchError;
use crate::render::{DurationError, EncodeError};

/// Why a conversion produced no output.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Decode failure, polyphonic input, or an empty track.
    #[error(transparent)]
    Midi(#[from] MidiError),
    /// Pitch value or name outside the configured table.
    #[error(transparent)]
    Pitch(#[from] PitchError),
    #[error(transparent)]
    Duration(#[from] DurationError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}
