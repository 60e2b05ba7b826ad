//! Pitches — name/octave/value lookups built from the frequency config.

pub mod table;

pub use table::{Pitch, PitchTable};

/// Lookup failures against the pitch table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PitchError {
    #[error("pitch value {value} is outside 1..={max}")]
    OutOfRange { value: i32, max: usize },
    #[error("unknown pitch {name}{octave}")]
    UnknownPitch { name: String, octave: i32 },
}
