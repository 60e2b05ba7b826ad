//! Rendering — beat durations to seconds, notes to sample buffers, buffers to audio files.

pub mod duration;
pub mod encode;
pub mod oscillator;
pub mod synth;

pub use duration::duration_seconds;
pub use encode::{encode, AudioFormat, AudioSpec};
pub use oscillator::{oscillator, Waveform};
pub use synth::{max_signed_value, SampleBuffer, Synthesizer};

/// Invalid timing inputs to the duration resolver.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DurationError {
    #[error("tempo must be positive, got {units} bpm")]
    InvalidTempo { units: i32 },
    #[error("unsupported tempo type {0:?}")]
    UnsupportedTempo(String),
    #[error("time signature {beat}/{unit} has no length")]
    InvalidTimeSignature { beat: i32, unit: i32 },
}

/// Failures while writing an audio container.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("unsupported audio format {0:?}")]
    UnsupportedFormat(String),
    #[error("unsupported bit depth {0}")]
    UnsupportedBitDepth(u16),
    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u16),
    #[error("audio is too long for the container")]
    TooLong,
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}
