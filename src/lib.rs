//! Motivic — render monophonic MIDI melodies to WAV or AIFF.
//!
//! A file flows one way through the pipeline: decoded MIDI track, quantized
//! beat-relative [`motif::Motif`], per-note duration and frequency, per-note
//! sample buffer, encoded audio file.

pub mod config;
pub mod convert;
pub mod error;
pub mod midi;
pub mod motif;
pub mod pitch;
pub mod render;

pub use convert::{ConversionJob, Converter};
pub use error::ConvertError;
