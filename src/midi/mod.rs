//! MIDI input — Standard MIDI File decoding and track-to-motif mapping.

pub mod decode;
pub mod mapper;

pub use decode::{decode, DecodedMidi, NoteEvent, DEFAULT_BPM};
pub use mapper::TrackMapper;

/// Failures while reading MIDI input.
#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("MIDI file failed to parse: {0}")]
    Decode(#[from] midly::Error),
    #[error("MIDI file has {tracks} note tracks; only monophonic input is supported")]
    PolyphonicUnsupported { tracks: usize },
    #[error("MIDI track has no notes")]
    EmptyTrack,
}
