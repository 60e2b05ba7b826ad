//! Motif — quantized, beat-relative representation of a monophonic melody.

pub mod quantize;
pub mod rests;
pub mod types;

pub use quantize::Quantizer;
pub use rests::insert_rests;
pub use types::{Motif, MotifNote, Note, Tempo, TimeSignature, REST_VALUE};
