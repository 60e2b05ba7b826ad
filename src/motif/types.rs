//! Motif data model — notes, rests, tempo, and time signature.

use serde::{Deserialize, Serialize};

use crate::pitch::{PitchError, PitchTable};

/// Pitch value used for synthesized rests.
pub const REST_VALUE: i32 = -1;

/// A pitched note or rest with a duration in quantized beat units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Pitch table value; negative for a rest.
    pub value: i32,
    pub duration: u32,
    pub name: String,
    pub octave: i32,
    /// Name and octave combined, e.g. `"A4"`. Empty for rests.
    pub pitch: String,
}

impl Note {
    /// Resolve a pitch value against `table`. Negative values become rests.
    pub fn new(value: i32, duration: u32, table: &PitchTable) -> Result<Self, PitchError> {
        if value < 0 {
            return Ok(Self::rest(duration));
        }
        let pitch = table.lookup_by_value(value)?;
        Ok(Self {
            value,
            duration,
            name: pitch.name.clone(),
            octave: pitch.octave,
            pitch: pitch.label(),
        })
    }

    pub fn rest(duration: u32) -> Self {
        Self {
            value: REST_VALUE,
            duration,
            name: String::new(),
            octave: 0,
            pitch: String::new(),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.value < 0
    }
}

/// A note placed within a motif.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotifNote {
    pub note: Note,
    /// 1-based beat the note starts on.
    pub starting_beat: u32,
    /// Reserved; always 0.
    pub steps: i32,
    /// Reserved; always 0.
    pub interval: i32,
}

impl MotifNote {
    pub fn new(note: Note, starting_beat: u32) -> Self {
        Self {
            note,
            starting_beat,
            steps: 0,
            interval: 0,
        }
    }

    pub fn rest(starting_beat: u32, duration: u32) -> Self {
        Self::new(Note::rest(duration), starting_beat)
    }

    /// First beat after this note ends.
    pub fn end_beat(&self) -> u32 {
        self.starting_beat.saturating_add(self.note.duration)
    }
}

/// Tempo tag and rate. Only `"bpm"` is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tempo {
    #[serde(rename = "type")]
    pub kind: String,
    pub units: i32,
}

impl Tempo {
    pub fn bpm(units: i32) -> Self {
        Self {
            kind: "bpm".into(),
            units,
        }
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::bpm(120)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beat: i32,
    pub unit: i32,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self { beat: 4, unit: 4 }
    }
}

/// A monophonic melody: contiguous notes and rests plus timing metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motif {
    pub id: String,
    pub name: String,
    pub key: String,
    pub mode: String,
    pub tempo: Tempo,
    pub time_signature: TimeSignature,
    pub notes: Vec<MotifNote>,
}
