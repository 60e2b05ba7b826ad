//! Pitch table — scientific pitch notation lookups against the loaded config.

use crate::config::{ConfigError, MotivicConfig, NOTES_PER_OCTAVE};

use super::PitchError;

/// A named pitch in scientific notation, e.g. A4.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub name: String,
    pub octave: i32,
    /// Dense 1-based index: `octave * 12 + chromatic_index + 1`.
    pub value: i32,
}

impl Pitch {
    /// Scientific pitch notation label, e.g. `"C#3"`.
    pub fn label(&self) -> String {
        format!("{}{}", self.name, self.octave)
    }
}

/// Read-only lookup from pitch names to frequencies and from values to pitches.
///
/// Built once at startup and shared by every conversion.
#[derive(Debug, Clone)]
pub struct PitchTable {
    notes: Vec<String>,
    frequencies: Vec<Vec<f64>>,
    pitches: Vec<Pitch>,
}

impl PitchTable {
    /// Validate `config` and derive one [`Pitch`] per (octave, note name).
    pub fn build(config: &MotivicConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pitches = (0..config.frequencies.len())
            .flat_map(move |octave| {
                config.notes.iter().enumerate().map(move |(idx, name)| Pitch {
                    name: name.clone(),
                    octave: octave as i32,
                    value: (octave * NOTES_PER_OCTAVE + idx + 1) as i32,
                })
            })
            .collect();
        Ok(Self {
            notes: config.notes.clone(),
            frequencies: config.frequencies.clone(),
            pitches,
        })
    }

    /// Every pitch in value order.
    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    /// Number of octaves in the frequency table.
    pub fn octaves(&self) -> usize {
        self.frequencies.len()
    }

    /// Find the pitch with the given 1-based value.
    pub fn lookup_by_value(&self, value: i32) -> Result<&Pitch, PitchError> {
        let out_of_range = || PitchError::OutOfRange {
            value,
            max: self.pitches.len(),
        };
        let idx = usize::try_from(value)
            .ok()
            .and_then(|v| v.checked_sub(1))
            .ok_or_else(out_of_range)?;
        self.pitches.get(idx).ok_or_else(out_of_range)
    }

    /// Frequency in Hz of `name` in `octave`. An empty name is a rest and sounds at 0 Hz.
    pub fn lookup_frequency(&self, name: &str, octave: i32) -> Result<f64, PitchError> {
        if name.is_empty() {
            return Ok(0.0);
        }
        let unknown = || PitchError::UnknownPitch {
            name: name.to_string(),
            octave,
        };
        let idx = self
            .notes
            .iter()
            .position(|n| n == name)
            .ok_or_else(unknown)?;
        let row = usize::try_from(octave)
            .ok()
            .and_then(|o| self.frequencies.get(o))
            .ok_or_else(unknown)?;
        row.get(idx).copied().ok_or_else(unknown)
    }
}
