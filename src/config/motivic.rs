//! Music theory config — frequency matrix and chromatic note names loaded from `config.json`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Number of chromatic pitch classes per octave.
pub const NOTES_PER_OCTAVE: usize = 12;

/// Chromatic index of A within an octave (C = 0).
const A_INDEX: usize = 9;

/// Octave holding the A4 reference pitch.
const A4_OCTAVE: usize = 4;

/// Sharp-spelled chromatic names starting at C.
pub const CHROMATIC_NAMES: [&str; NOTES_PER_OCTAVE] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Frequency table and note names, as parsed from disk.
///
/// `frequencies[octave][index]` is the frequency in Hz of `notes[index]` in
/// that octave. Immutable once validated; the pitch table is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotivicConfig {
    pub frequencies: Vec<Vec<f64>>,
    pub notes: Vec<String>,
}

impl MotivicConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Build a twelve-tone equal temperament table with `octaves` rows,
    /// tuned so that A4 sounds at `a4_hz`.
    pub fn equal_temperament(a4_hz: f64, octaves: usize) -> Self {
        let a4 = (A4_OCTAVE * NOTES_PER_OCTAVE + A_INDEX) as f64;
        let frequencies = (0..octaves)
            .map(|octave| {
                (0..NOTES_PER_OCTAVE)
                    .map(|idx| {
                        let semitone = (octave * NOTES_PER_OCTAVE + idx) as f64;
                        a4_hz * 2.0f64.powf((semitone - a4) / 12.0)
                    })
                    .collect()
            })
            .collect();
        Self {
            frequencies,
            notes: CHROMATIC_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Check the table shape before any pitch lookup depends on it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notes.len() != NOTES_PER_OCTAVE {
            return Err(ConfigError::Malformed(format!(
                "expected {NOTES_PER_OCTAVE} note names, found {}",
                self.notes.len()
            )));
        }
        let mut seen = HashSet::new();
        for name in &self.notes {
            if name.is_empty() {
                return Err(ConfigError::Malformed("empty note name".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Malformed(format!(
                    "duplicate note name {name:?}"
                )));
            }
        }
        if self.frequencies.is_empty() {
            return Err(ConfigError::Malformed("frequency table is empty".into()));
        }
        for (octave, row) in self.frequencies.iter().enumerate() {
            if row.len() != self.notes.len() {
                return Err(ConfigError::Malformed(format!(
                    "octave {octave} has {} frequencies, expected {}",
                    row.len(),
                    self.notes.len()
                )));
            }
            if let Some(f) = row.iter().find(|f| !f.is_finite() || **f < 0.0) {
                return Err(ConfigError::Malformed(format!(
                    "octave {octave} has invalid frequency {f}"
                )));
            }
        }
        Ok(())
    }
}
