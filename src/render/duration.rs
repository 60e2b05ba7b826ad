//! Musical duration to wall-clock seconds.

use crate::motif::{Tempo, TimeSignature};

use super::DurationError;

/// Seconds spanned by `beats` quantized units at `tempo` in `time_signature`.
///
/// `seconds_per_beat * beats / (beat * unit)`. Linear in `beats`, inversely
/// proportional to the tempo.
pub fn duration_seconds(
    beats: u32,
    tempo: &Tempo,
    time_signature: TimeSignature,
) -> Result<f64, DurationError> {
    if tempo.kind != "bpm" {
        return Err(DurationError::UnsupportedTempo(tempo.kind.clone()));
    }
    if tempo.units <= 0 {
        return Err(DurationError::InvalidTempo { units: tempo.units });
    }
    if time_signature.beat <= 0 || time_signature.unit <= 0 {
        return Err(DurationError::InvalidTimeSignature {
            beat: time_signature.beat,
            unit: time_signature.unit,
        });
    }
    let units_per_bar = i64::from(time_signature.beat) * i64::from(time_signature.unit);

    let beats_per_second = f64::from(tempo.units) / 60.0;
    let seconds_per_beat = 1.0 / beats_per_second;
    let beats_per_note = f64::from(beats) / units_per_bar as f64;
    Ok(seconds_per_beat * beats_per_note)
}
