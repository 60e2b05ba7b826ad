//! Tick-to-beat quantization.
//!
//! The divisor is a fixed ticks-per-beat-unit constant from the settings. It is
//! NOT the file's declared pulses-per-quarter-note, so files authored at other
//! resolutions quantize to a different beat grid than their author intended.

use std::num::NonZeroU32;

/// Converts MIDI ticks to integer beat units by truncating division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    ticks_per_beat: NonZeroU32,
}

impl Quantizer {
    /// Returns `None` for a zero divisor.
    pub fn new(ticks_per_beat: u32) -> Option<Self> {
        NonZeroU32::new(ticks_per_beat).map(|ticks_per_beat| Self { ticks_per_beat })
    }

    pub fn ticks_per_beat(&self) -> u32 {
        self.ticks_per_beat.get()
    }

    /// Whole beat units contained in `ticks`, rounded down.
    pub fn ticks_to_beats(&self, ticks: u64) -> u32 {
        let beats = ticks / u64::from(self.ticks_per_beat.get());
        u32::try_from(beats).unwrap_or(u32::MAX)
    }

    /// 1-based beat on which an event starting at `ticks` falls.
    pub fn starting_beat(&self, ticks: u64) -> u32 {
        self.ticks_to_beats(ticks).saturating_add(1)
    }
}
