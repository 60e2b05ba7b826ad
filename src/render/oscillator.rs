//! Oscillator primitives — periodic waveform shapes.

use std::f64::consts::TAU;
use std::fmt;

/// Available waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Square,
    Saw,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Saw,
    ];

    /// Look a waveform up by name. Unknown or empty names fall back to sine.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "triangle" => Waveform::Triangle,
            "square" => Waveform::Square,
            "saw" => Waveform::Saw,
            "sine" => Waveform::Sine,
            other => {
                if !other.is_empty() {
                    log::warn!("unknown waveform {other:?}, using sine");
                }
                Waveform::default()
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Saw => "saw",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of `waveform` at `phase`, measured in cycles.
///
/// Only the fractional part of `phase` matters, so callers may pass an
/// unwrapped running phase. Every shape starts its cycle at phase 0 and stays
/// within [-1.0, 1.0].
pub fn oscillator(waveform: Waveform, phase: f64) -> f64 {
    let phase = phase.rem_euclid(1.0);
    match waveform {
        Waveform::Sine => (TAU * phase).sin(),
        Waveform::Saw => phase.mul_add(2.0, -1.0),
        Waveform::Square if phase < 0.5 => 1.0,
        Waveform::Square => -1.0,
        // Shifted by a quarter cycle so the ramp rises from 0 like the sine.
        Waveform::Triangle => 1.0 - 4.0 * ((phase + 0.25).rem_euclid(1.0) - 0.5).abs(),
    }
}

impl Waveform {
    /// Sample `index` of a tone at `frequency` Hz. A frequency of zero or below is a
    /// rest and yields silence for every shape.
    pub fn sample(self, frequency: f64, sample_rate: u32, index: usize) -> f64 {
        if frequency <= 0.0 || sample_rate == 0 {
            return 0.0;
        }
        let cycles = index as f64 * frequency / f64::from(sample_rate);
        oscillator(self, cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve() {
        assert_eq!(Waveform::from_name("sine"), Waveform::Sine);
        assert_eq!(Waveform::from_name("triangle"), Waveform::Triangle);
        assert_eq!(Waveform::from_name("square"), Waveform::Square);
        assert_eq!(Waveform::from_name("saw"), Waveform::Saw);
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(Waveform::from_name(" Square "), Waveform::Square);
    }

    #[test]
    fn unknown_name_falls_back_to_sine() {
        assert_eq!(Waveform::from_name("unknown"), Waveform::Sine);
        assert_eq!(Waveform::from_name(""), Waveform::Sine);
    }

    #[test]
    fn name_round_trips() {
        for wf in Waveform::ALL {
            assert_eq!(Waveform::from_name(wf.name()), wf);
            assert_eq!(wf.to_string(), wf.name());
        }
    }

    #[test]
    fn sine_at_quarter() {
        assert!((oscillator(Waveform::Sine, 0.25) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn saw_ramps_through_zero() {
        assert!((oscillator(Waveform::Saw, 0.0) + 1.0).abs() < 1e-10);
        assert!(oscillator(Waveform::Saw, 0.5).abs() < 1e-10);
    }

    #[test]
    fn square_halves() {
        assert_eq!(oscillator(Waveform::Square, 0.25), 1.0);
        assert_eq!(oscillator(Waveform::Square, 0.75), -1.0);
    }

    #[test]
    fn triangle_peaks() {
        assert!((oscillator(Waveform::Triangle, 0.25) - 1.0).abs() < 1e-10);
        assert!((oscillator(Waveform::Triangle, 0.75) + 1.0).abs() < 1e-10);
    }

    #[test]
    fn phase_wraps_every_cycle() {
        for wf in Waveform::ALL {
            for phase in [0.1, 0.3, 0.6, 0.9] {
                assert!((oscillator(wf, phase) - oscillator(wf, phase + 3.0)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn silent_at_zero_frequency() {
        for wf in Waveform::ALL {
            for i in [0, 1, 7, 22_050] {
                assert_eq!(wf.sample(0.0, 44_100, i), 0.0);
                assert_eq!(wf.sample(-3.0, 44_100, i), 0.0);
            }
        }
    }

    #[test]
    fn sample_follows_frequency() {
        // 11025 Hz at 44.1 kHz is four samples per cycle.
        let quarter = Waveform::Sine.sample(11_025.0, 44_100, 1);
        assert!((quarter - 1.0).abs() < 1e-10);
        assert_eq!(Waveform::Square.sample(11_025.0, 44_100, 2), -1.0);
    }

    #[test]
    fn all_waveforms_bounded() {
        for wf in Waveform::ALL {
            for i in 0..1000 {
                let phase = i as f64 / 1000.0;
                let v = oscillator(wf, phase);
                assert!(
                    (-1.0..=1.0).contains(&v),
                    "{wf:?} at phase {phase}: {v} out of bounds"
                );
            }
        }
    }
}
