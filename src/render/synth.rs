//! Per-note waveform synthesis into PCM-scaled sample buffers.

use crate::motif::Note;
use crate::pitch::{PitchError, PitchTable};

use super::oscillator::Waveform;

/// Largest positive sample value representable at `bit_depth`, e.g. 32767 for 16-bit.
pub fn max_signed_value(bit_depth: u16) -> i32 {
    match bit_depth {
        0 => 0,
        1..=31 => (1i32 << (bit_depth - 1)) - 1,
        _ => i32::MAX,
    }
}

/// A mono buffer of samples already scaled to the signed range of its bit depth.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
    bit_depth: u16,
}

impl SampleBuffer {
    /// Create from raw mono samples at PCM scale.
    pub fn from_mono(samples: Vec<f64>, sample_rate: u32, bit_depth: u16) -> Self {
        Self {
            samples,
            sample_rate,
            bit_depth,
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Integer PCM samples, truncated toward zero and clamped to the bit depth.
    pub fn pcm(&self) -> impl Iterator<Item = i32> + '_ {
        let max = max_signed_value(self.bit_depth);
        let min = -max - 1;
        self.samples.iter().map(move |&s| (s as i32).clamp(min, max))
    }
}

/// Renders notes at a fixed sample rate and bit depth.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    table: &'a PitchTable,
    sample_rate: u32,
    bit_depth: u16,
}

impl<'a> Synthesizer<'a> {
    pub fn new(table: &'a PitchTable, sample_rate: u32, bit_depth: u16) -> Self {
        Self {
            table,
            sample_rate,
            bit_depth,
        }
    }

    /// Frequency of `note` in Hz; rests are 0.
    pub fn frequency(&self, note: &Note) -> Result<f64, PitchError> {
        if note.is_rest() {
            return Ok(0.0);
        }
        self.table.lookup_frequency(&note.name, note.octave)
    }

    /// Render `note` for `duration_seconds` as one full-scale waveform buffer.
    ///
    /// The buffer holds `ceil(sample_rate * duration_seconds)` samples. Rests
    /// render as silence of the same length.
    pub fn synthesize(
        &self,
        note: &Note,
        duration_seconds: f64,
        waveform: Waveform,
    ) -> Result<SampleBuffer, PitchError> {
        let frequency = self.frequency(note)?;
        let len = (f64::from(self.sample_rate) * duration_seconds.max(0.0)).ceil() as usize;
        log::debug!(
            "audio note: {} {} freq {frequency:.3} Hz, {duration_seconds:.4}s, {len} samples",
            note.name,
            note.octave,
        );

        let amplitude = f64::from(max_signed_value(self.bit_depth));
        let samples = (0..len)
            .map(|i| amplitude * waveform.sample(frequency, self.sample_rate, i))
            .collect();
        Ok(SampleBuffer::from_mono(
            samples,
            self.sample_rate,
            self.bit_depth,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotivicConfig;
    use assert_approx_eq::assert_approx_eq;

    fn table() -> PitchTable {
        PitchTable::build(&MotivicConfig::equal_temperament(440.0, 9)).unwrap()
    }

    fn a4(table: &PitchTable) -> Note {
        Note::new(58, 1, table).unwrap()
    }

    #[test]
    fn max_signed_values() {
        assert_eq!(max_signed_value(8), 127);
        assert_eq!(max_signed_value(16), 32_767);
        assert_eq!(max_signed_value(24), 8_388_607);
        assert_eq!(max_signed_value(32), i32::MAX);
    }

    #[test]
    fn buffer_length_rounds_up() {
        let t = table();
        let synth = Synthesizer::new(&t, 44_100, 16);
        let buf = synth.synthesize(&a4(&t), 0.03125, Waveform::Sine).unwrap();
        // 44100 * 0.03125 = 1378.125
        assert_eq!(buf.len(), 1379);
        let buf = synth.synthesize(&a4(&t), 0.5, Waveform::Sine).unwrap();
        assert_eq!(buf.len(), 22_050);
        assert_approx_eq!(buf.duration_seconds(), 0.5);
    }

    #[test]
    fn zero_duration_is_empty() {
        let t = table();
        let buf = Synthesizer::new(&t, 44_100, 16)
            .synthesize(&a4(&t), 0.0, Waveform::Square)
            .unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn rest_is_silent_for_every_waveform() {
        let t = table();
        let synth = Synthesizer::new(&t, 44_100, 16);
        let rest = Note::rest(4);
        assert_eq!(synth.frequency(&rest).unwrap(), 0.0);
        for wf in Waveform::ALL {
            let buf = synth.synthesize(&rest, 0.25, wf).unwrap();
            assert_eq!(buf.len(), 11_025);
            assert!(buf.samples().iter().all(|&s| s == 0.0), "{wf} rest not silent");
        }
    }

    #[test]
    fn sine_spans_full_16_bit_range() {
        let t = table();
        let buf = Synthesizer::new(&t, 44_100, 16)
            .synthesize(&a4(&t), 0.1, Waveform::Sine)
            .unwrap();
        let peak = buf.samples().iter().fold(0.0f64, |m, s| m.max(s.abs()));
        assert!(peak > 32_700.0 && peak <= 32_767.0, "peak {peak}");
        assert_eq!(buf.samples()[0], 0.0);
    }

    #[test]
    fn square_alternates_at_pitch() {
        let t = table();
        let buf = Synthesizer::new(&t, 44_100, 16)
            .synthesize(&a4(&t), 1.0, Waveform::Square)
            .unwrap();
        let crossings = buf
            .samples()
            .windows(2)
            .filter(|w| w[0] > 0.0 && w[1] < 0.0)
            .count();
        assert!((439..=441).contains(&crossings), "{crossings} cycles");
    }

    #[test]
    fn pcm_truncates_and_clamps() {
        let buf = SampleBuffer::from_mono(vec![1.9, -1.9, 40_000.0, -40_000.0], 44_100, 16);
        let pcm: Vec<i32> = buf.pcm().collect();
        assert_eq!(pcm, vec![1, -1, 32_767, -32_768]);
    }

    #[test]
    fn unknown_pitch_propagates() {
        let t = table();
        let note = Note {
            value: 1,
            duration: 1,
            name: "X".into(),
            octave: 0,
            pitch: "X0".into(),
        };
        assert!(matches!(
            Synthesizer::new(&t, 44_100, 16).synthesize(&note, 0.1, Waveform::Sine),
            Err(PitchError::UnknownPitch { .. })
        ));
    }
}
