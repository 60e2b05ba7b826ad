//! Conversion pipeline — decoded MIDI to motif to per-note buffers to an audio file.

pub mod batch;

pub use batch::ConversionJob;

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::{ConfigError, ConvertSettings, MotivicConfig};
use crate::error::ConvertError;
use crate::midi::{self, MidiError, NoteEvent, TrackMapper};
use crate::motif::{Motif, Quantizer};
use crate::pitch::PitchTable;
use crate::render::{self, AudioFormat, AudioSpec, SampleBuffer, Synthesizer, Waveform};

/// Runs conversions against a read-only pitch table and settings.
///
/// Holds no mutable state, so one converter can serve many concurrent conversions.
#[derive(Debug, Clone)]
pub struct Converter {
    table: PitchTable,
    settings: ConvertSettings,
    quantizer: Quantizer,
}

impl Converter {
    pub fn new(table: PitchTable, settings: ConvertSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let quantizer = Quantizer::new(settings.ticks_per_beat)
            .ok_or_else(|| ConfigError::Malformed("ticks_per_beat must be positive".into()))?;
        Ok(Self {
            table,
            settings,
            quantizer,
        })
    }

    /// Load the pitch config (required) and settings (optional; defaults if absent).
    pub fn from_files(config: &Path, settings: Option<&Path>) -> Result<Self, ConfigError> {
        let table = PitchTable::build(&MotivicConfig::load(config)?)?;
        let settings = match settings {
            Some(path) => ConvertSettings::load(path)?,
            None => ConvertSettings::default(),
        };
        Self::new(table, settings)
    }

    pub fn table(&self) -> &PitchTable {
        &self.table
    }

    pub fn settings(&self) -> &ConvertSettings {
        &self.settings
    }

    pub fn audio_spec(&self) -> AudioSpec {
        AudioSpec::mono(self.settings.sample_rate, self.settings.bit_depth)
    }

    fn mapper(&self) -> TrackMapper<'_> {
        TrackMapper::new(
            &self.table,
            self.quantizer,
            self.settings.pitch_offset,
            self.settings.time_signature,
        )
    }

    /// Map the single melody track into a motif. More than one track is rejected.
    pub fn motif(&self, tracks: &[Vec<NoteEvent>]) -> Result<Motif, ConvertError> {
        if tracks.len() > 1 {
            return Err(MidiError::PolyphonicUnsupported {
                tracks: tracks.len(),
            }
            .into());
        }
        let track = tracks.first().ok_or(MidiError::EmptyTrack)?;
        let motif = self.mapper().map_track(track)?;
        for note in &motif.notes {
            log::debug!("motif note: {note:?}");
        }
        Ok(motif)
    }

    /// Render every motif note, in order, as its own buffer.
    pub fn render(
        &self,
        motif: &Motif,
        waveform: Waveform,
    ) -> Result<Vec<SampleBuffer>, ConvertError> {
        let synth = Synthesizer::new(
            &self.table,
            self.settings.sample_rate,
            self.settings.bit_depth,
        );
        motif
            .notes
            .iter()
            .map(|n| -> Result<SampleBuffer, ConvertError> {
                let seconds =
                    render::duration_seconds(n.note.duration, &motif.tempo, motif.time_signature)?;
                Ok(synth.synthesize(&n.note, seconds, waveform)?)
            })
            .collect()
    }

    /// Convert decoded tracks into ordered buffers; unknown waveform names render as sine.
    pub fn convert(
        &self,
        tracks: &[Vec<NoteEvent>],
        waveform: &str,
    ) -> Result<Vec<SampleBuffer>, ConvertError> {
        let motif = self.motif(tracks)?;
        self.render(&motif, Waveform::from_name(waveform))
    }

    /// Decode a Standard MIDI File and convert it.
    pub fn convert_midi(
        &self,
        bytes: &[u8],
        waveform: &str,
    ) -> Result<Vec<SampleBuffer>, ConvertError> {
        let decoded = midi::decode(bytes)?;
        if let Some(tpq) = decoded.ticks_per_quarter {
            if u32::from(tpq) != self.quantizer.ticks_per_beat() {
                log::warn!(
                    "file declares {tpq} ticks per quarter note; quantizing with fixed divisor {}",
                    self.quantizer.ticks_per_beat()
                );
            }
        }
        self.convert(&decoded.tracks, waveform)
    }

    /// Convert `input` into an audio file at `output`.
    ///
    /// The file is written under a temporary name in the destination directory
    /// and only moved into place once fully encoded, so a failed conversion
    /// leaves nothing at `output`.
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
        format: AudioFormat,
        waveform: &str,
    ) -> Result<PathBuf, ConvertError> {
        let bytes = std::fs::read(input).map_err(|e| ConvertError::io(input, e))?;
        let buffers = self.convert_midi(&bytes, waveform)?;

        let dir = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| ConvertError::io(dir, e))?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            render::encode(format, &buffers, self.audio_spec(), &mut writer)?;
            writer.flush().map_err(|e| ConvertError::io(output, e))?;
        }
        temp.persist(output).map_err(|e| ConvertError::io(output, e.error))?;

        log::info!("audio file generated at {}", output.display());
        Ok(output.to_path_buf())
    }
}
