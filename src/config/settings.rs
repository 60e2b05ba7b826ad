//! Conversion settings — audio and quantization parameters loaded from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::motif::TimeSignature;
use crate::render::AudioFormat;

/// Bit depths the encoders can write.
pub const SUPPORTED_BIT_DEPTHS: [u16; 4] = [8, 16, 24, 32];

/// Fixed parameters applied to every conversion.
///
/// Every field has a default, so a settings file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertSettings {
    #[serde(default = "ConvertSettings::default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "ConvertSettings::default_bit_depth")]
    pub bit_depth: u16,
    /// MIDI ticks per quantized beat unit. Not derived from the file's resolution.
    #[serde(default = "ConvertSettings::default_ticks_per_beat")]
    pub ticks_per_beat: u32,
    /// Added to a MIDI note number to get a pitch table value.
    #[serde(default = "ConvertSettings::default_pitch_offset")]
    pub pitch_offset: i32,
    #[serde(default = "ConvertSettings::default_waveform")]
    pub waveform: String,
    #[serde(default = "ConvertSettings::default_format")]
    pub format: String,
    #[serde(default)]
    pub time_signature: TimeSignature,
}

impl ConvertSettings {
    /// Load settings from a YAML file. Returns defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML settings document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::Malformed("sample_rate must be positive".into()));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            return Err(ConfigError::Malformed(format!(
                "bit_depth {} is not one of {SUPPORTED_BIT_DEPTHS:?}",
                self.bit_depth
            )));
        }
        if self.ticks_per_beat == 0 {
            return Err(ConfigError::Malformed(
                "ticks_per_beat must be positive".into(),
            ));
        }
        let TimeSignature { beat, unit } = self.time_signature;
        if beat <= 0 || unit <= 0 {
            return Err(ConfigError::Malformed(format!(
                "time_signature {beat}/{unit} must have positive beat and unit"
            )));
        }
        if let Err(e) = self.format.parse::<AudioFormat>() {
            return Err(ConfigError::Malformed(e.to_string()));
        }
        Ok(())
    }

    fn default_sample_rate() -> u32 {
        44_100
    }

    fn default_bit_depth() -> u16 {
        16
    }

    fn default_ticks_per_beat() -> u32 {
        8
    }

    fn default_pitch_offset() -> i32 {
        -11
    }

    fn default_waveform() -> String {
        "sine".into()
    }

    fn default_format() -> String {
        "wav".into()
    }
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            sample_rate: Self::default_sample_rate(),
            bit_depth: Self::default_bit_depth(),
            ticks_per_beat: Self::default_ticks_per_beat(),
            pitch_offset: Self::default_pitch_offset(),
            waveform: Self::default_waveform(),
            format: Self::default_format(),
            time_signature: TimeSignature::default(),
        }
    }
}
