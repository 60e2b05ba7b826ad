//! Audio container encoding — sequential sample buffers to WAV or AIFF.

use std::fmt;
use std::io::{Seek, Write};
use std::str::FromStr;

use super::synth::SampleBuffer;
use super::EncodeError;
use crate::config::settings::SUPPORTED_BIT_DEPTHS;

/// Output container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Aiff,
}

impl AudioFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Aiff => "aiff",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wav" | "wave" => Ok(AudioFormat::Wav),
            "aiff" | "aif" => Ok(AudioFormat::Aiff),
            _ => Err(EncodeError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// PCM layout shared by every buffer in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpec {
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub channels: u16,
}

impl AudioSpec {
    pub fn mono(sample_rate: u32, bit_depth: u16) -> Self {
        Self {
            sample_rate,
            bit_depth,
            channels: 1,
        }
    }

    fn check(&self) -> Result<(), EncodeError> {
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            return Err(EncodeError::UnsupportedBitDepth(self.bit_depth));
        }
        if self.channels != 1 {
            return Err(EncodeError::UnsupportedChannels(self.channels));
        }
        Ok(())
    }
}

/// Write `buffers` back to back into one container, with nothing between them.
pub fn encode<W: Write + Seek>(
    format: AudioFormat,
    buffers: &[SampleBuffer],
    spec: AudioSpec,
    writer: &mut W,
) -> Result<(), EncodeError> {
    spec.check()?;
    match format {
        AudioFormat::Wav => encode_wav(buffers, spec, writer),
        AudioFormat::Aiff => encode_aiff(buffers, spec, writer),
    }
}

fn encode_wav<W: Write + Seek>(
    buffers: &[SampleBuffer],
    spec: AudioSpec,
    writer: &mut W,
) -> Result<(), EncodeError> {
    let wav_spec = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bit_depth,
        sample_format: hound::SampleFormat::Int,
    };
    let mut wav = hound::WavWriter::new(writer, wav_spec)?;
    for buffer in buffers {
        for sample in buffer.pcm() {
            wav.write_sample(sample)?;
        }
    }
    wav.finalize()?;
    Ok(())
}

/// Big-endian AIFF: FORM header, COMM chunk, SSND chunk.
fn encode_aiff<W: Write>(
    buffers: &[SampleBuffer],
    spec: AudioSpec,
    writer: &mut W,
) -> Result<(), EncodeError> {
    let frames: usize = buffers.iter().map(SampleBuffer::len).sum();
    let bytes_per_sample = usize::from(spec.bit_depth / 8);
    let data_len = frames * bytes_per_sample * usize::from(spec.channels);
    let pad = data_len % 2;

    let frames = u32::try_from(frames).map_err(|_| EncodeError::TooLong)?;
    let ssnd_len = u32::try_from(data_len + 8).map_err(|_| EncodeError::TooLong)?;
    // "AIFF" + COMM chunk (8 + 18) + SSND chunk header (8) + data + pad
    let form_len = 4u32
        .checked_add(26)
        .and_then(|n| n.checked_add(8))
        .and_then(|n| n.checked_add(ssnd_len))
        .and_then(|n| n.checked_add(pad as u32))
        .ok_or(EncodeError::TooLong)?;

    writer.write_all(b"FORM")?;
    writer.write_all(&form_len.to_be_bytes())?;
    writer.write_all(b"AIFF")?;

    writer.write_all(b"COMM")?;
    writer.write_all(&18u32.to_be_bytes())?;
    writer.write_all(&spec.channels.to_be_bytes())?;
    writer.write_all(&frames.to_be_bytes())?;
    writer.write_all(&spec.bit_depth.to_be_bytes())?;
    writer.write_all(&extended_from_u32(spec.sample_rate))?;

    writer.write_all(b"SSND")?;
    writer.write_all(&ssnd_len.to_be_bytes())?;
    writer.write_all(&0u32.to_be_bytes())?; // offset
    writer.write_all(&0u32.to_be_bytes())?; // block size

    for buffer in buffers {
        for sample in buffer.pcm() {
            let bytes = sample.to_be_bytes();
            writer.write_all(&bytes[4 - bytes_per_sample..])?;
        }
    }
    if pad == 1 {
        writer.write_all(&[0])?;
    }
    writer.flush()?;
    Ok(())
}

/// 80-bit IEEE 754 extended representation of an integer, as AIFF stores sample rates.
fn extended_from_u32(value: u32) -> [u8; 10] {
    let mut out = [0u8; 10];
    if value == 0 {
        return out;
    }
    let shift = value.leading_zeros();
    let exponent = 16_383 + 31 - shift as u16;
    let mantissa = u64::from(value) << (32 + shift);
    out[..2].copy_from_slice(&exponent.to_be_bytes());
    out[2..].copy_from_slice(&mantissa.to_be_bytes());
    out
}
