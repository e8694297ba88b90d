//! RIFF/WAVE decoding to mono f32 samples.
//!
//! Supports PCM 16/24/32-bit signed integer and 32-bit float data, including
//! WAVE_FORMAT_EXTENSIBLE headers wrapping either. Multi-channel audio is
//! downmixed to mono by averaging all channels per frame.

use std::path::Path;

use crate::AudioError;

const FORMAT_PCM: u16 = 0x0001;
const FORMAT_IEEE_FLOAT: u16 = 0x0003;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// A decoded WAV file: mono samples in [-1, 1] plus the source rate.
#[derive(Debug, Clone)]
pub struct DecodedWav {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Reads and decodes a WAV file from disk.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<DecodedWav, AudioError> {
    let bytes = std::fs::read(path)?;
    decode_wav(&bytes)
}

/// Decodes a WAV byte buffer to mono f32 samples.
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedWav, AudioError> {
    if bytes.len() < 12 {
        return Err(AudioError::Malformed("file shorter than RIFF header".into()));
    }
    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(AudioError::Malformed("missing RIFF/WAVE magic".into()));
    }

    let mut fmt: Option<FmtChunk> = None;
    let mut data: Option<&[u8]> = None;

    // Walk the chunk list; chunk bodies are padded to even length.
    let mut pos = 12usize;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = u32::from_le_bytes([
            bytes[pos + 4],
            bytes[pos + 5],
            bytes[pos + 6],
            bytes[pos + 7],
        ]) as usize;
        let body_start = pos + 8;
        let body_end = body_start
            .checked_add(size)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| AudioError::Malformed("chunk overruns file".into()))?;
        let body = &bytes[body_start..body_end];

        match id {
            b"fmt " => fmt = Some(parse_fmt(body)?),
            b"data" => data = Some(body),
            _ => {}
        }

        pos = body_end + (size & 1);
    }

    let fmt = fmt.ok_or_else(|| AudioError::Malformed("missing fmt chunk".into()))?;
    let data = data.ok_or_else(|| AudioError::Malformed("missing data chunk".into()))?;

    let samples = decode_data(data, &fmt)?;
    Ok(DecodedWav {
        samples,
        sample_rate: fmt.sample_rate,
    })
}

#[derive(Debug, Clone, Copy)]
struct FmtChunk {
    format: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

fn parse_fmt(body: &[u8]) -> Result<FmtChunk, AudioError> {
    if body.len() < 16 {
        return Err(AudioError::Malformed("fmt chunk too short".into()));
    }
    let mut format = u16::from_le_bytes([body[0], body[1]]);
    let channels = u16::from_le_bytes([body[2], body[3]]);
    let sample_rate = u32::from_le_bytes([body[4], body[5], body[6], body[7]]);
    let bits_per_sample = u16::from_le_bytes([body[14], body[15]]);

    // Extensible headers carry the real format code in the sub-format GUID.
    if format == FORMAT_EXTENSIBLE {
        if body.len() < 26 {
            return Err(AudioError::Malformed("extensible fmt chunk too short".into()));
        }
        format = u16::from_le_bytes([body[24], body[25]]);
    }

    if channels == 0 {
        return Err(AudioError::Malformed("zero channels".into()));
    }
    if sample_rate == 0 {
        return Err(AudioError::Malformed("zero sample rate".into()));
    }

    Ok(FmtChunk {
        format,
        channels,
        sample_rate,
        bits_per_sample,
    })
}

fn decode_data(data: &[u8], fmt: &FmtChunk) -> Result<Vec<f32>, AudioError> {
    let interleaved: Vec<f32> = match (fmt.format, fmt.bits_per_sample) {
        (FORMAT_PCM, 16) => data
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
            .collect(),
        (FORMAT_PCM, 24) => data
            .chunks_exact(3)
            .map(|b| {
                let v = i32::from_le_bytes([0, b[0], b[1], b[2]]) >> 8;
                v as f32 / 8388608.0
            })
            .collect(),
        (FORMAT_PCM, 32) => data
            .chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32 / 2147483648.0)
            .collect(),
        (FORMAT_IEEE_FLOAT, 32) => data
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
        (format, bits) => {
            return Err(AudioError::Unsupported(format!(
                "format {format:#06x} with {bits} bits per sample"
            )));
        }
    };

    Ok(downmix(&interleaved, fmt.channels as usize))
}

/// Averages interleaved channels into mono. Trailing partial frames drop.
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    let frames = interleaved.len() / channels;
    let mut mono = Vec::with_capacity(frames);
    for f in 0..frames {
        let frame = &interleaved[f * channels..(f + 1) * channels];
        mono.push(frame.iter().sum::<f32>() / channels as f32);
    }
    mono
}
