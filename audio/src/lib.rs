//! WAV decoding and resampling front-end for the emotion pipeline.
//!
//! The feature pipeline consumes mono f32 samples at a configured rate
//! (default 22050 Hz). This crate covers the decode step: RIFF/WAVE parsing
//! with multi-channel downmix ([`wav`]) and sample-rate conversion
//! ([`resample`]).

pub mod resample;
pub mod wav;

use std::path::Path;

use thiserror::Error;

pub use resample::resample;
pub use wav::{DecodedWav, decode_wav, read_wav};

/// Errors returned by audio decoding and resampling.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("malformed wav: {0}")]
    Malformed(String),

    #[error("unsupported wav encoding: {0}")]
    Unsupported(String),

    #[error("resample error: {0}")]
    Resample(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<rubato::ResamplerConstructionError> for AudioError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        AudioError::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for AudioError {
    fn from(e: rubato::ResampleError) -> Self {
        AudioError::Resample(e.to_string())
    }
}

/// Reads a WAV file and returns mono f32 samples at `target_rate`.
///
/// Decodes, downmixes to mono and resamples when the source rate differs.
pub fn load_wav<P: AsRef<Path>>(path: P, target_rate: usize) -> Result<Vec<f32>, AudioError> {
    let decoded = read_wav(path)?;
    if decoded.sample_rate as usize == target_rate {
        return Ok(decoded.samples);
    }
    resample(&decoded.samples, decoded.sample_rate as usize, target_rate)
}
