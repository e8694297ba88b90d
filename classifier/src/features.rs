//! The two feature pipeline operations consumed by the emotion models.
//!
//! Both are deterministic and stateless: the same signal always maps to the
//! same matrix, so callers must treat failures as final for that input.

use crate::error::ClassifierError;
use crate::mfcc::{MfccConfig, MfccExtractor};

/// Divisor applied to the standard deviation during global standardization.
const STD_EPSILON: f64 = 1e-8;

/// Configures feature extraction for the sequence model.
///
/// The output shape is always exactly `max_frames x n_mfcc`, regardless of
/// input duration.
#[derive(Debug, Clone)]
pub struct SequenceConfig {
    /// Input sample rate in Hz (default: 22050).
    pub sample_rate: usize,
    /// Cepstral coefficients per frame (default: 13).
    pub n_mfcc: usize,
    /// Fixed output frame count (default: 100).
    pub max_frames: usize,
    /// Analysis window size in samples (default: 2048).
    pub n_fft: usize,
    /// Hop between frames in samples (default: 512).
    pub hop_size: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            n_mfcc: 13,
            max_frames: 100,
            n_fft: 2048,
            hop_size: 512,
        }
    }
}

/// Configures feature extraction for the non-sequential model.
///
/// The output is a single vector of `n_mfcc` time-averaged coefficients.
#[derive(Debug, Clone)]
pub struct AveragedConfig {
    /// Input sample rate in Hz (default: 22050).
    pub sample_rate: usize,
    /// Cepstral coefficients (default: 40).
    pub n_mfcc: usize,
    /// Analysis window size in samples (default: 2048).
    pub n_fft: usize,
    /// Hop between frames in samples (default: 512).
    pub hop_size: usize,
}

impl Default for AveragedConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            n_mfcc: 40,
            n_fft: 2048,
            hop_size: 512,
        }
    }
}

/// Extracts a fixed-shape `max_frames x n_mfcc` feature matrix for the
/// sequence model.
///
/// Signals shorter than 100ms are zero-padded to 500ms before the transform.
/// Longer outputs keep the centered `max_frames` window; shorter outputs get
/// zero rows appended. The final matrix is standardized globally: mean
/// subtracted and divided by the matrix-wide standard deviation plus `1e-8`.
pub fn extract_sequence_features(
    signal: &[f32],
    cfg: &SequenceConfig,
) -> Result<Vec<Vec<f32>>, ClassifierError> {
    if signal.is_empty() {
        return Err(ClassifierError::EmptyInput);
    }

    let min_len = (cfg.sample_rate as f64 * 0.1) as usize;
    let padded;
    let samples: &[f32] = if signal.len() < min_len {
        let target = (cfg.sample_rate as f64 * 0.5) as usize;
        let mut buf = signal.to_vec();
        // Pad length clamps to zero when the target is not longer.
        if buf.len() < target {
            buf.resize(target, 0.0);
        }
        padded = buf;
        &padded
    } else {
        signal
    };

    check_finite(samples)?;

    let extractor = MfccExtractor::new(MfccConfig {
        sample_rate: cfg.sample_rate,
        n_mfcc: cfg.n_mfcc,
        n_fft: cfg.n_fft,
        hop_size: cfg.hop_size,
        ..MfccConfig::default()
    });
    let mfccs = extractor.extract(samples);

    let mut matrix = normalize_frame_count(mfccs, cfg.max_frames, cfg.n_mfcc);
    standardize(&mut matrix);
    Ok(matrix)
}

/// Extracts a fixed-length vector of `n_mfcc` coefficients averaged over all
/// frames, for the non-sequential model.
///
/// Unlike the sequence variant there is no short-signal padding and no global
/// standardization; the two operations are intentionally distinct.
pub fn extract_averaged_features(
    signal: &[f32],
    cfg: &AveragedConfig,
) -> Result<Vec<f32>, ClassifierError> {
    if signal.is_empty() {
        return Err(ClassifierError::EmptyInput);
    }
    check_finite(signal)?;

    let extractor = MfccExtractor::new(MfccConfig {
        sample_rate: cfg.sample_rate,
        n_mfcc: cfg.n_mfcc,
        n_fft: cfg.n_fft,
        hop_size: cfg.hop_size,
        ..MfccConfig::default()
    });
    let mfccs = extractor.extract(signal);
    if mfccs.is_empty() {
        // Unreachable with centered framing, but fail loudly if framing changes.
        return Err(ClassifierError::Transform {
            reason: "transform produced no frames".into(),
        });
    }

    let n_frames = mfccs.len() as f64;
    let mut mean = vec![0.0f64; cfg.n_mfcc];
    for frame in &mfccs {
        for (acc, &v) in mean.iter_mut().zip(frame.iter()) {
            *acc += v as f64;
        }
    }
    Ok(mean.into_iter().map(|v| (v / n_frames) as f32).collect())
}

/// Rejects signals with NaN or infinite samples before the transform.
fn check_finite(samples: &[f32]) -> Result<(), ClassifierError> {
    if let Some(i) = samples.iter().position(|s| !s.is_finite()) {
        return Err(ClassifierError::Transform {
            reason: format!("non-finite sample at index {i}"),
        });
    }
    Ok(())
}

/// Normalizes the frame count to exactly `max_frames`: longer inputs keep the
/// centered window, shorter inputs get zero rows appended.
fn normalize_frame_count(
    mut features: Vec<Vec<f32>>,
    max_frames: usize,
    width: usize,
) -> Vec<Vec<f32>> {
    if features.len() > max_frames {
        let start = (features.len() - max_frames) / 2;
        features.drain(..start);
        features.truncate(max_frames);
    } else {
        while features.len() < max_frames {
            features.push(vec![0.0f32; width]);
        }
    }
    features
}

/// Standardizes the whole matrix in place: subtracts the global mean and
/// divides by the global standard deviation plus `1e-8`. Matrix-wide, not
/// per-column.
fn standardize(features: &mut [Vec<f32>]) {
    let count: usize = features.iter().map(|f| f.len()).sum();
    if count == 0 {
        return;
    }

    let sum: f64 = features
        .iter()
        .flat_map(|f| f.iter())
        .map(|&v| v as f64)
        .sum();
    let mean = sum / count as f64;

    let var_sum: f64 = features
        .iter()
        .flat_map(|f| f.iter())
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum();
    let std = (var_sum / count as f64).sqrt();

    let scale = 1.0 / (std + STD_EPSILON);
    for frame in features.iter_mut() {
        for v in frame.iter_mut() {
            *v = ((*v as f64 - mean) * scale) as f32;
        }
    }
}
