//! Mono sample-rate conversion via rubato.

use rubato::{FftFixedInOut, Resampler};

use crate::AudioError;

/// Frames per processing block.
const CHUNK_SIZE: usize = 1024;

/// Resamples mono f32 samples from `src_rate` to `dst_rate`.
///
/// Uses an FFT-based synchronous resampler in fixed-size blocks; the tail
/// block is zero-padded and the output is trimmed to the expected length
/// `round(len * dst_rate / src_rate)`.
pub fn resample(samples: &[f32], src_rate: usize, dst_rate: usize) -> Result<Vec<f32>, AudioError> {
    if src_rate == 0 || dst_rate == 0 {
        return Err(AudioError::Resample("zero sample rate".into()));
    }
    if src_rate == dst_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedInOut::<f32>::new(src_rate, dst_rate, CHUNK_SIZE, 1)?;

    let expected =
        ((samples.len() as f64) * dst_rate as f64 / src_rate as f64).round() as usize;
    let mut out: Vec<f32> = Vec::with_capacity(expected + CHUNK_SIZE);

    let mut pos = 0usize;
    while pos < samples.len() {
        let need = resampler.input_frames_next();
        let take = need.min(samples.len() - pos);
        let mut chunk = vec![0.0f32; need];
        chunk[..take].copy_from_slice(&samples[pos..pos + take]);
        pos += take;

        let processed = resampler.process(&[chunk], None)?;
        out.extend_from_slice(&processed[0]);
    }

    out.truncate(expected);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sine(freq_hz: f64, n_samples: usize, sample_rate: usize) -> Vec<f32> {
        (0..n_samples)
            .map(|i| {
                (2.0 * std::f64::consts::PI * freq_hz * i as f64 / sample_rate as f64).sin() as f32
            })
            .collect()
    }

    #[test]
    fn same_rate_passthrough() {
        let signal = make_sine(440.0, 4410, 22050);
        let out = resample(&signal, 22050, 22050).unwrap();
        assert_eq!(out, signal);
    }

    #[test]
    fn empty_input() {
        let out = resample(&[], 44100, 22050).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn zero_rate_rejected() {
        assert!(matches!(
            resample(&[0.0; 10], 0, 22050),
            Err(AudioError::Resample(_))
        ));
        assert!(matches!(
            resample(&[0.0; 10], 22050, 0),
            Err(AudioError::Resample(_))
        ));
    }

    #[test]
    fn downsample_length() {
        let signal = make_sine(440.0, 44100, 44100);
        let out = resample(&signal, 44100, 22050).unwrap();
        assert_eq!(out.len(), 22050);
        for &v in &out {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn upsample_length() {
        let signal = make_sine(200.0, 8000, 8000);
        let out = resample(&signal, 8000, 22050).unwrap();
        assert_eq!(out.len(), 22050);
    }

    #[test]
    fn silence_stays_silent() {
        let out = resample(&vec![0.0f32; 16000], 16000, 22050).unwrap();
        for &v in &out {
            assert!(v.abs() < 1e-6);
        }
    }

    #[test]
    fn amplitude_is_preserved() {
        // A mid-band tone should come through at roughly unit amplitude.
        let signal = make_sine(1000.0, 44100, 44100);
        let out = resample(&signal, 44100, 22050).unwrap();
        // Skip the block edges and look at the steady-state peak.
        let peak = out[2048..out.len() - 2048]
            .iter()
            .fold(0.0f32, |m, &v| m.max(v.abs()));
        assert!((peak - 1.0).abs() < 0.05, "peak {peak}");
    }
}
