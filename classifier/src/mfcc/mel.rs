//! Window and mel filterbank generation.

use std::f64::consts::PI;

/// Generates a periodic Hann window of the given length.
pub fn hann_window(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n as f64).cos()))
        .collect()
}

/// Converts frequency in Hz to mel scale.
fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Converts mel scale frequency back to Hz.
fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Creates the mel filterbank matrix.
///
/// Returns `[n_mels][half_fft]` where `half_fft = fft_size / 2 + 1`.
pub fn mel_filter_bank(
    n_mels: usize,
    fft_size: usize,
    sample_rate: usize,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let low_mel = hz_to_mel(low_freq);
    let high_mel = hz_to_mel(high_freq);

    // n_mels + 2 equally spaced mel points
    let step = (high_mel - low_mel) / (n_mels + 1) as f64;
    let mel_points: Vec<f64> = (0..n_mels + 2)
        .map(|i| low_mel + i as f64 * step)
        .collect();

    // Convert mel points to FFT bin indices
    let mut bins: Vec<usize> = mel_points
        .iter()
        .map(|&m| {
            let hz = mel_to_hz(m);
            let bin = (hz * fft_size as f64 / sample_rate as f64).round() as usize;
            bin.min(half_fft - 1)
        })
        .collect();

    // Ensure each filter has at least 1 bin width
    for i in 1..bins.len() {
        if bins[i] <= bins[i - 1] {
            bins[i] = bins[i - 1] + 1;
        }
    }

    // Create triangular filters
    let mut bank = Vec::with_capacity(n_mels);
    for m in 0..n_mels {
        let mut filter = vec![0.0f64; half_fft];
        let left = bins[m];
        let center = bins[m + 1];
        let right = bins[m + 2];

        for k in left..center.min(half_fft) {
            if center != left {
                filter[k] = (k - left) as f64 / (center - left) as f64;
            }
        }
        for k in center..=right.min(half_fft - 1) {
            if right != center {
                filter[k] = (right - k) as f64 / (right - center) as f64;
            }
        }
        bank.push(filter);
    }
    bank
}
