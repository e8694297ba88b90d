//! MFCC extraction from mono f32 audio.
//!
//! Standard front-end for the emotion models: a centered short-time Fourier
//! analysis, a mel triangular filterbank, log compression to decibels and an
//! orthonormal DCT-II keeping the leading cepstral coefficients. Output is a
//! `[frames][n_mfcc]` f32 matrix.
//!
//! Default parameters match the trained sequence model:
//! - SampleRate: 22050
//! - WindowSize: 2048 (~93ms)
//! - HopSize: 512 (~23ms)
//! - MelBands: 128
//! - Coefficients: 13

mod dct;
mod fft;
mod mel;

/// Configuration for MFCC extraction.
#[derive(Debug, Clone)]
pub struct MfccConfig {
    /// Input sample rate in Hz.
    pub sample_rate: usize,
    /// Number of cepstral coefficients kept per frame.
    pub n_mfcc: usize,
    /// Analysis window size in samples. Must be a power of 2.
    pub n_fft: usize,
    /// Hop between successive frames in samples.
    pub hop_size: usize,
    /// Number of mel filterbank bands.
    pub n_mels: usize,
    /// Low cutoff frequency for the filterbank in Hz.
    pub low_freq: f64,
    /// High cutoff frequency; zero or negative means offset from Nyquist.
    pub high_freq: f64,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            n_mfcc: 13,
            n_fft: 2048,
            hop_size: 512,
            n_mels: 128,
            low_freq: 0.0,
            high_freq: 0.0,
        }
    }
}

/// MFCC extractor with precomputed window, filterbank and DCT basis.
pub struct MfccExtractor {
    cfg: MfccConfig,
    window: Vec<f64>,
    mel_bank: Vec<Vec<f64>>,
    dct_basis: Vec<Vec<f64>>,
}

impl MfccExtractor {
    /// Creates a new extractor with the given config.
    pub fn new(cfg: MfccConfig) -> Self {
        let high_freq = if cfg.high_freq <= 0.0 {
            cfg.sample_rate as f64 / 2.0 + cfg.high_freq
        } else {
            cfg.high_freq
        };
        let window = mel::hann_window(cfg.n_fft);
        let mel_bank =
            mel::mel_filter_bank(cfg.n_mels, cfg.n_fft, cfg.sample_rate, cfg.low_freq, high_freq);
        let dct_basis = dct::dct_basis(cfg.n_mfcc, cfg.n_mels);
        Self {
            cfg,
            window,
            mel_bank,
            dct_basis,
        }
    }

    /// Returns the configured coefficient count.
    pub fn n_mfcc(&self) -> usize {
        self.cfg.n_mfcc
    }

    /// Extracts MFCCs from mono f32 samples (range [-1, 1]).
    ///
    /// Frames are centered: the signal is reflect-padded by `n_fft / 2` on
    /// both sides, so `frames = 1 + len / hop_size`. Returns `[frames][n_mfcc]`,
    /// empty for an empty input.
    pub fn extract(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let cfg = &self.cfg;
        let n = samples.len();
        if n == 0 {
            return Vec::new();
        }

        let pad = cfg.n_fft / 2;
        let padded_len = n + 2 * pad;
        let num_frames = (padded_len - cfg.n_fft) / cfg.hop_size + 1;
        let half_fft = cfg.n_fft / 2 + 1;

        let mut features = Vec::with_capacity(num_frames);
        let mut real = vec![0.0f64; cfg.n_fft];
        let mut imag = vec![0.0f64; cfg.n_fft];
        let mut power = vec![0.0f64; half_fft];
        let mut mels = vec![0.0f64; cfg.n_mels];

        for t in 0..num_frames {
            let start = t * cfg.hop_size;

            // Window the centered frame; indices left of the signal or past
            // its end resolve by reflection.
            for i in 0..cfg.n_fft {
                let idx = start as isize + i as isize - pad as isize;
                real[i] = sample_at(samples, idx) * self.window[i];
            }
            for v in imag.iter_mut() {
                *v = 0.0;
            }
            fft::fft(&mut real, &mut imag);

            // Power spectrum over the unique bins.
            for k in 0..half_fft {
                power[k] = real[k] * real[k] + imag[k] * imag[k];
            }

            // Mel filterbank, then log compression to dB.
            for (m, out) in mels.iter_mut().enumerate() {
                let mut energy = 0.0f64;
                for (k, &w) in self.mel_bank[m].iter().enumerate() {
                    energy += w * power[k];
                }
                if energy < 1e-10 {
                    energy = 1e-10;
                }
                *out = 10.0 * energy.log10();
            }

            // DCT-II decorrelation down to n_mfcc coefficients.
            let mut frame = vec![0.0f32; cfg.n_mfcc];
            for (k, out) in frame.iter_mut().enumerate() {
                let mut acc = 0.0f64;
                for (m, &b) in self.dct_basis[k].iter().enumerate() {
                    acc += b * mels[m];
                }
                *out = acc as f32;
            }
            features.push(frame);
        }

        features
    }
}

/// Reads `samples[idx]` with reflection at both edges (no edge repeat).
fn sample_at(samples: &[f32], idx: isize) -> f64 {
    let n = samples.len();
    if n == 1 {
        return samples[0] as f64;
    }
    let period = 2 * (n as isize - 1);
    let mut k = idx.rem_euclid(period);
    if k >= n as isize {
        k = period - k;
    }
    samples[k as usize] as f64
}
