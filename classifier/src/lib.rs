//! Audio emotion classification: MFCC feature pipeline and inference wrapper.
//!
//! # Architecture
//!
//! A request flows through three stages:
//!
//! 1. [`extract_sequence_features`]: mono f32 audio -> fixed
//!    `max_frames x n_mfcc` feature matrix (default 100 x 13)
//! 2. [`predict`]: feature matrix + [`EmotionModel`] -> [`Prediction`]
//! 3. [`MoodService`]: owns configuration, labels and the lazily loaded
//!    model handle; one [`MoodService::classify`] call per request
//!
//! The non-sequential variant, [`extract_averaged_features`], collapses the
//! time axis into a single vector (default 40 coefficients) and skips the
//! global standardization; the two operations are deliberately distinct.
//!
//! # Feature Extraction
//!
//! The [`mfcc`] module provides the shared cepstral front-end:
//! - periodic Hann window, 2048-sample frames, 512-sample hop
//! - centered framing with edge reflection
//! - mel triangular filterbank, log compression to dB
//! - orthonormal DCT-II decorrelation
//!
//! # Concurrency
//!
//! Feature extraction is pure computation over caller-owned buffers. The
//! only shared state is the model handle inside [`MoodService`], initialized
//! once and read-only afterwards, so requests run concurrently without
//! synchronization.

mod error;
mod features;
pub mod mfcc;
mod model;
mod predict;
mod service;

pub use error::ClassifierError;
pub use features::{
    AveragedConfig, SequenceConfig, extract_averaged_features, extract_sequence_features,
};
pub use model::EmotionModel;
pub use predict::{EMOTION_LABELS, Prediction, predict, predict_vector};
pub use service::{ModelLoader, MoodService, ServiceConfig, ServiceStatus};
