use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ClassifierError;
use crate::features::{self, SequenceConfig};
use crate::model::EmotionModel;
use crate::predict::{self, EMOTION_LABELS, Prediction};

/// Builds the model handle on first use.
pub type ModelLoader =
    Box<dyn Fn() -> Result<Arc<dyn EmotionModel>, ClassifierError> + Send + Sync>;

/// Configures a [`MoodService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Feature extraction parameters for the sequence model.
    pub sequence: SequenceConfig,
    /// Class labels, index-aligned with the model output.
    pub labels: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sequence: SequenceConfig::default(),
            labels: EMOTION_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Request-scoped classification service.
///
/// Owns everything a request handler needs: the pipeline configuration, the
/// label list, a request counter and the model handle. The model loads
/// lazily on first use behind a single-acquisition lock and is read-only
/// afterwards; a failed load leaves the handle unset so a later request may
/// retry.
///
/// All methods take `&self` and the service is `Send + Sync`, so one
/// instance serves any number of concurrent requests without external
/// synchronization.
pub struct MoodService {
    cfg: ServiceConfig,
    loader: Option<ModelLoader>,
    model: OnceCell<Arc<dyn EmotionModel>>,
    requests: AtomicU64,
}

/// Health surface for an external serving layer.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub model_loaded: bool,
    pub total_requests: u64,
}

impl MoodService {
    /// Creates a service without a model; every classification fails with
    /// [`ClassifierError::ModelUnavailable`].
    pub fn new(cfg: ServiceConfig) -> Self {
        Self {
            cfg,
            loader: None,
            model: OnceCell::new(),
            requests: AtomicU64::new(0),
        }
    }

    /// Creates a service that loads its model from `loader` on first use.
    pub fn with_loader(cfg: ServiceConfig, loader: ModelLoader) -> Self {
        Self {
            cfg,
            loader: Some(loader),
            model: OnceCell::new(),
            requests: AtomicU64::new(0),
        }
    }

    /// Loads the model eagerly instead of on the first request.
    pub fn preload(&self) -> Result<(), ClassifierError> {
        self.model().map(|_| ())
    }

    /// Classifies one decoded mono signal at the given sample rate.
    pub fn classify(&self, signal: &[f32], sample_rate: usize) -> Result<Prediction, ClassifierError> {
        let request = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(request, samples = signal.len(), sample_rate, "classify");

        let model = self.model()?;

        let mut cfg = self.cfg.sequence.clone();
        cfg.sample_rate = sample_rate;
        let features = features::extract_sequence_features(signal, &cfg)?;

        let prediction = predict::predict(model.as_ref(), &features, &self.cfg.labels)?;
        debug!(
            request,
            emotion = %prediction.predicted_emotion,
            confidence = prediction.confidence,
            "classified"
        );
        Ok(prediction)
    }

    /// Reports whether the model is loaded and how many requests were served.
    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            model_loaded: self.model.get().is_some(),
            total_requests: self.requests.load(Ordering::Relaxed),
        }
    }

    fn model(&self) -> Result<Arc<dyn EmotionModel>, ClassifierError> {
        let loader = self
            .loader
            .as_ref()
            .ok_or(ClassifierError::ModelUnavailable)?;
        // get_or_try_init leaves the cell empty on error, which is what
        // permits the lazy retry after a failed initial load.
        self.model
            .get_or_try_init(|| {
                debug!("loading emotion model");
                loader().inspect_err(|e| warn!(error = %e, "model load failed"))
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use std::sync::atomic::AtomicUsize;

    struct StubModel(Vec<f32>);

    impl EmotionModel for StubModel {
        fn infer(&self, _features: &[f32], _shape: &[usize]) -> Result<Vec<f32>, ClassifierError> {
            Ok(self.0.clone())
        }

        fn num_classes(&self) -> usize {
            self.0.len()
        }
    }

    fn make_sine(freq_hz: f64, n_samples: usize, sample_rate: usize) -> Vec<f32> {
        (0..n_samples)
            .map(|i| (2.0 * PI * freq_hz * i as f64 / sample_rate as f64).sin() as f32)
            .collect()
    }

    fn stub_loader() -> ModelLoader {
        Box::new(|| {
            Ok(Arc::new(StubModel(vec![0.05, 0.05, 0.1, 0.6, 0.1, 0.05, 0.05]))
                as Arc<dyn EmotionModel>)
        })
    }

    #[test]
    fn classify_with_stub_model() {
        let service = MoodService::with_loader(ServiceConfig::default(), stub_loader());
        let signal = make_sine(440.0, 22050, 22050);

        let p = service.classify(&signal, 22050).unwrap();
        assert_eq!(p.predicted_emotion, "happy");
        assert_eq!(p.status, "success");

        let status = service.status();
        assert!(status.model_loaded);
        assert_eq!(status.total_requests, 1);
    }

    #[test]
    fn no_model_configured() {
        let service = MoodService::new(ServiceConfig::default());
        let signal = make_sine(440.0, 22050, 22050);

        assert!(matches!(
            service.classify(&signal, 22050),
            Err(ClassifierError::ModelUnavailable)
        ));
        assert!(!service.status().model_loaded);
    }

    #[test]
    fn failed_load_retries_on_next_request() {
        static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

        let loader: ModelLoader = Box::new(|| {
            if ATTEMPTS.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ClassifierError::ModelUnavailable)
            } else {
                Ok(Arc::new(StubModel(vec![1.0])) as Arc<dyn EmotionModel>)
            }
        });
        let service = MoodService::with_loader(ServiceConfig::default(), loader);
        let signal = make_sine(440.0, 22050, 22050);

        assert!(service.classify(&signal, 22050).is_err());
        assert!(!service.status().model_loaded);

        assert!(service.classify(&signal, 22050).is_ok());
        assert!(service.status().model_loaded);
        assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn model_loads_once() {
        static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

        let loader: ModelLoader = Box::new(|| {
            ATTEMPTS.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(StubModel(vec![1.0])) as Arc<dyn EmotionModel>)
        });
        let service = MoodService::with_loader(ServiceConfig::default(), loader);
        let signal = make_sine(440.0, 22050, 22050);

        service.classify(&signal, 22050).unwrap();
        service.classify(&signal, 22050).unwrap();
        assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 1);
        assert_eq!(service.status().total_requests, 2);
    }

    #[test]
    fn preload_warms_the_model() {
        let service = MoodService::with_loader(ServiceConfig::default(), stub_loader());
        assert!(!service.status().model_loaded);
        service.preload().unwrap();
        assert!(service.status().model_loaded);
    }

    #[test]
    fn classify_propagates_pipeline_errors() {
        let service = MoodService::with_loader(ServiceConfig::default(), stub_loader());
        let err = service.classify(&[], 22050).unwrap_err();
        assert_eq!(err.status(), "input_error");
    }
}
