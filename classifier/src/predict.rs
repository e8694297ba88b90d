use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ClassifierError;
use crate::model::EmotionModel;

/// Default emotion label set, index-aligned with the sequence model output.
pub const EMOTION_LABELS: [&str; 7] = [
    "angry", "disgust", "fear", "happy", "neutral", "sad", "surprise",
];

/// Epsilon inside the entropy logarithm, guarding against log(0).
const ENTROPY_EPSILON: f64 = 1e-8;

/// One classification result, serialized with the wire field names.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Label with the highest probability.
    pub predicted_emotion: String,
    /// Probability of the predicted label.
    pub confidence: f32,
    /// Full label -> probability mapping.
    pub all_predictions: BTreeMap<String, f32>,
    /// Shannon entropy of the probability vector.
    pub uncertainty: f32,
    /// Always `"success"`; failures serialize separately.
    pub status: &'static str,
}

/// Runs the model on a sequence feature matrix and scores the output.
///
/// The matrix gains a leading batch axis before inference. Fails with
/// [`ClassifierError::EmptyFeatures`] when the matrix has no elements and
/// [`ClassifierError::Prediction`] when the model call fails or returns a
/// degenerate output.
pub fn predict(
    model: &dyn EmotionModel,
    features: &[Vec<f32>],
    labels: &[String],
) -> Result<Prediction, ClassifierError> {
    if features.is_empty() || features[0].is_empty() {
        return Err(ClassifierError::EmptyFeatures);
    }

    let rows = features.len();
    let cols = features[0].len();
    let mut flat = Vec::with_capacity(rows * cols);
    for row in features {
        flat.extend_from_slice(row);
    }

    score(model, &flat, &[1, rows, cols], labels)
}

/// Runs the model on an averaged feature vector and scores the output.
pub fn predict_vector(
    model: &dyn EmotionModel,
    features: &[f32],
    labels: &[String],
) -> Result<Prediction, ClassifierError> {
    if features.is_empty() {
        return Err(ClassifierError::EmptyFeatures);
    }
    score(model, features, &[1, features.len()], labels)
}

fn score(
    model: &dyn EmotionModel,
    features: &[f32],
    shape: &[usize],
    labels: &[String],
) -> Result<Prediction, ClassifierError> {
    let probs = model.infer(features, shape)?;
    if probs.is_empty() {
        return Err(ClassifierError::Prediction("model returned no output".into()));
    }
    if probs.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(ClassifierError::Prediction(
            "model returned invalid probabilities".into(),
        ));
    }

    // Argmax; the first index wins on ties.
    let mut top = 0usize;
    for (i, &p) in probs.iter().enumerate() {
        if p > probs[top] {
            top = i;
        }
    }

    let mut all_predictions = BTreeMap::new();
    for (i, &p) in probs.iter().enumerate() {
        all_predictions.insert(label_for(labels, i), p);
    }

    Ok(Prediction {
        predicted_emotion: label_for(labels, top),
        confidence: probs[top],
        all_predictions,
        uncertainty: entropy(&probs),
        status: "success",
    })
}

/// Label for an output index; indices past the label list become `class_<i>`.
fn label_for(labels: &[String], index: usize) -> String {
    match labels.get(index) {
        Some(label) => label.clone(),
        None => format!("class_{index}"),
    }
}

/// Shannon entropy `-sum(p * ln(p + 1e-8))` over the probability vector.
fn entropy(probs: &[f32]) -> f32 {
    let sum: f64 = probs
        .iter()
        .map(|&p| p as f64 * (p as f64 + ENTROPY_EPSILON).ln())
        .sum();
    (-sum) as f32
}
