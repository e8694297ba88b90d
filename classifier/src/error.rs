use thiserror::Error;

/// Errors returned by classification operations.
///
/// Every failure is recoverable at the request boundary: callers convert the
/// error into a wire-level status via [`ClassifierError::status`] and keep
/// serving. None of these causes is transient, so callers must not retry the
/// same input.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("empty input signal")]
    EmptyInput,

    #[error("feature transform failed: {reason}")]
    Transform { reason: String },

    #[error("no model loaded")]
    ModelUnavailable,

    #[error("empty feature matrix")]
    EmptyFeatures,

    #[error("prediction failed: {0}")]
    Prediction(String),
}

impl ClassifierError {
    /// Stable status token for the wire-level `status` field.
    pub fn status(&self) -> &'static str {
        match self {
            ClassifierError::EmptyInput => "input_error",
            ClassifierError::Transform { .. } => "feature_error",
            ClassifierError::EmptyFeatures => "feature_error",
            ClassifierError::ModelUnavailable => "model_error",
            ClassifierError::Prediction(_) => "prediction_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tokens() {
        assert_eq!(ClassifierError::EmptyInput.status(), "input_error");
        assert_eq!(
            ClassifierError::Transform { reason: "x".into() }.status(),
            "feature_error"
        );
        assert_eq!(ClassifierError::EmptyFeatures.status(), "feature_error");
        assert_eq!(ClassifierError::ModelUnavailable.status(), "model_error");
        assert_eq!(
            ClassifierError::Prediction("x".into()).status(),
            "prediction_error"
        );
    }

    #[test]
    fn display_is_human_readable() {
        let err = ClassifierError::Transform {
            reason: "non-finite sample at index 3".into(),
        };
        assert_eq!(
            err.to_string(),
            "feature transform failed: non-finite sample at index 3"
        );
    }
}
