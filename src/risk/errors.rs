// Risk pipeline error types
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Invalid asset record '{symbol}': {reason}")]
    InvalidRecord { symbol: String, reason: String },

    #[error("Feature/label length mismatch: {features} features vs {labels} labels")]
    FeatureShapeMismatch { features: usize, labels: usize },

    #[error("Insufficient training data: need at least {required} examples, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Classifier has not been trained yet")]
    NotTrained,

    #[error("Model training failed: {message}")]
    TrainingFailed { message: String },

    #[error("Model prediction failed: {message}")]
    PredictionFailed { message: String },
}
