// Risk scoring and classification pipeline
// Deterministic scorer plus a supervised classifier trained on its output

pub mod classifier;
pub mod errors;
pub mod pipeline;
pub mod scorer;

// Re-export main types
pub use classifier::{ClassifierConfig, RiskClassifier, TrainingReport};
pub use errors::RiskError;
pub use pipeline::{RiskAnalysis, RiskPipeline};
pub use scorer::{RiskScorer, ScorerConfig};

/// Weight of volatility in the risk score formula.
pub const VOLATILITY_WEIGHT: f64 = 0.4;

/// Weight of the volume/market-cap ratio in the risk score formula.
pub const VOLUME_RATIO_WEIGHT: f64 = 0.6;

/// Score multiplier that brings the weighted sum onto a 0-100 scale.
pub const SCORE_SCALE: f64 = 100.0;

/// Scores at or below this threshold classify as Low risk.
pub const LOW_RISK_THRESHOLD: f64 = 33.0;

/// Scores at or below this threshold (and above the Low threshold)
/// classify as Medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 66.0;
