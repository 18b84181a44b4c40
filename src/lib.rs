// DeFi asset risk scoring and classification core
//
// Turns a snapshot batch of market records into risk scores and coarse
// risk tiers, then fits a classifier that reproduces the tier from a
// reduced feature set so ad hoc inputs can be scored interactively.
// Data collection, presentation and persistence live outside this crate.

pub mod models;
pub mod risk;

// Re-export the main entry points
pub use models::{AssetRecord, RatioFallback, RiskLabel, ScoredAsset};
pub use risk::{
    ClassifierConfig, RiskAnalysis, RiskClassifier, RiskError, RiskPipeline, RiskScorer,
    ScorerConfig, TrainingReport,
};
