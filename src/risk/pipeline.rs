// Batch risk analysis pipeline: score -> derive training set -> train
use tracing::info;

use crate::models::{AssetRecord, RiskLabel, ScoredAsset};
use crate::risk::{
    ClassifierConfig, RiskClassifier, RiskError, RiskScorer, ScorerConfig, TrainingReport,
};

/// Everything one batch run produces.
///
/// The classifier is owned by this value and holds no reference back to the
/// batch that trained it; nothing persists between runs.
#[derive(Debug)]
pub struct RiskAnalysis {
    pub scored: Vec<ScoredAsset>,
    pub classifier: RiskClassifier,
    pub report: TrainingReport,
}

/// Wires the scorer and the classifier together for one stateless batch run.
///
/// Each `analyze` call constructs and returns a fresh classifier, so
/// concurrent callers never share mutable state.
pub struct RiskPipeline {
    scorer: RiskScorer,
    classifier_config: ClassifierConfig,
}

impl RiskPipeline {
    pub fn new() -> Self {
        Self {
            scorer: RiskScorer::new(),
            classifier_config: ClassifierConfig::default(),
        }
    }

    pub fn with_config(scorer_config: ScorerConfig, classifier_config: ClassifierConfig) -> Self {
        Self {
            scorer: RiskScorer::with_config(scorer_config),
            classifier_config,
        }
    }

    /// Project scored assets onto (market_cap, total_volume, volatility)
    /// feature tuples and their risk labels.
    pub fn training_set(scored: &[ScoredAsset]) -> (Vec<[f64; 3]>, Vec<RiskLabel>) {
        let features = scored
            .iter()
            .map(|s| [s.asset.market_cap, s.asset.total_volume, s.volatility])
            .collect();
        let labels = scored.iter().map(|s| s.risk_label).collect();
        (features, labels)
    }

    /// Run the full sequential pass over one snapshot batch: score every
    /// record, train a fresh classifier on the scorer's own output, and
    /// bundle the results.
    pub fn analyze(&self, records: &[AssetRecord]) -> Result<RiskAnalysis, RiskError> {
        info!(batch_size = records.len(), "Starting batch risk analysis");

        let scored = self.scorer.score_batch(records)?;
        let (features, labels) = Self::training_set(&scored);

        let mut classifier = RiskClassifier::with_config(self.classifier_config.clone());
        let report = classifier.train(&features, &labels)?;

        info!(
            batch_size = scored.len(),
            accuracy = report.accuracy,
            "Completed batch risk analysis"
        );

        Ok(RiskAnalysis {
            scored,
            classifier,
            report,
        })
    }
}

impl Default for RiskPipeline {
    fn default() -> Self {
        Self::new()
    }
}
