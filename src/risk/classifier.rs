// Supervised risk label classifier over (market_cap, total_volume, volatility)
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::model_selection::train_test_split;
use tracing::{debug, info};

use crate::models::RiskLabel;
use crate::risk::RiskError;

/// Minimum number of training examples accepted by `train`.
pub const MIN_TRAINING_EXAMPLES: usize = 2;

/// Configuration for classifier training.
///
/// Split ratio, seed and ensemble size are configuration, not semantics;
/// the seed is threaded explicitly so there is no hidden global randomness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Number of trees in the random forest ensemble.
    pub n_trees: u16,
    /// Seed for both the train/evaluation split and the forest fit.
    pub seed: u64,
    /// Fraction of examples held out for evaluation.
    pub evaluation_fraction: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            evaluation_fraction: 0.2,
        }
    }
}

/// Summary of one training run, returned to the caller alongside the fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Fraction of held-out predictions that exactly matched the true label.
    pub accuracy: f64,
    pub training_examples: usize,
    pub evaluation_examples: usize,
    pub trained_at: DateTime<Utc>,
}

/// The fitted model behind a trained classifier.
///
/// A batch where every example carries the same label cannot grow a forest
/// (the ensemble needs at least two classes), so it degenerates to a
/// constant predictor for that label.
#[derive(Debug)]
enum TrainedModel {
    Constant(RiskLabel),
    Forest(RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>),
}

/// Multi-class risk label classifier.
///
/// State machine is `Untrained -> Trained`; a second `train` call replaces
/// the prior fit entirely. After training the model is read-only: `predict`
/// takes `&self` and holds no reference back to the training batch, so
/// concurrent reads of a trained instance are safe.
#[derive(Debug)]
pub struct RiskClassifier {
    config: ClassifierConfig,
    model: Option<TrainedModel>,
}

impl RiskClassifier {
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
            model: None,
        }
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Fit the forest on (market_cap, total_volume, volatility) -> label
    /// pairs and report held-out evaluation accuracy.
    ///
    /// A single-class batch is accepted as a degenerate fit. When the batch
    /// is so small that the rounded evaluation split is empty, accuracy is
    /// measured on the training subset instead.
    pub fn train(
        &mut self,
        features: &[[f64; 3]],
        labels: &[RiskLabel],
    ) -> Result<TrainingReport, RiskError> {
        if features.len() != labels.len() {
            return Err(RiskError::FeatureShapeMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }
        if features.len() < MIN_TRAINING_EXAMPLES {
            return Err(RiskError::InsufficientData {
                required: MIN_TRAINING_EXAMPLES,
                actual: features.len(),
            });
        }

        // The forest needs at least two classes; a uniform batch degenerates
        // to a constant predictor for its only label
        let first_label = labels[0];
        if labels.iter().all(|label| *label == first_label) {
            info!(
                total = labels.len(),
                label = %first_label,
                "Single-class batch, fitting constant predictor"
            );
            self.model = Some(TrainedModel::Constant(first_label));
            return Ok(TrainingReport {
                accuracy: 1.0,
                training_examples: labels.len(),
                evaluation_examples: 0,
                trained_at: Utc::now(),
            });
        }

        let x = feature_matrix(features);
        let y: Vec<u32> = labels.iter().map(RiskLabel::class_index).collect();

        let parameters = RandomForestClassifierParameters::default()
            .with_n_trees(self.config.n_trees)
            .with_seed(self.config.seed);

        // The split truncates, so tiny batches would carve out an empty
        // evaluation subset; fit on everything and evaluate in-sample instead
        let eval_rows = (features.len() as f32 * self.config.evaluation_fraction) as usize;
        let (forest, accuracy, training_examples, evaluation_examples) = if eval_rows == 0 {
            debug!(
                total = features.len(),
                n_trees = self.config.n_trees,
                seed = self.config.seed,
                "Batch too small for a held-out split, evaluating on the training subset"
            );
            let forest = fit_forest(&x, &y, parameters)?;
            let predicted = predict_forest(&forest, &x)?;
            (forest, fraction_matching(&predicted, &y), y.len(), 0)
        } else {
            let (x_train, x_eval, y_train, y_eval) = train_test_split(
                &x,
                &y,
                self.config.evaluation_fraction,
                true,
                Some(self.config.seed),
            );
            debug!(
                total = features.len(),
                training = y_train.len(),
                evaluation = y_eval.len(),
                n_trees = self.config.n_trees,
                seed = self.config.seed,
                "Fitting risk label classifier"
            );
            let forest = fit_forest(&x_train, &y_train, parameters)?;
            let predicted = predict_forest(&forest, &x_eval)?;
            (
                forest,
                fraction_matching(&predicted, &y_eval),
                y_train.len(),
                y_eval.len(),
            )
        };

        let report = TrainingReport {
            accuracy,
            training_examples,
            evaluation_examples,
            trained_at: Utc::now(),
        };

        info!(
            accuracy = report.accuracy,
            training_examples = report.training_examples,
            evaluation_examples = report.evaluation_examples,
            "Trained risk label classifier"
        );

        self.model = Some(TrainedModel::Forest(forest));
        Ok(report)
    }

    /// Predict labels for feature tuples in the same
    /// (market_cap, total_volume, volatility) order used at training time.
    pub fn predict(&self, features: &[[f64; 3]]) -> Result<Vec<RiskLabel>, RiskError> {
        let model = self.model.as_ref().ok_or(RiskError::NotTrained)?;

        if features.is_empty() {
            return Ok(Vec::new());
        }

        match model {
            TrainedModel::Constant(label) => Ok(vec![*label; features.len()]),
            TrainedModel::Forest(forest) => {
                let x = feature_matrix(features);
                let predicted = forest
                    .predict(&x)
                    .map_err(|err| RiskError::PredictionFailed {
                        message: err.to_string(),
                    })?;

                predicted
                    .into_iter()
                    .map(|index| {
                        RiskLabel::from_class_index(index).ok_or(RiskError::PredictionFailed {
                            message: format!("model produced unknown class index {}", index),
                        })
                    })
                    .collect()
            }
        }
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn feature_matrix(features: &[[f64; 3]]) -> DenseMatrix<f64> {
    let rows: Vec<Vec<f64>> = features.iter().map(|row| row.to_vec()).collect();
    DenseMatrix::from_2d_vec(&rows)
}

fn fit_forest(
    x: &DenseMatrix<f64>,
    y: &Vec<u32>,
    parameters: RandomForestClassifierParameters,
) -> Result<RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>, RiskError> {
    RandomForestClassifier::fit(x, y, parameters).map_err(|err| RiskError::TrainingFailed {
        message: err.to_string(),
    })
}

fn predict_forest(
    forest: &RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>,
    x: &DenseMatrix<f64>,
) -> Result<Vec<u32>, RiskError> {
    forest.predict(x).map_err(|err| RiskError::TrainingFailed {
        message: err.to_string(),
    })
}

fn fraction_matching(predicted: &[u32], truth: &[u32]) -> f64 {
    let matches = predicted
        .iter()
        .zip(truth.iter())
        .filter(|(pred, actual)| pred == actual)
        .count();
    matches as f64 / truth.len() as f64
}
