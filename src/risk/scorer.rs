// Deterministic risk scoring over a snapshot batch of asset records
use tracing::{debug, info};

use crate::models::{AssetRecord, RatioFallback, RiskLabel, ScoredAsset};
use crate::risk::{RiskError, SCORE_SCALE, VOLATILITY_WEIGHT, VOLUME_RATIO_WEIGHT};

/// Configuration for the deterministic scorer.
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    /// Ceiling applied to the volume/market-cap ratio when market cap is 0
    /// but volume is positive, in place of an unbounded ratio.
    pub zero_cap_ratio_ceiling: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            zero_cap_ratio_ceiling: 10.0,
        }
    }
}

/// Pure transform from raw asset records to scored assets.
///
/// No randomness, no hidden state: output depends only on the input batch
/// and its order (the prior price feeds the next record's volatility).
pub struct RiskScorer {
    config: ScorerConfig,
}

impl RiskScorer {
    pub fn new() -> Self {
        Self {
            config: ScorerConfig::default(),
        }
    }

    pub fn with_config(config: ScorerConfig) -> Self {
        Self { config }
    }

    /// Validate the caller contract for a single record.
    pub fn validate_record(&self, record: &AssetRecord) -> Result<(), RiskError> {
        let invalid = |reason: &str| RiskError::InvalidRecord {
            symbol: if record.symbol.is_empty() {
                record.id.clone()
            } else {
                record.symbol.clone()
            },
            reason: reason.to_string(),
        };

        if record.id.is_empty() || record.symbol.is_empty() || record.name.is_empty() {
            return Err(invalid("identifying fields must be non-empty"));
        }

        for (field, value) in [
            ("current_price", record.current_price),
            ("market_cap", record.market_cap),
            ("total_volume", record.total_volume),
        ] {
            if !value.is_finite() {
                return Err(invalid(&format!("{} must be finite", field)));
            }
            if value < 0.0 {
                return Err(invalid(&format!("{} must be non-negative", field)));
            }
        }

        Ok(())
    }

    /// Fractional price change relative to an explicit prior observation.
    ///
    /// The prior price is a parameter rather than implicit positional state
    /// so callers cannot silently corrupt volatility by reordering a
    /// collection. A zero prior is treated as a missing reference and yields
    /// 0.0 instead of a non-finite value.
    pub fn volatility_between(&self, prior_price: f64, price: f64) -> f64 {
        if prior_price == 0.0 {
            return 0.0;
        }
        (price - prior_price) / prior_price
    }

    /// Volume/market-cap ratio with the documented zero-market-cap policy.
    pub fn volume_ratio(&self, record: &AssetRecord) -> (f64, Option<RatioFallback>) {
        if record.market_cap == 0.0 {
            if record.total_volume == 0.0 {
                debug!(
                    symbol = %record.symbol,
                    "Zero market cap with zero volume, ratio defined as 0"
                );
                return (0.0, Some(RatioFallback::ZeroVolume));
            }

            debug!(
                symbol = %record.symbol,
                total_volume = record.total_volume,
                ceiling = self.config.zero_cap_ratio_ceiling,
                "Zero market cap with positive volume, ratio capped at ceiling"
            );
            return (
                self.config.zero_cap_ratio_ceiling,
                Some(RatioFallback::CappedAtCeiling),
            );
        }

        (record.total_volume / record.market_cap, None)
    }

    /// Weighted combination of volatility and the volume ratio on a 0-100
    /// scale. Not clamped: scores exceed 100 when volume exceeds market cap.
    pub fn risk_score(&self, volatility: f64, volume_ratio: f64) -> f64 {
        (volatility * VOLATILITY_WEIGHT + volume_ratio * VOLUME_RATIO_WEIGHT) * SCORE_SCALE
    }

    /// Score a single record against an explicit prior price.
    ///
    /// `prior_price` is `None` for the first record of a batch.
    pub fn score_record(
        &self,
        record: &AssetRecord,
        prior_price: Option<f64>,
    ) -> Result<ScoredAsset, RiskError> {
        self.validate_record(record)?;

        let volatility = match prior_price {
            Some(prior) => self.volatility_between(prior, record.current_price),
            None => 0.0,
        };
        let (ratio, ratio_fallback) = self.volume_ratio(record);
        let risk_score = self.risk_score(volatility, ratio);
        let risk_label = RiskLabel::from_score(risk_score);

        Ok(ScoredAsset {
            asset: record.clone(),
            volatility,
            risk_score,
            risk_label,
            ratio_fallback,
        })
    }

    /// Score a whole batch, threading each record's price into the next
    /// record's volatility. Fails fast on the first invalid record.
    pub fn score_batch(&self, records: &[AssetRecord]) -> Result<Vec<ScoredAsset>, RiskError> {
        let mut scored = Vec::with_capacity(records.len());
        let mut prior_price = None;

        for record in records {
            scored.push(self.score_record(record, prior_price)?);
            prior_price = Some(record.current_price);
        }

        info!(
            batch_size = records.len(),
            fallbacks = scored.iter().filter(|s| s.ratio_fallback.is_some()).count(),
            "Scored asset batch"
        );

        Ok(scored)
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}
