use serde::{Deserialize, Serialize};
use std::fmt;

use crate::risk::{LOW_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};

/// One DeFi asset row from an upstream market-data snapshot.
///
/// Identifying strings are opaque but must be non-empty; numeric fields are
/// USD amounts and must be non-negative and finite. Batch order is whatever
/// the upstream source produced and matters only for volatility derivation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetRecord {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
}

/// Coarse risk tier derived from the continuous risk score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    /// Map a risk score onto a tier. Boundary values land on the lower tier:
    /// exactly 33.0 is Low, exactly 66.0 is Medium.
    pub fn from_score(score: f64) -> Self {
        if score <= LOW_RISK_THRESHOLD {
            RiskLabel::Low
        } else if score <= MEDIUM_RISK_THRESHOLD {
            RiskLabel::Medium
        } else {
            RiskLabel::High
        }
    }

    /// Numeric class index used for classifier training.
    pub fn class_index(&self) -> u32 {
        match self {
            RiskLabel::Low => 0,
            RiskLabel::Medium => 1,
            RiskLabel::High => 2,
        }
    }

    /// Inverse of `class_index`.
    pub fn from_class_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(RiskLabel::Low),
            1 => Some(RiskLabel::Medium),
            2 => Some(RiskLabel::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "Low"),
            RiskLabel::Medium => write!(f, "Medium"),
            RiskLabel::High => write!(f, "High"),
        }
    }
}

/// Marker recorded when the volume/market-cap ratio could not be computed
/// directly and the documented zero-market-cap policy was applied instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RatioFallback {
    /// `market_cap == 0` and `total_volume == 0`: ratio defined as 0.
    ZeroVolume,
    /// `market_cap == 0` with positive volume: ratio clamped to the
    /// configured ceiling instead of propagating infinity.
    CappedAtCeiling,
}

/// An asset record plus its derived risk fields.
///
/// Produced by a pure transform; the input record is carried unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredAsset {
    pub asset: AssetRecord,
    /// Fractional price change relative to the previous record in batch
    /// order; 0.0 for the first record or when the prior price is 0.
    pub volatility: f64,
    /// Generally within [0, 100] but unbounded above when trading volume
    /// exceeds market capitalization.
    pub risk_score: f64,
    pub risk_label: RiskLabel,
    /// Present only when the zero-market-cap division policy fired.
    pub ratio_fallback: Option<RatioFallback>,
}
