//! Pricing models and effective-rate resolution

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::quality::QualityType;

/// Party-specific rate override for one quality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyQualityRate {
    pub id: Uuid,
    #[serde(rename = "party")]
    pub party_id: Uuid,
    #[serde(rename = "quality_type")]
    pub quality_id: Uuid,
    pub rate_per_meter: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a resolved rate came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    PartySpecific,
    QualityDefault,
    Fallback,
}

impl std::fmt::Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateSource::PartySpecific => write!(f, "party specific"),
            RateSource::QualityDefault => write!(f, "quality default"),
            RateSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// The per-meter rate applicable to a (party, quality) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffectiveRate {
    pub rate: Decimal,
    pub source: RateSource,
}

/// Resolve the effective rate from local snapshots: the party override wins,
/// then a non-zero quality default, then zero.
pub fn resolve_effective_rate(
    party_id: Uuid,
    quality_id: Uuid,
    overrides: &[PartyQualityRate],
    qualities: &[QualityType],
) -> EffectiveRate {
    if let Some(custom) = overrides
        .iter()
        .find(|r| r.party_id == party_id && r.quality_id == quality_id)
    {
        return EffectiveRate {
            rate: custom.rate_per_meter,
            source: RateSource::PartySpecific,
        };
    }

    if let Some(quality) = qualities.iter().find(|q| q.id == quality_id) {
        if quality.default_rate_per_meter > Decimal::ZERO {
            return EffectiveRate {
                rate: quality.default_rate_per_meter,
                source: RateSource::QualityDefault,
            };
        }
    }

    EffectiveRate {
        rate: Decimal::ZERO,
        source: RateSource::Fallback,
    }
}
