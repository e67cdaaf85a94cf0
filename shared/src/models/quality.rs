//! Fabric quality models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fabric quality with its baseline processing rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityType {
    pub id: Uuid,
    pub name: String,
    /// Rate per meter charged when no party-specific override exists
    pub default_rate_per_meter: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Display for QualityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/m)", self.name, self.default_rate_per_meter)
    }
}
