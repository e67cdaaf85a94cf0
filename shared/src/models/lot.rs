//! Inward stock lot models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A received fabric lot whose balance depletes as programs consume it.
///
/// Lots are owned by the backend; the client holds read-only snapshots and
/// never mutates balances locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLot {
    pub id: Uuid,
    /// Server-assigned number (e.g., "LOT-2024-001")
    pub lot_number: String,
    #[serde(rename = "party")]
    pub party_id: Uuid,
    pub party_name: String,
    #[serde(rename = "quality_type")]
    pub quality_id: Uuid,
    pub quality_name: String,
    pub total_meters: Decimal,
    pub current_balance: Decimal,
    pub inward_date: NaiveDate,
    pub fiscal_year: i32,
    /// Lots from GSTIN-registered and unregistered transactions are never
    /// mixed on one program
    pub is_gstin_registered: bool,
    #[serde(default)]
    pub lr_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockLot {
    /// Remaining balance as a percentage of the received total
    pub fn balance_percentage(&self) -> Decimal {
        if self.total_meters > Decimal::ZERO {
            self.current_balance / self.total_meters * Decimal::from(100)
        } else {
            Decimal::ZERO
        }
    }

    pub fn has_balance(&self) -> bool {
        self.current_balance > Decimal::ZERO
    }
}

impl std::fmt::Display for StockLot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} ({})",
            self.lot_number, self.party_name, self.quality_name
        )
    }
}

/// Format a lot number the way the backend assigns them
pub fn format_lot_number(fiscal_year: i32, sequence: u32) -> String {
    format!("LOT-{}-{:03}", fiscal_year, sequence)
}
