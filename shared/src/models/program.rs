//! Process program models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a processing program
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ProgramStatus {
    #[default]
    Pending,
    Completed,
}

impl ProgramStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramStatus::Pending => "Pending",
            ProgramStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One lot allocation line on a saved program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramAllocation {
    #[serde(rename = "lot")]
    pub lot_id: Uuid,
    #[serde(default)]
    pub lot_number: Option<String>,
    #[serde(default)]
    pub lot_party: Option<String>,
    pub allocated_meters: Decimal,
}

/// A processing program as the backend reports it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: Uuid,
    /// Server-assigned number (e.g., "PRG-2024-0001")
    pub program_number: String,
    pub design_number: Option<String>,
    #[serde(default)]
    pub challan_no: Option<String>,
    pub input_meters: Decimal,
    pub output_meters: Option<Decimal>,
    #[serde(default)]
    pub wastage_meters: Decimal,
    pub status: ProgramStatus,
    pub rate_per_meter: Option<Decimal>,
    #[serde(default)]
    pub tax_amount: Decimal,
    #[serde(default)]
    pub design_photo_name: Option<String>,
    /// Stored design photo, base64-encoded by the backend
    #[serde(default)]
    pub design_photo_base64: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "lot_allocations", default)]
    pub allocations: Vec<ProgramAllocation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Program {
    /// Wastage as a percentage of input meters
    pub fn wastage_percentage(&self) -> Decimal {
        if self.input_meters > Decimal::ZERO {
            self.wastage_meters / self.input_meters * Decimal::from(100)
        } else {
            Decimal::ZERO
        }
    }

    /// Billable amount: output meters at the program rate, plus tax.
    /// Zero until a rate is known.
    pub fn total_amount(&self) -> Decimal {
        match self.rate_per_meter {
            Some(rate) if rate > Decimal::ZERO => {
                self.output_meters.unwrap_or(Decimal::ZERO) * rate + self.tax_amount
            }
            _ => Decimal::ZERO,
        }
    }

    pub fn is_wastage_high(&self, threshold_percent: Decimal) -> bool {
        self.wastage_percentage() > threshold_percent
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - Design {}",
            self.program_number,
            self.design_number.as_deref().unwrap_or("-")
        )
    }
}

/// Wastage threshold applied when the backend has no override configured
pub fn default_wastage_threshold() -> Decimal {
    Decimal::from(15)
}

/// Format a program number the way the backend assigns them
pub fn format_program_number(year: i32, sequence: u32) -> String {
    format!("PRG-{}-{:04}", year, sequence)
}
