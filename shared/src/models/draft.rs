//! Program draft state for the entry form

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::program::{Program, ProgramStatus};

/// One (lot, meters) line in a draft.
///
/// Meters accept any value while typing; consistency is enforced only when
/// the draft is validated for submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationRow {
    pub lot_id: Option<Uuid>,
    pub allocated_meters: Decimal,
}

impl AllocationRow {
    pub fn new(lot_id: Uuid, allocated_meters: Decimal) -> Self {
        Self {
            lot_id: Some(lot_id),
            allocated_meters,
        }
    }

    /// A row counts as filled once it names a lot and positive meters
    pub fn is_filled(&self) -> bool {
        self.lot_id.is_some() && self.allocated_meters > Decimal::ZERO
    }
}

/// Client-side draft of a processing program, mutated by the entry form
/// and serialized on submit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramDraft {
    pub party_id: Option<Uuid>,
    pub design_number: String,
    pub challan_no: Option<String>,
    pub input_meters: Decimal,
    pub output_meters: Option<Decimal>,
    pub rate_per_meter: Option<Decimal>,
    pub tax_amount: Decimal,
    pub status: ProgramStatus,
    pub notes: String,
    pub allocations: Vec<AllocationRow>,
}

impl Default for ProgramDraft {
    fn default() -> Self {
        Self {
            party_id: None,
            design_number: String::new(),
            challan_no: None,
            input_meters: Decimal::ZERO,
            output_meters: None,
            rate_per_meter: None,
            tax_amount: Decimal::ZERO,
            status: ProgramStatus::Pending,
            notes: String::new(),
            allocations: vec![AllocationRow::default()],
        }
    }
}

impl ProgramDraft {
    /// A fresh draft with one empty allocation row
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a draft from a saved program for editing. The party is
    /// passed in because the program only references it through its lots.
    pub fn from_program(program: &Program, party_id: Option<Uuid>) -> Self {
        let allocations = if program.allocations.is_empty() {
            vec![AllocationRow::default()]
        } else {
            program
                .allocations
                .iter()
                .map(|a| AllocationRow::new(a.lot_id, a.allocated_meters))
                .collect()
        };

        Self {
            party_id,
            design_number: program.design_number.clone().unwrap_or_default(),
            challan_no: program.challan_no.clone(),
            input_meters: program.input_meters,
            output_meters: program.output_meters,
            rate_per_meter: program.rate_per_meter,
            tax_amount: program.tax_amount,
            status: program.status,
            notes: program.notes.clone().unwrap_or_default(),
            allocations,
        }
    }

    /// The lot driving rate resolution, always the first row's
    pub fn first_lot_id(&self) -> Option<Uuid> {
        self.allocations.first().and_then(|row| row.lot_id)
    }

    /// The lot anchoring the GSTIN partition: the first row that names one
    pub fn first_chosen_lot_id(&self) -> Option<Uuid> {
        self.allocations.iter().find_map(|row| row.lot_id)
    }

    /// Lots the draft currently references
    pub fn referenced_lot_ids(&self) -> Vec<Uuid> {
        self.allocations.iter().filter_map(|row| row.lot_id).collect()
    }

    /// Display-only wastage figure, never sent to the backend
    pub fn wastage(&self) -> Decimal {
        self.input_meters - self.output_meters.unwrap_or(Decimal::ZERO)
    }
}
