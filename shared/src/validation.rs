//! Validation and derived state for the program entry form
//!
//! The browser form's reactive recomputations are modelled here as pure
//! functions over the draft, called explicitly after each mutation. Nothing
//! in this module performs IO or mutates lot balances; the backend revalidates
//! everything on submission.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AllocationRow, ProgramDraft, StockLot};

/// Tolerance when matching total allocated meters against input meters.
/// A difference of exactly this much is still accepted.
pub fn allocation_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// A draft failed local validation; submission is blocked
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Please select a party")]
    MissingParty,
    #[error("Please enter valid input meters")]
    InvalidInputMeters,
    #[error("Output meters cannot exceed input meters")]
    OutputExceedsInput,
    #[error("All lot allocations need a lot and meters greater than 0")]
    EmptyAllocationRow,
    #[error("Total allocated meters ({allocated}) must equal input meters ({input})")]
    AllocationMismatch { allocated: Decimal, input: Decimal },
}

impl DraftError {
    /// Stable identifier for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            DraftError::MissingParty => "missing_party",
            DraftError::InvalidInputMeters => "invalid_input_meters",
            DraftError::OutputExceedsInput => "output_exceeds_input",
            DraftError::EmptyAllocationRow => "empty_allocation_row",
            DraftError::AllocationMismatch { .. } => "allocation_mismatch",
        }
    }
}

// ============================================================================
// Derived State
// ============================================================================

/// Sum of meters across all rows. Unfilled rows contribute their typed
/// meters; the figure backs the live allocation badge, not row gating.
pub fn total_allocated(rows: &[AllocationRow]) -> Decimal {
    rows.iter().map(|row| row.allocated_meters).sum()
}

/// Whether a running total is close enough to the input meters to submit
pub fn within_tolerance(allocated: Decimal, input: Decimal) -> bool {
    (allocated - input).abs() <= allocation_tolerance()
}

/// Lots offerable in an allocation row's selector for the current draft.
///
/// `available` is the backend's balance-filtered list; `all_lots` is the full
/// snapshot, consulted for lots an edited program already holds and for the
/// GSTIN partition anchor. With no party chosen the available list passes
/// through unfiltered, as the form behaves before a party is picked.
pub fn selectable_lots<'a>(
    draft: &ProgramDraft,
    available: &'a [StockLot],
    all_lots: &'a [StockLot],
    editing: bool,
) -> Vec<&'a StockLot> {
    let Some(party_id) = draft.party_id else {
        return available.iter().filter(|lot| lot.has_balance()).collect();
    };

    let mut lots: Vec<&StockLot> = available
        .iter()
        .filter(|lot| lot.party_id == party_id && lot.has_balance())
        .collect();

    if editing {
        // Lots the program already consumed stay visible even at zero balance
        let referenced = draft.referenced_lot_ids();
        for lot in all_lots {
            if referenced.contains(&lot.id)
                && lot.party_id == party_id
                && !lots.iter().any(|l| l.id == lot.id)
            {
                lots.push(lot);
            }
        }
    }

    // The first chosen lot anchors the GSTIN partition for the whole program
    if let Some(first_id) = draft.first_chosen_lot_id() {
        let anchor = all_lots
            .iter()
            .chain(available.iter())
            .find(|lot| lot.id == first_id);
        if let Some(anchor) = anchor {
            lots.retain(|lot| lot.is_gstin_registered == anchor.is_gstin_registered);
        }
    }

    lots
}

// ============================================================================
// Draft Validation
// ============================================================================

/// Validate a draft immediately before submission. Rules run in a fixed
/// order and the first failure is reported.
pub fn validate_draft(draft: &ProgramDraft) -> Result<(), DraftError> {
    if draft.party_id.is_none() {
        return Err(DraftError::MissingParty);
    }

    if draft.input_meters <= Decimal::ZERO {
        return Err(DraftError::InvalidInputMeters);
    }

    if let Some(output) = draft.output_meters {
        if output > draft.input_meters {
            return Err(DraftError::OutputExceedsInput);
        }
    }

    if draft.allocations.is_empty() || !draft.allocations.iter().all(AllocationRow::is_filled) {
        return Err(DraftError::EmptyAllocationRow);
    }

    let allocated = total_allocated(&draft.allocations);
    if !within_tolerance(allocated, draft.input_meters) {
        return Err(DraftError::AllocationMismatch {
            allocated,
            input: draft.input_meters,
        });
    }

    Ok(())
}
