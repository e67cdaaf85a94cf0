//! Program draft orchestration
//!
//! `ProgramForm` is the engine behind the entry screen: it owns the draft,
//! answers the derived-state questions the shell asks while rendering, and
//! runs the submit exchange. All mutation goes through its methods.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rust_decimal::Decimal;
use shared::{
    selectable_lots, total_allocated, validate_draft, AllocationRow, EffectiveRate, Program,
    ProgramDraft, ProgramStatus, StockLot,
};
use uuid::Uuid;

use crate::api::{ProgramApi, ProgramRef};
use crate::directory::LotDirectory;
use crate::error::ClientResult;

use super::rate::{RateOutcome, RateRequest, RateResolver};

/// Design photo attached to the draft
#[derive(Debug, Clone, Default)]
pub enum PhotoState {
    #[default]
    None,
    /// Came back with the program; shown but never re-uploaded
    Stored(Vec<u8>),
    /// Captured this session; uploaded right after the program saves
    New { filename: String, bytes: Vec<u8> },
}

impl PhotoState {
    pub fn preview(&self) -> Option<&[u8]> {
        match self {
            PhotoState::None => None,
            PhotoState::Stored(bytes) => Some(bytes),
            PhotoState::New { bytes, .. } => Some(bytes),
        }
    }
}

/// The program entry form, generic over its backend connection
pub struct ProgramForm<A> {
    api: A,
    directory: LotDirectory,
    draft: ProgramDraft,
    editing: Option<Uuid>,
    photo: PhotoState,
    resolver: RateResolver,
    rate_dirty: bool,
    in_flight: bool,
}

impl<A: ProgramApi> ProgramForm<A> {
    /// A blank create-mode form over an already loaded lot directory
    pub fn new(api: A, directory: LotDirectory) -> Self {
        Self {
            api,
            directory,
            draft: ProgramDraft::new(),
            editing: None,
            photo: PhotoState::None,
            resolver: RateResolver::default(),
            rate_dirty: false,
            in_flight: false,
        }
    }

    /// Open an existing program for editing. The party comes off the first
    /// allocated lot; a stored design photo becomes the preview.
    pub fn edit(api: A, directory: LotDirectory, program: &Program) -> Self {
        let party_id = program
            .allocations
            .first()
            .and_then(|a| directory.lot(a.lot_id))
            .map(|lot| lot.party_id);

        let photo = match &program.design_photo_base64 {
            Some(encoded) => match BASE64.decode(encoded) {
                Ok(bytes) => PhotoState::Stored(bytes),
                Err(err) => {
                    tracing::debug!(error = %err, "stored design photo is not valid base64");
                    PhotoState::None
                }
            },
            None => PhotoState::None,
        };

        Self {
            draft: ProgramDraft::from_program(program, party_id),
            editing: Some(program.id),
            photo,
            resolver: RateResolver::default(),
            rate_dirty: false,
            in_flight: false,
            api,
            directory,
        }
    }

    // ========================================================================
    // Identity and Pricing Fields
    // ========================================================================

    /// Choose the party. Picking a different one throws away chosen lots,
    /// since they cannot belong to the new party.
    pub fn set_party(&mut self, party_id: Option<Uuid>) {
        if self.draft.party_id == party_id {
            return;
        }
        self.draft.party_id = party_id;
        self.draft.allocations = vec![AllocationRow::default()];
        self.resolver.invalidate();
    }

    pub fn set_design_number(&mut self, design_number: String) {
        self.draft.design_number = design_number;
    }

    pub fn set_challan_no(&mut self, challan_no: Option<String>) {
        self.draft.challan_no = challan_no;
    }

    pub fn set_input_meters(&mut self, meters: Decimal) {
        self.draft.input_meters = meters;
    }

    pub fn set_output_meters(&mut self, meters: Option<Decimal>) {
        self.draft.output_meters = meters;
    }

    pub fn set_tax_amount(&mut self, amount: Decimal) {
        self.draft.tax_amount = amount;
    }

    pub fn set_notes(&mut self, notes: String) {
        self.draft.notes = notes;
    }

    pub fn set_status(&mut self, status: ProgramStatus) {
        self.draft.status = status;
    }

    /// Record a rate the user typed. A typed rate is theirs and shields the
    /// field from autofill; clearing it re-arms autofill.
    pub fn set_rate(&mut self, rate: Option<Decimal>) {
        self.draft.rate_per_meter = rate;
        self.rate_dirty = rate.is_some();
    }

    pub fn attach_photo(&mut self, filename: String, bytes: Vec<u8>) {
        self.photo = PhotoState::New { filename, bytes };
    }

    pub fn clear_photo(&mut self) {
        self.photo = PhotoState::None;
    }

    // ========================================================================
    // Allocation Editor
    // ========================================================================

    /// Append an empty allocation row
    pub fn add_row(&mut self) {
        self.draft.allocations.push(AllocationRow::default());
    }

    /// Remove a row; the last remaining row stays put
    pub fn remove_row(&mut self, index: usize) {
        if self.draft.allocations.len() <= 1 || index >= self.draft.allocations.len() {
            return;
        }
        self.draft.allocations.remove(index);
        if index == 0 {
            self.resolver.invalidate();
        }
    }

    /// Point a row at a lot, or clear it. Changing the first row supersedes
    /// any rate lookup still in flight; follow up with [`autofill_rate`].
    ///
    /// [`autofill_rate`]: Self::autofill_rate
    pub fn set_row_lot(&mut self, index: usize, lot_id: Option<Uuid>) {
        let Some(row) = self.draft.allocations.get_mut(index) else {
            return;
        };
        row.lot_id = lot_id;
        if index == 0 {
            self.resolver.invalidate();
        }
    }

    /// Type meters into a row. Values are not checked against balances or
    /// the input total here; validation happens at submit.
    pub fn set_row_meters(&mut self, index: usize, meters: Decimal) {
        if let Some(row) = self.draft.allocations.get_mut(index) {
            row.allocated_meters = meters.max(Decimal::ZERO);
        }
    }

    // ========================================================================
    // Derived State
    // ========================================================================

    /// Lots offerable in the row selectors right now
    pub fn selectable_lots(&self) -> Vec<&StockLot> {
        selectable_lots(
            &self.draft,
            self.directory.available(),
            self.directory.all(),
            self.editing.is_some(),
        )
    }

    /// Running total across all rows, for the live badge
    pub fn total_allocated(&self) -> Decimal {
        total_allocated(&self.draft.allocations)
    }

    /// Display-only wastage figure
    pub fn wastage(&self) -> Decimal {
        self.draft.wastage()
    }

    pub fn draft(&self) -> &ProgramDraft {
        &self.draft
    }

    pub fn directory(&self) -> &LotDirectory {
        &self.directory
    }

    pub fn photo(&self) -> &PhotoState {
        &self.photo
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Whether a submission round trip is running; the shell disables the
    /// save control off this
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    // ========================================================================
    // Rate Resolver
    // ========================================================================

    /// The rate lookup warranted by the current first row, freshly stamped.
    /// `None` when no known lot anchors the draft yet.
    pub fn rate_request(&mut self) -> Option<RateRequest> {
        let lot_id = self.draft.first_lot_id()?;
        let lot = self.directory.lot(lot_id)?;
        Some(RateRequest {
            party_id: lot.party_id,
            quality_id: lot.quality_id,
            generation: self.resolver.begin(),
        })
    }

    /// Land a rate response. Superseded responses and manually priced drafts
    /// are left untouched.
    pub fn apply_rate(
        &mut self,
        request: RateRequest,
        rate: Option<EffectiveRate>,
    ) -> RateOutcome {
        if !self.resolver.is_current(request.generation) {
            return RateOutcome::Stale;
        }
        if self.rate_dirty {
            return RateOutcome::ManualKept;
        }
        match rate {
            Some(resolved) => {
                self.draft.rate_per_meter = Some(resolved.rate);
                tracing::debug!(rate = %resolved.rate, source = %resolved.source, "rate autofilled");
                RateOutcome::Applied(resolved)
            }
            None => RateOutcome::Unavailable,
        }
    }

    /// Fetch and land the effective rate for the current first lot. Lookup
    /// failures never block entry; the draft keeps whatever rate it had.
    pub async fn autofill_rate(&mut self) -> RateOutcome {
        let Some(request) = self.rate_request() else {
            return RateOutcome::Unavailable;
        };
        match self
            .api
            .get_effective_rate(request.party_id, request.quality_id)
            .await
        {
            Ok(rate) => self.apply_rate(request, rate),
            Err(err) => {
                tracing::debug!(error = %err, "rate lookup failed");
                RateOutcome::Unavailable
            }
        }
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Validate and save the draft, uploading any new design photo after the
    /// program lands. On success the form returns to a blank draft and the
    /// lot directory is refreshed so deducted balances show up.
    pub async fn submit(&mut self) -> ClientResult<ProgramRef> {
        validate_draft(&self.draft)?;

        self.in_flight = true;
        let result = self.save().await;
        self.in_flight = false;

        let saved = match result {
            Ok(saved) => saved,
            Err(err) => {
                tracing::error!(error = %err, "program save failed");
                return Err(err);
            }
        };
        self.reset();
        if let Err(err) = self.directory.refresh(&self.api).await {
            // The save went through; stale balances correct on next load
            tracing::warn!(error = %err, "lot refresh after save failed");
        }
        Ok(saved)
    }

    async fn save(&self) -> ClientResult<ProgramRef> {
        let saved = match self.editing {
            Some(id) => self.api.update_program(id, &self.draft).await?,
            None => self.api.create_program(&self.draft).await?,
        };

        if let PhotoState::New { filename, bytes } = &self.photo {
            self.api
                .upload_design_photo(saved.id, filename, bytes.clone())
                .await?;
        }

        tracing::info!(
            program = %saved.program_number,
            updated = self.editing.is_some(),
            "program saved"
        );
        Ok(saved)
    }

    /// Drop all entry state and return to a blank create-mode draft
    pub fn reset(&mut self) {
        self.draft = ProgramDraft::new();
        self.editing = None;
        self.photo = PhotoState::None;
        self.rate_dirty = false;
        self.resolver.invalidate();
    }
}
