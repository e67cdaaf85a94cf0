//! REST API surface of the inventory backend

pub mod http;

pub use http::HttpApi;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{EffectiveRate, Party, ProgramDraft, QualityType, StockLot};
use uuid::Uuid;

use crate::error::ClientResult;

/// Reference to a saved program, returned by create and update
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramRef {
    pub id: Uuid,
    pub program_number: String,
}

/// Backend operations the program-entry form depends on.
///
/// The form is generic over this trait so tests can drive it with an
/// in-memory implementation.
#[allow(async_fn_in_trait)]
pub trait ProgramApi {
    async fn list_parties(&self) -> ClientResult<Vec<Party>>;

    async fn list_quality_types(&self) -> ClientResult<Vec<QualityType>>;

    /// Full lot snapshot, including drained lots
    async fn list_all_lots(&self) -> ClientResult<Vec<StockLot>>;

    /// Lots with at least `min_balance` meters remaining
    async fn list_available_lots(&self, min_balance: Decimal) -> ClientResult<Vec<StockLot>>;

    /// Effective rate for a (party, quality) pair. `None` when the backend
    /// does not know the pair; errors are reserved for transport problems.
    async fn get_effective_rate(
        &self,
        party_id: Uuid,
        quality_id: Uuid,
    ) -> ClientResult<Option<EffectiveRate>>;

    async fn create_program(&self, draft: &ProgramDraft) -> ClientResult<ProgramRef>;

    async fn update_program(&self, id: Uuid, draft: &ProgramDraft) -> ClientResult<ProgramRef>;

    async fn upload_design_photo(
        &self,
        id: Uuid,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<()>;
}
