//! Read-only cache of stock lot snapshots
//!
//! The entry screen works from two lists fetched together: the full lot
//! snapshot and the balance-filtered available subset. Balances are never
//! mutated here; a refresh after submission picks up what the backend
//! deducted.

use rust_decimal::Decimal;
use shared::StockLot;
use uuid::Uuid;

use crate::api::ProgramApi;
use crate::error::ClientResult;

/// Snapshot cache backing lot selectors and rate lookups
#[derive(Debug, Default, Clone)]
pub struct LotDirectory {
    all: Vec<StockLot>,
    available: Vec<StockLot>,
}

impl LotDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from snapshots already in hand (tests, embedding)
    pub fn from_snapshots(all: Vec<StockLot>, available: Vec<StockLot>) -> Self {
        Self { all, available }
    }

    /// Reload both lists in one joined round trip
    pub async fn refresh<A: ProgramApi>(&mut self, api: &A) -> ClientResult<()> {
        let (all, available) =
            tokio::try_join!(api.list_all_lots(), api.list_available_lots(Decimal::ONE))?;
        tracing::debug!(
            all = all.len(),
            available = available.len(),
            "lot directory refreshed"
        );
        self.all = all;
        self.available = available;
        Ok(())
    }

    /// Look a lot up by id, checking the full snapshot first
    pub fn lot(&self, id: Uuid) -> Option<&StockLot> {
        self.all
            .iter()
            .find(|lot| lot.id == id)
            .or_else(|| self.available.iter().find(|lot| lot.id == id))
    }

    pub fn all(&self) -> &[StockLot] {
        &self.all
    }

    pub fn available(&self) -> &[StockLot] {
        &self.available
    }
}
