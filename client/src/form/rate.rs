//! Effective-rate autofill plumbing
//!
//! Rate lookups run while the user keeps editing, so every lookup is stamped
//! with a generation number. Only a response carrying the latest stamp may
//! touch the draft; everything else is dropped on arrival.

use shared::EffectiveRate;
use uuid::Uuid;

/// A rate lookup the form wants performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRequest {
    pub party_id: Uuid,
    pub quality_id: Uuid,
    pub(crate) generation: u64,
}

/// What became of a rate response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateOutcome {
    /// The resolved rate was written into the draft
    Applied(EffectiveRate),
    /// A newer lookup superseded this one; the draft was left alone
    Stale,
    /// The user typed a rate themselves; autofill kept its hands off
    ManualKept,
    /// No rate was available; the draft keeps whatever it had
    Unavailable,
}

/// Stamps lookups so only the latest response counts
#[derive(Debug, Default)]
pub(crate) struct RateResolver {
    generation: u64,
}

impl RateResolver {
    /// Start a new lookup, superseding any still in flight
    pub(crate) fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Supersede in-flight lookups without starting a new one
    pub(crate) fn invalidate(&mut self) {
        self.generation += 1;
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}
