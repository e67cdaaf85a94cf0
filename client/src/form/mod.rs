//! Program entry form orchestration

pub mod program;
pub mod rate;

pub use program::{PhotoState, ProgramForm};
pub use rate::{RateOutcome, RateRequest};
