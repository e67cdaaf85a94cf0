//! Domain models for the Textile Mill Inventory Platform

mod draft;
mod lot;
mod party;
mod program;
mod quality;
mod rate;

pub use draft::*;
pub use lot::*;
pub use party::*;
pub use program::*;
pub use quality::*;
pub use rate::*;
