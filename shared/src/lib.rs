//! Shared types and models for the Textile Mill Inventory Platform
//!
//! This crate contains types shared between the client engine, the browser
//! front end (via WASM), and other components of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
