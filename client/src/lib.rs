//! Textile Mill Inventory Platform - front-end engine
//!
//! The headless core of the mill's program-entry screen: lot directory,
//! allocation editing, effective-rate resolution and draft submission against
//! the inventory backend's REST API. Rendering and input capture live in the
//! browser shell; everything it computes or persists lives here.

pub mod api;
pub mod config;
pub mod directory;
pub mod error;
pub mod form;
pub mod prefs;

pub use api::{HttpApi, ProgramApi};
pub use config::Config;
pub use directory::LotDirectory;
pub use error::{ClientError, ClientResult};
pub use form::ProgramForm;
pub use prefs::UiState;
