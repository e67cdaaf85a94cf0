//! Persisted UI state for the shell around the form
//!
//! The browser keeps this in localStorage; natively it is a small JSON file.
//! State is loaded once at startup and written back at explicit save points,
//! never mid-edit.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

/// Top-level screen the shell last showed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Inward,
    Program,
    Billing,
    Settings,
}

/// Shell state that survives restarts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiState {
    pub active_section: Section,
    pub sidebar_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: Section::Inward,
            sidebar_open: true,
        }
    }
}

impl UiState {
    /// Read persisted state; anything missing or unreadable means defaults
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(err) => {
                tracing::debug!(error = %err, "persisted UI state unreadable, starting fresh");
                Self::default()
            }
        }
    }

    /// Write state out for the next session
    pub fn save(&self, path: &Path) -> ClientResult<()> {
        let raw = serde_json::to_string_pretty(self).map_err(std::io::Error::from)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}
