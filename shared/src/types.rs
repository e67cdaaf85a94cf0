//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// One page of results in the backend's envelope format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// List endpoints answer either with a page envelope or a bare array,
/// depending on whether pagination applies to the route.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    /// The items regardless of which shape arrived
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Paged(page) => page.results,
            ListResponse::Plain(items) => items,
        }
    }
}
