//! Data aggregation and view-state layer of the Pokédex client.

pub mod cache;
pub mod controller;
pub mod evolution;
pub mod gateway;
pub mod normalize;
pub mod paginator;
pub mod store;

pub use controller::{ApplicationState, ControllerEvent, DexController};
pub use gateway::{DexGateway, HttpGateway, DEFAULT_API_BASE_URL};
pub use store::DexStore;

pub const DEFAULT_PAGE_SIZE: usize = 24;
pub const DEFAULT_NAME_INDEX_LIMIT: u32 = 20_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Entities requested per browse page.
    pub page_size: usize,
    pub name_index_limit: u32,
    /// Attach a truncated evolution line to every browse card.
    pub browse_preview: bool,
    /// `None` keeps every response for the whole session.
    pub cache_capacity: Option<usize>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            name_index_limit: DEFAULT_NAME_INDEX_LIMIT,
            browse_preview: false,
            cache_capacity: None,
        }
    }
}

#[cfg(test)]
#[path = "tests/fixtures.rs"]
mod fixtures;
