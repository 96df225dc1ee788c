//! Query parameter extractors for list endpoints.

use serde::Deserialize;

use mentionkit_types::thread::SortOrder;

/// Query parameters for thread item listing.
#[derive(Debug, Deserialize, Default)]
pub struct ItemListQuery {
    /// Maximum results; the configured history limit when absent.
    pub limit: Option<u32>,
    /// Sort order by creation (asc, desc).
    #[serde(default)]
    pub order: SortOrder,
}

/// Query parameters for thread listing.
#[derive(Debug, Deserialize, Default)]
pub struct ThreadListQuery {
    pub limit: Option<u32>,
}
