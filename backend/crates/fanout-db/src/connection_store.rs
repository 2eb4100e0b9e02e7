use crate::Result as DbErrorResult;

use fanout_core::ConnectionId;

use async_trait::async_trait;

/// Opaque position in a registry scan, only meaningful to the store that issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCursor(String);

impl ScanCursor {
    pub fn new(position: impl Into<String>) -> Self {
        Self(position.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a registry scan
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub ids: Vec<ConnectionId>,
    /// Where the following page starts; `None` on the last page
    pub next: Option<ScanCursor>,
}

/// Durable set of connection ids believed to be live.
///
/// Implementations only need point-operation atomicity; nothing here spans
/// more than one row.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Add `id`; inserting an id that is already present is a no-op
    async fn insert(&self, id: &ConnectionId) -> DbErrorResult<()>;

    /// Remove `id`; removing an absent id succeeds
    async fn delete(&self, id: &ConnectionId) -> DbErrorResult<()>;

    /// Fetch up to `limit` ids starting at `cursor` (`None` = first page)
    async fn scan_page(&self, cursor: Option<&ScanCursor>, limit: u32)
    -> DbErrorResult<ScanPage>;

    async fn count(&self) -> DbErrorResult<u64>;
}
