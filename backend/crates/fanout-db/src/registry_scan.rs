use crate::{ConnectionStore, Result as DbErrorResult, ScanCursor};

use fanout_core::ConnectionId;

use std::sync::Arc;

enum ScanState {
    Start,
    Next(ScanCursor),
    Done,
}

/// Lazy, page-at-a-time walk over every registered connection id.
///
/// Not a snapshot: rows inserted or deleted while the scan runs may or may not
/// be observed. Once a page fails or the table is exhausted the scan stays
/// finished.
pub struct RegistryScan {
    store: Arc<dyn ConnectionStore>,
    page_size: u32,
    state: ScanState,
    pages_fetched: usize,
}

impl RegistryScan {
    pub fn new(store: Arc<dyn ConnectionStore>, page_size: u32) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
            state: ScanState::Start,
            pages_fetched: 0,
        }
    }

    /// `Ok(None)` once every page has been yielded.
    pub async fn next_page(&mut self) -> DbErrorResult<Option<Vec<ConnectionId>>> {
        let cursor = match std::mem::replace(&mut self.state, ScanState::Done) {
            ScanState::Done => return Ok(None),
            ScanState::Start => None,
            ScanState::Next(cursor) => Some(cursor),
        };

        // State is already Done, so an error here ends the scan
        let page = self
            .store
            .scan_page(cursor.as_ref(), self.page_size)
            .await?;

        if let Some(next) = page.next {
            self.state = ScanState::Next(next);
        }

        if page.ids.is_empty() && matches!(self.state, ScanState::Done) {
            return Ok(None);
        }

        self.pages_fetched += 1;
        Ok(Some(page.ids))
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, ScanState::Done)
    }
}
