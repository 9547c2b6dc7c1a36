//! Pagination cursor, lifecycle flags and observable snapshots

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::response::Pagination;

/// Default page size
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Offset/limit/total state of one paginated query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Page size; also the stride between offsets
    pub limit: u32,
    /// Offset of the next page to request
    pub next_offset: u32,
    /// Total results reported by the first successful page, 0 until then
    pub total_result_count: u32,
    /// Item count of the most recent successful page
    pub last_page_result_count: u32,
}

impl Cursor {
    /// Fresh cursor starting at `offset`
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.max(1),
            next_offset: offset,
            total_result_count: 0,
            last_page_result_count: 0,
        }
    }

    /// All pages have been fetched
    pub fn is_exhausted(&self) -> bool {
        self.total_result_count > 0 && self.next_offset >= self.total_result_count
    }

    /// Apply a successful page. The offset advances by `limit`, not by the
    /// number of items, so a short last page still moves one full stride.
    pub fn advance(&mut self, pagination: &Pagination, item_count: usize) {
        if self.total_result_count == 0 {
            self.total_result_count = pagination.total_count;
        }
        self.last_page_result_count = item_count as u32;
        self.next_offset = self.next_offset.saturating_add(self.limit);
    }

    /// Back to offset 0 with no known total
    pub fn reset(&mut self) {
        *self = Self::new(self.limit, 0);
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, 0)
    }
}

/// Observable lifecycle flags of a paginated request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifecycleFlags {
    /// A call is outstanding
    pub has_in_flight_request: bool,
    /// At least one page decoded successfully
    pub has_received_any_response: bool,
    /// A failure arrived after the last success
    pub has_received_failure_since_last_response: bool,
    /// Some successful page had zero items
    pub has_received_empty_response: bool,
    /// A permanent failure stopped the request; reset to try again
    pub has_terminal_failure: bool,
}

/// Point-in-time view of a paginated request, handed to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSnapshot {
    /// Cursor state
    pub cursor: Cursor,
    /// Lifecycle flags
    pub flags: LifecycleFlags,
    /// Consecutive failures since the last success
    pub retry_count: u32,
    /// Delay of the pending retry, if one is scheduled
    pub next_retry_delay: Option<Duration>,
}

impl RequestSnapshot {
    /// Offset the next page will be requested at
    pub fn next_offset(&self) -> u32 {
        self.cursor.next_offset
    }

    /// No further pages exist
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    /// A retry timer is pending
    pub fn is_retry_scheduled(&self) -> bool {
        self.next_retry_delay.is_some()
    }
}
