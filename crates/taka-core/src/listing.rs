//! Paginated listing controller
//!
//! Owns the cursor stack, the filter state, and the page size for one
//! listing surface, and compiles them into record queries. Every
//! transition either moves the stack while leaving the filter alone, or
//! changes the filter and resets the stack to page 1 — a cursor is only
//! valid within the query it was issued for, so a server-side filter
//! change invalidates all of them at once.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::filter::{day_bounds, ListFilter};
use crate::paging::{Cursor, CursorStack, PageInfo};
use crate::query::{OrderBy, RecordFilter, RecordQuery};
use crate::records::Record;

/// Page size used when no configuration says otherwise
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ==================== Controller ====================

/// Pagination and filter state for one listing surface.
///
/// Side-effect free: transitions only mutate local state, and
/// [`page_query`](Self::page_query) derives the query for the caller to
/// run. The version counter ticks on every state change so callers that
/// allow overlapping fetches can discard results whose initiating
/// version is stale.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingController {
    stack: CursorStack,
    filter: ListFilter,
    page_size: usize,
    version: u64,
}

impl Default for ListingController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListingController {
    /// A controller at page 1 with no filters
    pub fn new(page_size: usize) -> Self {
        Self {
            stack: CursorStack::new(),
            filter: ListFilter::default(),
            page_size,
            version: 0,
        }
    }

    // ==================== Accessors ====================

    /// Current filter state
    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    /// Items requested per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Monotonic state version, bumped on every change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The cursor history
    pub fn stack(&self) -> &CursorStack {
        &self.stack
    }

    /// Cursor the current page is fetched after; `None` on page 1
    pub fn current_cursor(&self) -> Option<&Cursor> {
        self.stack.current()
    }

    /// Current 1-based page number
    pub fn page_number(&self) -> usize {
        self.stack.page_number()
    }

    /// Whether a previous page exists to go back to
    pub fn has_prev_page(&self) -> bool {
        self.stack.page_number() > 1
    }

    // ==================== Filter transitions ====================

    /// Restrict the listing to a single calendar day.
    ///
    /// Resets the position to page 1 unconditionally, in the same step
    /// as the filter change; the reset is never deferred to the fetch.
    pub fn set_date_filter(&mut self, date: NaiveDate) {
        self.filter.date = Some(date);
        self.stack.reset();
        self.version += 1;
    }

    /// Remove the date restriction; resets the position to page 1
    pub fn clear_date_filter(&mut self) {
        self.filter.date = None;
        self.stack.reset();
        self.version += 1;
    }

    /// Change the page size; resets the position to page 1
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.stack.reset();
        self.version += 1;
    }

    /// Update the free-text search. Search never reaches the record
    /// source and only narrows the already-fetched page, so pagination
    /// is left untouched. Returns whether the text actually changed.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.filter.search_text == text {
            return false;
        }
        self.filter.search_text = text;
        self.version += 1;
        true
    }

    // ==================== Navigation transitions ====================

    /// Advance to the next page. No-op unless the last fetch reported a
    /// next page and supplied an end cursor. Returns whether the
    /// position moved.
    pub fn go_next(&mut self, page_info: &PageInfo) -> bool {
        if !page_info.has_next_page {
            return false;
        }
        let Some(cursor) = page_info.end_cursor.clone() else {
            return false;
        };
        self.stack.push(cursor);
        self.version += 1;
        true
    }

    /// Step back to the previous page. No-op on page 1. Going back
    /// re-issues the forward query that produced that page originally,
    /// anchored at the cursor the stack retained for it. Returns whether
    /// the position moved.
    pub fn go_prev(&mut self) -> bool {
        if self.stack.pop() {
            self.version += 1;
            true
        } else {
            false
        }
    }

    /// Clear every filter and return to page 1. Invoked when the
    /// hosting view's visual context changes, so stale filters do not
    /// leak between visits.
    pub fn reset_all(&mut self) {
        self.filter = ListFilter::default();
        self.stack.reset();
        self.version += 1;
    }

    /// Return to page 1 but keep the filters; used by refresh
    pub fn reset_position(&mut self) {
        self.stack.reset();
        self.version += 1;
    }

    // ==================== Query derivation ====================

    /// The query that fetches the current page for the given owner.
    ///
    /// The date filter expands to the full-day window; ordering is the
    /// fixed newest-first; the window is always forward (`first`/`after`).
    pub fn page_query(&self, user_id: Uuid) -> RecordQuery {
        RecordQuery {
            filter: RecordFilter {
                user_id: Some(user_id),
                date: self.filter.date.map(day_bounds),
            },
            order_by: OrderBy::newest_first(),
            first: Some(self.page_size),
            after: self.stack.current().cloned(),
            last: None,
            before: None,
        }
    }
}

// ==================== Display derivation ====================

/// The fetched page narrowed by the client-side search filter.
///
/// Search is page-local: a matching record on another page will not
/// surface here.
pub fn visible_items(items: &[Record], filter: &ListFilter) -> Vec<Record> {
    items
        .iter()
        .filter(|r| filter.matches_search(r))
        .cloned()
        .collect()
}

/// Sum of the amounts shown; reflects only the filtered subset
pub fn page_total(items: &[Record]) -> Decimal {
    items.iter().map(|r| r.amount).sum()
}

// ==================== Tests ====================
