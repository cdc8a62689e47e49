//! Expense feed surface
//!
//! The phone-sized expense list: same pagination and filters as the
//! table, fixed to expenses, with a shorter page and a reset when the
//! user navigates away.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use taka_core::{page_total, visible_items, PageInfo, Record, RecordKind, RecordPatch};
use taka_config::Config;
use taka_source::SourceRef;
use uuid::Uuid;

use crate::error::ViewResult;
use crate::pager::Pager;

/// What the feed shows after an operation
#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    /// Rows after the page-local search filter
    pub rows: Vec<Record>,
    /// Sum over the rows shown
    pub page_total: Decimal,
    pub page_number: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub total_count: Option<u64>,
    pub search_text: String,
    pub date_filter: Option<NaiveDate>,
    /// True while no user is signed in; rows are empty and nothing was fetched
    pub pending_auth: bool,
}

/// Paged expense feed
pub struct ExpenseFeed {
    pager: Pager,
}

impl ExpenseFeed {
    pub fn new(source: SourceRef, config: &Config) -> Self {
        Self {
            pager: Pager::new(RecordKind::Expense, source, config.listing.feed_page_size),
        }
    }

    /// Change the signed-in user; call [`load`](Self::load) afterwards
    pub fn set_user(&mut self, user: Option<Uuid>) {
        self.pager.set_user(user);
    }

    /// The current state without touching the source
    pub fn snapshot(&self) -> FeedSnapshot {
        let controller = &self.pager.controller;
        let rows = visible_items(&self.pager.rows, controller.filter());
        FeedSnapshot {
            page_total: page_total(&rows),
            rows,
            page_number: controller.page_number(),
            has_next_page: self.pager.page_info.has_next_page,
            has_prev_page: controller.has_prev_page(),
            total_count: self.pager.total_count,
            search_text: controller.filter().search_text.clone(),
            date_filter: controller.filter().date,
            pending_auth: self.pager.pending_auth(),
        }
    }

    // ==================== Fetching ====================

    /// Fetch the page for the current state
    pub async fn load(&mut self) -> ViewResult<FeedSnapshot> {
        self.pager.reload("feed.load").await?;
        Ok(self.snapshot())
    }

    /// Pull-to-refresh: back to page 1 with filters kept, then re-fetch
    pub async fn refresh(&mut self) -> ViewResult<FeedSnapshot> {
        let mut next = self.pager.controller.clone();
        next.reset_position();
        self.pager.apply("feed.refresh", next).await?;
        Ok(self.snapshot())
    }

    /// Leaving the screen drops filters, search and position so the
    /// next visit starts clean. Nothing is fetched on the way out.
    pub fn leave(&mut self) {
        self.pager.controller.reset_all();
        self.pager.rows.clear();
        self.pager.page_info = PageInfo::default();
        self.pager.total_count = None;
    }

    // ==================== Filters ====================

    /// Restrict the feed to one calendar day; pagination restarts
    pub async fn set_date_filter(&mut self, date: NaiveDate) -> ViewResult<FeedSnapshot> {
        let mut next = self.pager.controller.clone();
        next.set_date_filter(date);
        self.pager.apply("feed.set_date_filter", next).await?;
        Ok(self.snapshot())
    }

    /// Remove the date restriction; pagination restarts
    pub async fn clear_date_filter(&mut self) -> ViewResult<FeedSnapshot> {
        let mut next = self.pager.controller.clone();
        next.clear_date_filter();
        self.pager.apply("feed.clear_date_filter", next).await?;
        Ok(self.snapshot())
    }

    /// Update the page-local search; never touches the source
    pub fn set_search_text(&mut self, text: impl Into<String>) -> FeedSnapshot {
        self.pager.controller.set_search_text(text);
        self.snapshot()
    }

    // ==================== Navigation ====================

    /// Go forward one page. Without a next page this is a no-op and
    /// returns the unchanged snapshot.
    pub async fn next_page(&mut self) -> ViewResult<FeedSnapshot> {
        let mut next = self.pager.controller.clone();
        if !next.go_next(&self.pager.page_info) {
            return Ok(self.snapshot());
        }
        self.pager.apply("feed.next_page", next).await?;
        Ok(self.snapshot())
    }

    /// Go back one page. On page 1 this is a no-op and returns the
    /// unchanged snapshot.
    pub async fn prev_page(&mut self) -> ViewResult<FeedSnapshot> {
        let mut next = self.pager.controller.clone();
        if !next.go_prev() {
            return Ok(self.snapshot());
        }
        self.pager.apply("feed.prev_page", next).await?;
        Ok(self.snapshot())
    }

    // ==================== Mutations ====================

    /// Add an expense owned by the signed-in user
    pub async fn add(
        &mut self,
        source_name: String,
        amount: Decimal,
        date: NaiveDateTime,
    ) -> ViewResult<FeedSnapshot> {
        self.pager.insert("feed.add", source_name, amount, date).await?;
        Ok(self.snapshot())
    }

    /// Edit an owned expense
    pub async fn edit(&mut self, id: Uuid, patch: RecordPatch) -> ViewResult<FeedSnapshot> {
        self.pager.update("feed.edit", id, patch).await?;
        Ok(self.snapshot())
    }

    /// Delete an owned expense
    pub async fn remove(&mut self, id: Uuid) -> ViewResult<FeedSnapshot> {
        self.pager.remove("feed.remove", id).await?;
        Ok(self.snapshot())
    }
}

// ==================== Tests ====================
