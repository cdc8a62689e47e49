//! Record table surface
//!
//! The table view over one record kind: paged rows with a date filter,
//! page-local search, a page size selector, and row mutations. One
//! instance owns its own pagination state; nothing is shared across
//! surfaces.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use taka_config::Config;
use taka_core::{page_total, visible_items, Record, RecordKind, RecordPatch};
use taka_source::SourceRef;

use crate::error::ViewResult;
use crate::pager::Pager;

/// What the table shows after an operation
#[derive(Debug, Clone, Serialize)]
pub struct TableSnapshot {
    pub kind: RecordKind,
    /// Rows after the page-local search filter
    pub rows: Vec<Record>,
    /// Sum over the rows shown
    pub page_total: Decimal,
    pub page_number: usize,
    pub page_size: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    /// Total matching records for the query, when the source reports it
    pub total_count: Option<u64>,
    pub search_text: String,
    pub date_filter: Option<NaiveDate>,
    /// True while no user is signed in; rows are empty and nothing was fetched
    pub pending_auth: bool,
}

/// Paged, filterable record table
pub struct RecordTable {
    pager: Pager,
    page_size_options: Vec<usize>,
}

impl RecordTable {
    /// A table over expense records
    pub fn expenses(source: SourceRef, config: &Config) -> Self {
        Self::new(RecordKind::Expense, source, config)
    }

    /// A table over income records
    pub fn incomes(source: SourceRef, config: &Config) -> Self {
        Self::new(RecordKind::Income, source, config)
    }

    fn new(kind: RecordKind, source: SourceRef, config: &Config) -> Self {
        Self {
            pager: Pager::new(kind, source, config.listing.default_page_size),
            page_size_options: config.listing.page_size_options.clone(),
        }
    }

    fn op(&self, name: &str) -> String {
        format!("{}_table.{}", self.pager.kind(), name)
    }

    /// Page sizes the presentation layer should offer
    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Change the signed-in user; call [`load`](Self::load) afterwards
    pub fn set_user(&mut self, user: Option<Uuid>) {
        self.pager.set_user(user);
    }

    /// The current state without touching the source
    pub fn snapshot(&self) -> TableSnapshot {
        let controller = &self.pager.controller;
        let rows = visible_items(&self.pager.rows, controller.filter());
        TableSnapshot {
            kind: self.pager.kind(),
            page_total: page_total(&rows),
            rows,
            page_number: controller.page_number(),
            page_size: controller.page_size(),
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
    pub async fn load(&mut self) -> ViewResult<TableSnapshot> {
        let op = self.op("load");
        self.pager.reload(&op).await?;
        Ok(self.snapshot())
    }

    /// Back to page 1 with filters kept, then re-fetch
    pub async fn refresh(&mut self) -> ViewResult<TableSnapshot> {
        let mut next = self.pager.controller.clone();
        next.reset_position();
        let op = self.op("refresh");
        self.pager.apply(&op, next).await?;
        Ok(self.snapshot())
    }

    /// Drop every filter and return to page 1, then re-fetch
    pub async fn reset(&mut self) -> ViewResult<TableSnapshot> {
        let mut next = self.pager.controller.clone();
        next.reset_all();
        let op = self.op("reset");
        self.pager.apply(&op, next).await?;
        Ok(self.snapshot())
    }

    // ==================== Filters ====================

    /// Restrict the table to one calendar day; pagination restarts
    pub async fn set_date_filter(&mut self, date: NaiveDate) -> ViewResult<TableSnapshot> {
        let mut next = self.pager.controller.clone();
        next.set_date_filter(date);
        let op = self.op("set_date_filter");
        self.pager.apply(&op, next).await?;
        Ok(self.snapshot())
    }

    /// Remove the date restriction; pagination restarts
    pub async fn clear_date_filter(&mut self) -> ViewResult<TableSnapshot> {
        let mut next = self.pager.controller.clone();
        next.clear_date_filter();
        let op = self.op("clear_date_filter");
        self.pager.apply(&op, next).await?;
        Ok(self.snapshot())
    }

    /// Change the page size; pagination restarts
    pub async fn set_page_size(&mut self, page_size: usize) -> ViewResult<TableSnapshot> {
        let mut next = self.pager.controller.clone();
        next.set_page_size(page_size);
        let op = self.op("set_page_size");
        self.pager.apply(&op, next).await?;
        Ok(self.snapshot())
    }

    /// Update the page-local search; never touches the source
    pub fn set_search_text(&mut self, text: impl Into<String>) -> TableSnapshot {
        self.pager.controller.set_search_text(text);
        self.snapshot()
    }

    // ==================== Navigation ====================

    /// Go forward one page. Without a next page this is a no-op and
    /// returns the unchanged snapshot.
    pub async fn next_page(&mut self) -> ViewResult<TableSnapshot> {
        let mut next = self.pager.controller.clone();
        if !next.go_next(&self.pager.page_info) {
            return Ok(self.snapshot());
        }
        let op = self.op("next_page");
        self.pager.apply(&op, next).await?;
        Ok(self.snapshot())
    }

    /// Go back one page. On page 1 this is a no-op and returns the
    /// unchanged snapshot.
    pub async fn prev_page(&mut self) -> ViewResult<TableSnapshot> {
        let mut next = self.pager.controller.clone();
        if !next.go_prev() {
            return Ok(self.snapshot());
        }
        let op = self.op("prev_page");
        self.pager.apply(&op, next).await?;
        Ok(self.snapshot())
    }

    // ==================== Mutations ====================

    /// Add a record owned by the signed-in user
    pub async fn add(
        &mut self,
        source_name: String,
        amount: Decimal,
        date: NaiveDateTime,
    ) -> ViewResult<TableSnapshot> {
        let op = self.op("add");
        self.pager.insert(&op, source_name, amount, date).await?;
        Ok(self.snapshot())
    }

    /// Edit an owned record
    pub async fn edit(&mut self, id: Uuid, patch: RecordPatch) -> ViewResult<TableSnapshot> {
        let op = self.op("edit");
        self.pager.update(&op, id, patch).await?;
        Ok(self.snapshot())
    }

    /// Delete an owned record
    pub async fn remove(&mut self, id: Uuid) -> ViewResult<TableSnapshot> {
        let op = self.op("remove");
        self.pager.remove(&op, id).await?;
        Ok(self.snapshot())
    }
}

// ==================== Tests ====================
