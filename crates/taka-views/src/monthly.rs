//! Monthly aggregation surface
//!
//! Buckets one record kind into per-month totals. The source is asked
//! once for a large newest-first window; month rows are built from that
//! window and paged locally, so month navigation and the month filter
//! never go back to the source. The window size is capped by
//! configuration, so on very large histories the oldest records fall
//! outside the rollup.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use taka_config::Config;
use taka_core::{
    grand_total, month_label, monthly_totals, MonthlyTotal, OrderBy, RecordFilter, RecordKind,
    RecordQuery,
};
use taka_source::SourceRef;

use crate::error::{report, ViewError, ViewResult};

/// What the monthly view shows after an operation
#[derive(Debug, Clone, Serialize)]
pub struct MonthlySnapshot {
    pub kind: RecordKind,
    /// Month rows on the current local page
    pub months: Vec<MonthlyTotal>,
    pub page: usize,
    pub page_count: usize,
    /// Label of the selected month, when one is selected
    pub month_filter: Option<String>,
    /// Sum over every month the view covers, not just the page shown
    pub grand_total: Decimal,
    /// Months the view covers after the cap and the filter
    pub month_count: usize,
    /// True while no user is signed in; months are empty and nothing was fetched
    pub pending_auth: bool,
}

/// Per-month rollup of one record kind
pub struct MonthlyView {
    kind: RecordKind,
    source: SourceRef,
    user: Option<Uuid>,
    fetch_limit: usize,
    months_per_page: usize,
    month_cap: Option<usize>,
    months: Vec<MonthlyTotal>,
    month_filter: Option<(i32, u32)>,
    page: usize,
}

impl MonthlyView {
    /// Monthly expense totals
    pub fn expenses(source: SourceRef, config: &Config) -> Self {
        Self::new(RecordKind::Expense, source, config)
    }

    /// Monthly income totals
    pub fn incomes(source: SourceRef, config: &Config) -> Self {
        Self::new(RecordKind::Income, source, config)
    }

    fn new(kind: RecordKind, source: SourceRef, config: &Config) -> Self {
        Self {
            kind,
            source,
            user: None,
            fetch_limit: config.monthly.fetch_limit,
            months_per_page: config.monthly.months_per_page,
            month_cap: None,
            months: Vec::new(),
            month_filter: None,
            page: 1,
        }
    }

    /// Keep only the newest `cap` months after bucketing
    pub fn with_month_cap(mut self, cap: usize) -> Self {
        self.month_cap = Some(cap);
        self
    }

    /// Change the signed-in user; call [`load`](Self::load) afterwards
    pub fn set_user(&mut self, user: Option<Uuid>) {
        self.user = user;
        self.months.clear();
        self.page = 1;
    }

    fn op(&self, name: &str) -> String {
        format!("{}_monthly.{}", self.kind, name)
    }

    /// Months after the filter, newest first
    fn covered(&self) -> Vec<MonthlyTotal> {
        match self.month_filter {
            Some((year, month)) => self
                .months
                .iter()
                .filter(|m| m.year == year && m.month == month)
                .cloned()
                .collect(),
            None => self.months.clone(),
        }
    }

    /// The current state without touching the source
    pub fn snapshot(&self) -> MonthlySnapshot {
        let covered = self.covered();
        let page_count = covered.len().div_ceil(self.months_per_page);
        let page = self.page.min(page_count.max(1));
        let start = (page - 1) * self.months_per_page;
        let end = (start + self.months_per_page).min(covered.len());
        let months = if start < covered.len() {
            covered[start..end].to_vec()
        } else {
            Vec::new()
        };
        MonthlySnapshot {
            kind: self.kind,
            grand_total: grand_total(&covered),
            month_count: covered.len(),
            months,
            page,
            page_count,
            month_filter: self.month_filter.map(|(y, m)| month_label(y, m)),
            pending_auth: self.user.is_none(),
        }
    }

    // ==================== Fetching ====================

    /// Fetch the newest records once and bucket them into months
    pub async fn load(&mut self) -> ViewResult<MonthlySnapshot> {
        let op = self.op("load");
        self.fetch_months(&op).await?;
        Ok(self.snapshot())
    }

    /// Re-fetch and return to the first page of months
    pub async fn refresh(&mut self) -> ViewResult<MonthlySnapshot> {
        let op = self.op("refresh");
        self.fetch_months(&op).await?;
        self.page = 1;
        Ok(self.snapshot())
    }

    /// One capped window per load; the bucketed months replace the
    /// cached ones only when the fetch succeeds.
    async fn fetch_months(&mut self, op: &str) -> ViewResult<()> {
        let Some(user) = self.user else {
            self.months.clear();
            return Ok(());
        };
        let query = RecordQuery {
            filter: RecordFilter {
                user_id: Some(user),
                date: None,
            },
            order_by: OrderBy::newest_first(),
            first: Some(self.fetch_limit),
            ..RecordQuery::default()
        };
        match self.source.fetch(self.kind, query).await {
            Ok(conn) => {
                let mut months = monthly_totals(&conn.into_nodes());
                if let Some(cap) = self.month_cap {
                    months.truncate(cap);
                }
                self.months = months;
                Ok(())
            }
            Err(err) => Err(report(op, self.user, ViewError::fetch(&err))),
        }
    }

    // ==================== Filters and navigation ====================

    /// Show a single month; local, never touches the source
    pub fn set_month_filter(&mut self, year: i32, month: u32) -> MonthlySnapshot {
        self.month_filter = Some((year, month));
        self.page = 1;
        self.snapshot()
    }

    /// Show every month again; local, never touches the source
    pub fn clear_month_filter(&mut self) -> MonthlySnapshot {
        self.month_filter = None;
        self.page = 1;
        self.snapshot()
    }

    /// Next page of month rows; local, never touches the source
    pub fn next_page(&mut self) -> MonthlySnapshot {
        let page_count = self.covered().len().div_ceil(self.months_per_page);
        if self.page < page_count {
            self.page += 1;
        }
        self.snapshot()
    }

    /// Previous page of month rows; local, never touches the source
    pub fn prev_page(&mut self) -> MonthlySnapshot {
        if self.page > 1 {
            self.page -= 1;
        }
        self.snapshot()
    }
}

// ==================== Tests ====================
