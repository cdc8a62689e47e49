//! Income and expense overview
//!
//! One number each for income, expense and the balance between them.
//! Both kinds are fetched in a single capped newest-first window, the
//! same window the monthly rollup uses, so histories larger than the
//! configured limit are summarized from their newest records only.

use serde::Serialize;
use uuid::Uuid;

use taka_config::Config;
use taka_core::{summarize, OrderBy, RecordFilter, RecordKind, RecordQuery, Summary};
use taka_source::SourceRef;

use crate::error::{report, ViewError, ViewResult};

/// What the overview shows after an operation
#[derive(Debug, Clone, Serialize)]
pub struct SummarySnapshot {
    pub summary: Summary,
    /// True while no user is signed in; totals are zero and nothing was fetched
    pub pending_auth: bool,
}

/// Totals over both record kinds
pub struct SummaryView {
    source: SourceRef,
    user: Option<Uuid>,
    fetch_limit: usize,
    summary: Summary,
}

impl SummaryView {
    pub fn new(source: SourceRef, config: &Config) -> Self {
        Self {
            source,
            user: None,
            fetch_limit: config.monthly.fetch_limit,
            summary: Summary::default(),
        }
    }

    /// Change the signed-in user; call [`load`](Self::load) afterwards
    pub fn set_user(&mut self, user: Option<Uuid>) {
        self.user = user;
        self.summary = Summary::default();
    }

    /// The current state without touching the source
    pub fn snapshot(&self) -> SummarySnapshot {
        SummarySnapshot {
            summary: self.summary.clone(),
            pending_auth: self.user.is_none(),
        }
    }

    /// Fetch both kinds and total them. The cached summary is replaced
    /// only when both fetches succeed.
    pub async fn load(&mut self) -> ViewResult<SummarySnapshot> {
        let Some(user) = self.user else {
            self.summary = Summary::default();
            return Ok(self.snapshot());
        };

        let incomes = self.fetch_kind(user, RecordKind::Income).await?;
        let expenses = self.fetch_kind(user, RecordKind::Expense).await?;
        self.summary = summarize(&incomes, &expenses);
        Ok(self.snapshot())
    }

    async fn fetch_kind(
        &self,
        user: Uuid,
        kind: RecordKind,
    ) -> ViewResult<Vec<taka_core::Record>> {
        let query = RecordQuery {
            filter: RecordFilter {
                user_id: Some(user),
                date: None,
            },
            order_by: OrderBy::newest_first(),
            first: Some(self.fetch_limit),
            ..RecordQuery::default()
        };
        match self.source.fetch(kind, query).await {
            Ok(conn) => Ok(conn.into_nodes()),
            Err(err) => Err(report(
                &format!("summary.load.{kind}"),
                self.user,
                ViewError::fetch(&err),
            )),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{demo_config, flaky_over, seed_record, user_id};
    use rust_decimal::Decimal;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use taka_source::MemorySource;

    #[tokio::test]
    async fn test_summary_totals_both_kinds() {
        let user = user_id();
        let source = MemorySource::new();
        let d = |s| Decimal::new(s, 0);
        seed_record(&source, user, RecordKind::Income, "Salary", d(3000), "2024-03-01T10:00:00").await;
        seed_record(&source, user, RecordKind::Income, "Freelance", d(450), "2024-03-18T20:00:00").await;
        seed_record(&source, user, RecordKind::Expense, "Rent", d(500), "2024-03-05T09:00:00").await;
        seed_record(&source, user, RecordKind::Expense, "Bazar", d(120), "2024-03-09T18:00:00").await;

        let mut view = SummaryView::new(Arc::new(source), &demo_config());
        view.set_user(Some(user));
        let snap = view.load().await.unwrap();
        assert_eq!(snap.summary.total_income, d(3450));
        assert_eq!(snap.summary.total_expense, d(620));
        assert_eq!(snap.summary.net, d(2830));
    }

    #[tokio::test]
    async fn test_pending_auth_is_all_zero() {
        let (flaky, source) = flaky_over(MemorySource::new());
        let mut view = SummaryView::new(source, &demo_config());

        let snap = view.load().await.unwrap();
        assert!(snap.pending_auth);
        assert_eq!(snap.summary.net, Decimal::ZERO);
        assert_eq!(flaky.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_summary() {
        let user = user_id();
        let source = MemorySource::new();
        seed_record(
            &source,
            user,
            RecordKind::Income,
            "Salary",
            Decimal::new(3000, 0),
            "2024-03-01T10:00:00",
        )
        .await;
        let (flaky, source) = flaky_over(source);

        let mut view = SummaryView::new(source, &demo_config());
        view.set_user(Some(user));
        view.load().await.unwrap();

        flaky.fail_fetch.store(true, Ordering::SeqCst);
        let err = view.load().await.unwrap_err();
        assert!(matches!(err, ViewError::Fetch { .. }));
        assert_eq!(view.snapshot().summary.total_income, Decimal::new(3000, 0));
    }
}
