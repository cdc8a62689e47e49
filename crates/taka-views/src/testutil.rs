//! Shared fixtures for surface tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use taka_config::Config;
use taka_core::{Connection, NewRecord, Record, RecordKind, RecordPatch, RecordQuery};
use taka_source::{MemorySource, RecordSource, SourceError, SourceRef, SourceResult};

pub(crate) fn user_id() -> Uuid {
    Uuid::parse_str("5e8c2f1a-9d4b-4c6e-8a1f-2b3c4d5e6f70").unwrap()
}

pub(crate) fn demo_config() -> Config {
    Config::default()
}

pub(crate) async fn seed_record(
    source: &MemorySource,
    user: Uuid,
    kind: RecordKind,
    name: &str,
    amount: Decimal,
    date: &str,
) {
    let record = NewRecord {
        source: name.to_string(),
        amount,
        date: date.parse().unwrap(),
        owner_id: user,
    };
    source.insert(kind, record).await.unwrap();
}

async fn seed_expenses(source: &MemorySource, user: Uuid, count: usize) {
    for i in 0..count {
        let day = (i % 28) as u32 + 1;
        let date = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let record = NewRecord {
            source: format!("Shop {i}"),
            amount: Decimal::new(100 + i as i64, 0),
            date,
            owner_id: user,
        };
        source.insert(RecordKind::Expense, record).await.unwrap();
    }
}

/// A source holding `count` expenses for `user`, one per day of March 2024
pub(crate) async fn seeded_source(user: Uuid, count: usize) -> SourceRef {
    let source = MemorySource::new();
    seed_expenses(&source, user, count).await;
    Arc::new(source)
}

/// Wraps a memory source with switchable failures and a fetch counter
pub(crate) struct FlakySource {
    inner: MemorySource,
    pub(crate) fail_fetch: AtomicBool,
    pub(crate) fail_mutations: AtomicBool,
    pub(crate) fetches: AtomicUsize,
}

impl FlakySource {
    fn outage() -> SourceError {
        SourceError::Unavailable {
            message: "injected outage".to_string(),
        }
    }
}

#[async_trait]
impl RecordSource for FlakySource {
    async fn fetch(
        &self,
        kind: RecordKind,
        query: RecordQuery,
    ) -> SourceResult<Connection<Record>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.fetch(kind, query).await
    }

    async fn insert(&self, kind: RecordKind, record: NewRecord) -> SourceResult<Record> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.insert(kind, record).await
    }

    async fn update(
        &self,
        kind: RecordKind,
        owner: Uuid,
        id: Uuid,
        patch: RecordPatch,
    ) -> SourceResult<Record> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.update(kind, owner, id, patch).await
    }

    async fn delete(&self, kind: RecordKind, owner: Uuid, id: Uuid) -> SourceResult<Record> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.delete(kind, owner, id).await
    }
}

/// Wrap an already-seeded source; the concrete handle stays available
/// for flipping failures mid-test
pub(crate) fn flaky_over(inner: MemorySource) -> (Arc<FlakySource>, SourceRef) {
    let flaky = Arc::new(FlakySource {
        inner,
        fail_fetch: AtomicBool::new(false),
        fail_mutations: AtomicBool::new(false),
        fetches: AtomicUsize::new(0),
    });
    let source: SourceRef = flaky.clone();
    (flaky, source)
}

/// A flaky source over `count` seeded expenses
pub(crate) async fn flaky_source(user: Uuid, count: usize) -> (Arc<FlakySource>, SourceRef) {
    let inner = MemorySource::new();
    seed_expenses(&inner, user, count).await;
    flaky_over(inner)
}
