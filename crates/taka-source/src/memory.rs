//! In-memory record source
//!
//! Serves the full record-source contract from process memory: owner
//! scoping, date bounds, ordering, and cursor windows over a connection
//! result. Cursor tokens are the hex form of the record id they anchor
//! at; a token from a query whose ordering no longer contains that
//! record decodes fine but fails anchor lookup.

use std::cmp::Ordering;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use taka_core::{
    Connection, Cursor, Edge, NewRecord, OrderBy, OrderField, PageInfo, Record, RecordKind,
    RecordPatch, RecordQuery,
};

use crate::error::{SourceError, SourceResult};
use crate::seed::SeedFile;
use crate::RecordSource;

// ==================== Cursor codec ====================

fn mint_cursor(id: Uuid) -> Cursor {
    Cursor::new(id.as_simple().to_string())
}

fn decode_cursor(cursor: &Cursor) -> SourceResult<Uuid> {
    Uuid::try_parse(cursor.as_str()).map_err(|_| SourceError::BadCursor {
        token: cursor.as_str().to_string(),
    })
}

// ==================== Store ====================

#[derive(Debug, Default)]
struct Store {
    expenses: Vec<Record>,
    incomes: Vec<Record>,
}

impl Store {
    fn records(&self, kind: RecordKind) -> &Vec<Record> {
        match kind {
            RecordKind::Expense => &self.expenses,
            RecordKind::Income => &self.incomes,
        }
    }

    fn records_mut(&mut self, kind: RecordKind) -> &mut Vec<Record> {
        match kind {
            RecordKind::Expense => &mut self.expenses,
            RecordKind::Income => &mut self.incomes,
        }
    }
}

// ==================== Source ====================

/// Record source backed by process memory
#[derive(Debug, Default)]
pub struct MemorySource {
    store: RwLock<Store>,
}

impl MemorySource {
    /// An empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// A source pre-populated from seed data; every seed record gets a
    /// fresh id and the seed's owner
    pub fn from_seed(seed: &SeedFile) -> Self {
        let source = Self::new();
        {
            let mut store = source.store.write().unwrap();
            store.expenses = seed
                .expenses
                .iter()
                .map(|r| r.to_record(seed.user_id))
                .collect();
            store.incomes = seed
                .incomes
                .iter()
                .map(|r| r.to_record(seed.user_id))
                .collect();
        }
        source
    }

    /// Number of stored records of a kind, unscoped; test and demo aid
    pub fn len(&self, kind: RecordKind) -> usize {
        self.store.read().unwrap().records(kind).len()
    }

    /// Whether no records of a kind are stored
    pub fn is_empty(&self, kind: RecordKind) -> bool {
        self.len(kind) == 0
    }
}

// No record field is nullable, so the null-placement half of the
// direction never applies here.
fn compare(a: &Record, b: &Record, order: &[OrderBy]) -> Ordering {
    for term in order {
        let ord = match term.field {
            OrderField::Date => a.date.cmp(&b.date),
            OrderField::Amount => a.amount.cmp(&b.amount),
            OrderField::Source => a.source.cmp(&b.source),
        };
        let ord = if term.direction.is_descending() {
            ord.reverse()
        } else {
            ord
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    // stable tie-break so cursors stay unambiguous
    a.id.cmp(&b.id)
}

fn anchor_position(sorted: &[Record], cursor: &Cursor) -> SourceResult<usize> {
    let anchor = decode_cursor(cursor)?;
    sorted
        .iter()
        .position(|r| r.id == anchor)
        .ok_or_else(|| SourceError::BadCursor {
            token: cursor.as_str().to_string(),
        })
}

fn validate_window(query: &RecordQuery) -> SourceResult<()> {
    match (query.first, query.last) {
        (Some(_), Some(_)) => {
            return Err(SourceError::InvalidQuery {
                message: "first and last are exclusive".to_string(),
            })
        }
        (None, None) => {
            return Err(SourceError::InvalidQuery {
                message: "a window size (first or last) is required".to_string(),
            })
        }
        _ => {}
    }
    if query.first.is_some() && query.before.is_some() {
        return Err(SourceError::InvalidQuery {
            message: "before requires last".to_string(),
        });
    }
    if query.last.is_some() && query.after.is_some() {
        return Err(SourceError::InvalidQuery {
            message: "after requires first".to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch(&self, kind: RecordKind, query: RecordQuery) -> SourceResult<Connection<Record>> {
        let Some(user) = query.filter.user_id else {
            return Err(SourceError::UnscopedQuery);
        };
        validate_window(&query)?;

        let mut matched: Vec<Record> = {
            let store = self.store.read().unwrap();
            store
                .records(kind)
                .iter()
                .filter(|r| r.owner_id == user)
                .filter(|r| match &query.filter.date {
                    Some(bounds) => r.date >= bounds.gte && r.date <= bounds.lte,
                    None => true,
                })
                .cloned()
                .collect()
        };
        matched.sort_by(|a, b| compare(a, b, &query.order_by));
        let total = matched.len();

        let (start, end, has_previous_page, has_next_page) = if let Some(n) = query.first {
            let start = match &query.after {
                Some(cursor) => anchor_position(&matched, cursor)? + 1,
                None => 0,
            };
            let end = (start + n).min(total);
            (start, end, start > 0, end < total)
        } else {
            // backward window: the last n records before the anchor
            let n = query.last.unwrap_or(0);
            let end = match &query.before {
                Some(cursor) => anchor_position(&matched, cursor)?,
                None => total,
            };
            let start = end.saturating_sub(n);
            (start, end, start > 0, end < total)
        };

        let edges: Vec<Edge<Record>> = matched[start..end]
            .iter()
            .map(|r| Edge {
                cursor: mint_cursor(r.id),
                node: r.clone(),
            })
            .collect();

        let page_info = PageInfo {
            has_next_page,
            has_previous_page,
            start_cursor: edges.first().map(|e| e.cursor.clone()),
            end_cursor: edges.last().map(|e| e.cursor.clone()),
        };

        Ok(Connection {
            edges,
            page_info,
            total_count: Some(total as u64),
        })
    }

    async fn insert(&self, kind: RecordKind, record: NewRecord) -> SourceResult<Record> {
        let record = Record {
            id: Uuid::new_v4(),
            source: record.source,
            amount: record.amount,
            date: record.date,
            owner_id: record.owner_id,
        };
        let mut store = self.store.write().unwrap();
        store.records_mut(kind).push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        kind: RecordKind,
        owner: Uuid,
        id: Uuid,
        patch: RecordPatch,
    ) -> SourceResult<Record> {
        let mut store = self.store.write().unwrap();
        let record = store
            .records_mut(kind)
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner)
            .ok_or(SourceError::NotFound { id })?;

        if let Some(source) = patch.source {
            record.source = source;
        }
        if let Some(amount) = patch.amount {
            record.amount = amount;
        }
        if let Some(date) = patch.date {
            record.date = date;
        }
        Ok(record.clone())
    }

    async fn delete(&self, kind: RecordKind, owner: Uuid, id: Uuid) -> SourceResult<Record> {
        let mut store = self.store.write().unwrap();
        let records = store.records_mut(kind);
        let pos = records
            .iter()
            .position(|r| r.id == id && r.owner_id == owner)
            .ok_or(SourceError::NotFound { id })?;
        Ok(records.remove(pos))
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use taka_core::{day_bounds, RecordFilter};

    fn seeded(user: Uuid, count: usize) -> MemorySource {
        let source = MemorySource::new();
        let mut store = source.store.write().unwrap();
        for i in 0..count {
            let day = (i % 28) as u32 + 1;
            store.expenses.push(Record {
                id: Uuid::new_v4(),
                source: format!("Shop {}", i),
                amount: Decimal::new(10 + i as i64, 0),
                date: NaiveDate::from_ymd_opt(2024, 3, day)
                    .unwrap()
                    .and_time(NaiveTime::MIN),
                owner_id: user,
            });
        }
        drop(store);
        source
    }

    fn forward_query(user: Uuid, n: usize, after: Option<Cursor>) -> RecordQuery {
        RecordQuery {
            filter: RecordFilter {
                user_id: Some(user),
                date: None,
            },
            order_by: OrderBy::newest_first(),
            first: Some(n),
            after,
            last: None,
            before: None,
        }
    }

    #[tokio::test]
    async fn test_unscoped_query_rejected() {
        let source = seeded(Uuid::new_v4(), 3);
        let query = RecordQuery {
            first: Some(10),
            ..Default::default()
        };
        let err = source.fetch(RecordKind::Expense, query).await.unwrap_err();
        assert!(matches!(err, SourceError::UnscopedQuery));
    }

    #[tokio::test]
    async fn test_window_validation() {
        let user = Uuid::new_v4();
        let source = seeded(user, 3);

        let both = RecordQuery {
            filter: RecordFilter {
                user_id: Some(user),
                date: None,
            },
            first: Some(5),
            last: Some(5),
            ..Default::default()
        };
        assert!(matches!(
            source.fetch(RecordKind::Expense, both).await.unwrap_err(),
            SourceError::InvalidQuery { .. }
        ));

        let neither = RecordQuery {
            filter: RecordFilter {
                user_id: Some(user),
                date: None,
            },
            ..Default::default()
        };
        assert!(matches!(
            source.fetch(RecordKind::Expense, neither).await.unwrap_err(),
            SourceError::InvalidQuery { .. }
        ));

        let mixed = RecordQuery {
            filter: RecordFilter {
                user_id: Some(user),
                date: None,
            },
            first: Some(5),
            before: Some(Cursor::new("00000000000000000000000000000000")),
            ..Default::default()
        };
        assert!(matches!(
            source.fetch(RecordKind::Expense, mixed).await.unwrap_err(),
            SourceError::InvalidQuery { .. }
        ));
    }

    #[tokio::test]
    async fn test_forward_pages_tile_without_overlap() {
        let user = Uuid::new_v4();
        let source = seeded(user, 25);

        let mut seen = Vec::new();
        let mut after = None;
        loop {
            let page = source
                .fetch(RecordKind::Expense, forward_query(user, 10, after.clone()))
                .await
                .unwrap();
            for edge in &page.edges {
                seen.push(edge.node.id);
            }
            if !page.page_info.has_next_page {
                break;
            }
            after = page.page_info.end_cursor.clone();
        }

        assert_eq!(seen.len(), 25);
        let mut unique = seen.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 25, "pages must not overlap");
    }

    #[tokio::test]
    async fn test_newest_first_ordering() {
        let user = Uuid::new_v4();
        let source = seeded(user, 10);
        let page = source
            .fetch(RecordKind::Expense, forward_query(user, 10, None))
            .await
            .unwrap();
        let dates: Vec<_> = page.edges.iter().map(|e| e.node.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[tokio::test]
    async fn test_page_info_adjacency() {
        let user = Uuid::new_v4();
        let source = seeded(user, 15);

        let first = source
            .fetch(RecordKind::Expense, forward_query(user, 10, None))
            .await
            .unwrap();
        assert!(first.page_info.has_next_page);
        assert!(!first.page_info.has_previous_page);
        assert_eq!(first.edges.len(), 10);
        assert_eq!(first.total_count, Some(15));

        let second = source
            .fetch(
                RecordKind::Expense,
                forward_query(user, 10, first.page_info.end_cursor.clone()),
            )
            .await
            .unwrap();
        assert!(!second.page_info.has_next_page);
        assert!(second.page_info.has_previous_page);
        assert_eq!(second.edges.len(), 5);
    }

    #[tokio::test]
    async fn test_backward_window() {
        let user = Uuid::new_v4();
        let source = seeded(user, 12);

        let all = source
            .fetch(RecordKind::Expense, forward_query(user, 12, None))
            .await
            .unwrap();
        let anchor = all.edges[10].cursor.clone();

        let query = RecordQuery {
            filter: RecordFilter {
                user_id: Some(user),
                date: None,
            },
            order_by: OrderBy::newest_first(),
            first: None,
            after: None,
            last: Some(4),
            before: Some(anchor),
        };
        let page = source.fetch(RecordKind::Expense, query).await.unwrap();

        assert_eq!(page.edges.len(), 4);
        assert!(page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
        let expected: Vec<_> = all.edges[6..10].iter().map(|e| e.node.id).collect();
        let got: Vec<_> = page.edges.iter().map(|e| e.node.id).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_stale_cursor_rejected() {
        let user = Uuid::new_v4();
        let source = seeded(user, 5);

        let garbage = forward_query(user, 5, Some(Cursor::new("not-a-cursor")));
        assert!(matches!(
            source.fetch(RecordKind::Expense, garbage).await.unwrap_err(),
            SourceError::BadCursor { .. }
        ));

        // a valid token whose record is outside the filtered ordering
        let page = source
            .fetch(RecordKind::Expense, forward_query(user, 5, None))
            .await
            .unwrap();
        let cursor = page.page_info.end_cursor.unwrap();

        let mut narrowed = forward_query(user, 5, Some(cursor));
        narrowed.filter.date = Some(day_bounds(
            NaiveDate::from_ymd_opt(1999, 1, 1).unwrap(),
        ));
        assert!(matches!(
            source.fetch(RecordKind::Expense, narrowed).await.unwrap_err(),
            SourceError::BadCursor { .. }
        ));
    }

    #[tokio::test]
    async fn test_date_bounds_inclusive() {
        let user = Uuid::new_v4();
        let source = MemorySource::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        {
            let mut store = source.store.write().unwrap();
            let mut push = |time: NaiveTime| {
                store.expenses.push(Record {
                    id: Uuid::new_v4(),
                    source: "Edge".to_string(),
                    amount: Decimal::new(1, 0),
                    date: date.and_time(time),
                    owner_id: user,
                });
            };
            push(NaiveTime::MIN);
            push(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());
            push(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
            store.expenses.push(Record {
                id: Uuid::new_v4(),
                source: "Other day".to_string(),
                amount: Decimal::new(1, 0),
                date: NaiveDate::from_ymd_opt(2024, 3, 16)
                    .unwrap()
                    .and_time(NaiveTime::MIN),
                owner_id: user,
            });
        }

        let mut query = forward_query(user, 10, None);
        query.filter.date = Some(day_bounds(date));
        let page = source.fetch(RecordKind::Expense, query).await.unwrap();
        assert_eq!(page.edges.len(), 3);
        assert_eq!(page.total_count, Some(3));
    }

    #[tokio::test]
    async fn test_owner_scope_isolates_users() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let source = seeded(alice, 5);
        source
            .insert(
                RecordKind::Expense,
                NewRecord {
                    source: "Bob's lunch".to_string(),
                    amount: Decimal::new(9, 0),
                    date: NaiveDate::from_ymd_opt(2024, 3, 1)
                        .unwrap()
                        .and_time(NaiveTime::MIN),
                    owner_id: bob,
                },
            )
            .await
            .unwrap();

        let page = source
            .fetch(RecordKind::Expense, forward_query(bob, 10, None))
            .await
            .unwrap();
        assert_eq!(page.edges.len(), 1);
        assert_eq!(page.edges[0].node.source, "Bob's lunch");
        assert_eq!(page.total_count, Some(1));
    }

    #[tokio::test]
    async fn test_update_scoped_to_owner() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let source = seeded(alice, 1);
        let id = source.store.read().unwrap().expenses[0].id;

        let patch = RecordPatch {
            source: Some("Edited".to_string()),
            ..Default::default()
        };
        let err = source
            .update(RecordKind::Expense, bob, id, patch.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));

        let updated = source
            .update(RecordKind::Expense, alice, id, patch)
            .await
            .unwrap();
        assert_eq!(updated.source, "Edited");
    }

    #[tokio::test]
    async fn test_delete_scoped_to_owner() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let source = seeded(alice, 2);
        let id = source.store.read().unwrap().expenses[0].id;

        assert!(source
            .delete(RecordKind::Expense, bob, id)
            .await
            .is_err());
        assert_eq!(source.len(RecordKind::Expense), 2);

        let removed = source.delete(RecordKind::Expense, alice, id).await.unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(source.len(RecordKind::Expense), 1);
    }

    #[tokio::test]
    async fn test_zero_sized_window() {
        let user = Uuid::new_v4();
        let source = seeded(user, 3);
        let page = source
            .fetch(RecordKind::Expense, forward_query(user, 0, None))
            .await
            .unwrap();
        assert!(page.edges.is_empty());
        assert!(page.page_info.start_cursor.is_none());
        assert!(page.page_info.has_next_page);
        assert_eq!(page.total_count, Some(3));
    }

    #[tokio::test]
    async fn test_kinds_are_separate_collections() {
        let user = Uuid::new_v4();
        let source = seeded(user, 2);
        source
            .insert(
                RecordKind::Income,
                NewRecord {
                    source: "Salary".to_string(),
                    amount: Decimal::new(1000, 0),
                    date: NaiveDate::from_ymd_opt(2024, 3, 1)
                        .unwrap()
                        .and_time(NaiveTime::MIN),
                    owner_id: user,
                },
            )
            .await
            .unwrap();

        let incomes = source
            .fetch(RecordKind::Income, forward_query(user, 10, None))
            .await
            .unwrap();
        assert_eq!(incomes.edges.len(), 1);
        assert_eq!(source.len(RecordKind::Expense), 2);
    }
}
