//! Record query parameters
//!
//! The wire-level query the listing controller compiles its state into:
//! server-side filter, ordering, and a one-directional pagination window.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::paging::Cursor;

// ==================== Ordering ====================

/// Record field a query can sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    #[default]
    Date,
    Amount,
    Source,
}

/// Sort direction with explicit null placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    AscNullsFirst,
    AscNullsLast,
    DescNullsFirst,
    #[default]
    DescNullsLast,
}

impl SortDirection {
    /// Whether this direction sorts descending
    pub fn is_descending(&self) -> bool {
        matches!(self, Self::DescNullsFirst | Self::DescNullsLast)
    }
}

/// One ordering term; queries carry a list of these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: OrderField,
    pub direction: SortDirection,
}

impl OrderBy {
    /// The ordering every listing surface uses: newest records first
    pub fn newest_first() -> Vec<OrderBy> {
        vec![OrderBy {
            field: OrderField::Date,
            direction: SortDirection::DescNullsLast,
        }]
    }
}

// ==================== Filter ====================

/// Inclusive datetime range, both ends required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub gte: NaiveDateTime,
    pub lte: NaiveDateTime,
}

/// Server-side filter terms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Owner scope. Sources reject queries without one.
    pub user_id: Option<Uuid>,
    /// Optional datetime window on the record date
    pub date: Option<DateBounds>,
}

// ==================== Query ====================

/// A complete paginated record query.
///
/// `first`/`after` express a forward window, `last`/`before` a backward
/// one; a query drives at most one direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordQuery {
    pub filter: RecordFilter,
    pub order_by: Vec<OrderBy>,
    pub first: Option<usize>,
    pub after: Option<Cursor>,
    pub last: Option<usize>,
    pub before: Option<Cursor>,
}

// ==================== Tests ====================
