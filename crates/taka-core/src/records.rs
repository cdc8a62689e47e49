//! Expense and income records

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record kind enumeration
///
/// Expenses and incomes live in separate collections on the record
/// source; a record itself carries no kind field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Money going out (groceries, transport)
    Expense,
    /// Money coming in (salary, freelance)
    Income,
}

impl Default for RecordKind {
    fn default() -> Self {
        RecordKind::Expense
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "expenses" => Ok(RecordKind::Expense),
            "income" | "incomes" => Ok(RecordKind::Income),
            _ => Err(format!("Invalid record kind: {}", s)),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Expense => write!(f, "expense"),
            RecordKind::Income => write!(f, "income"),
        }
    }
}

/// A single expense or income record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique record identifier
    pub id: Uuid,
    /// Where the money went or came from (e.g., "Groceries", "Salary")
    pub source: String,
    /// Amount in the operating currency
    pub amount: Decimal,
    /// When the record happened (local time)
    pub date: NaiveDateTime,
    /// Owning user; every query and mutation is scoped by this
    pub owner_id: Uuid,
}

impl Record {
    /// Get the (year, month) bucket key for monthly rollups
    pub fn month(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

/// Insert payload for a new record (id is minted by the source)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub owner_id: Uuid,
}

/// Partial update for an existing record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
}

impl RecordPatch {
    /// Check whether the patch changes anything at all
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.amount.is_none() && self.date.is_none()
    }
}

// ==================== Tests ====================
