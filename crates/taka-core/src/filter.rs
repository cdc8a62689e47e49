//! Listing filter state
//!
//! The two user-facing filters a listing surface carries: a calendar-day
//! date filter that narrows the server query, and free-text search that
//! only narrows what is shown from the already-fetched page.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::query::DateBounds;
use crate::records::Record;

/// Filter state of one listing surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFilter {
    /// Server-side: restrict records to this calendar day
    pub date: Option<NaiveDate>,
    /// Client-side: case-insensitive substring match on the source field.
    /// Empty means no filtering.
    pub search_text: String,
}

impl ListFilter {
    /// True when neither filter is active
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.search_text.is_empty()
    }

    /// Whether a record's source matches the search text.
    /// Empty search matches everything.
    pub fn matches_search(&self, record: &Record) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        record
            .source
            .to_lowercase()
            .contains(&self.search_text.to_lowercase())
    }
}

/// Expand a calendar day into the inclusive datetime window covering it:
/// 00:00:00 through 23:59:59.999.
pub fn day_bounds(date: NaiveDate) -> DateBounds {
    let start = date.and_time(NaiveTime::MIN);
    let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
        .map(|t| date.and_time(t))
        .unwrap_or(start);
    DateBounds {
        gte: start,
        lte: end,
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn record(source: &str) -> Record {
        Record {
            id: Uuid::new_v4(),
            source: source.to_string(),
            amount: Decimal::new(100, 0),
            date: NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_time(NaiveTime::MIN),
            owner_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let filter = ListFilter::default();
        assert!(filter.matches_search(&record("Groceries")));
        assert!(filter.matches_search(&record("")));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = ListFilter {
            search_text: "gro".to_string(),
            ..Default::default()
        };
        assert!(filter.matches_search(&record("Groceries")));
        assert!(filter.matches_search(&record("AGRO supplies")));
        assert!(!filter.matches_search(&record("Bus fare")));

        let upper = ListFilter {
            search_text: "BUS".to_string(),
            ..Default::default()
        };
        assert!(upper.matches_search(&record("bus fare")));
    }

    #[test]
    fn test_is_empty() {
        assert!(ListFilter::default().is_empty());
        assert!(!ListFilter {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        }
        .is_empty());
        assert!(!ListFilter {
            search_text: "x".to_string(),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_day_bounds_covers_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let bounds = day_bounds(date);
        assert_eq!(bounds.gte.to_string(), "2024-03-15 00:00:00");
        assert_eq!(bounds.lte.to_string(), "2024-03-15 23:59:59.999");
        assert!(bounds.gte < bounds.lte);
    }
}
