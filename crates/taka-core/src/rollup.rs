//! Monthly rollups and totals
//!
//! Aggregation over fetched records: calendar-month buckets for the
//! monthly views and the overall income/expense summary. These operate
//! on whatever window of records the caller fetched, so their totals
//! are only as complete as that window.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::records::Record;

/// One calendar month's aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    /// Display label, e.g. "Mar-2024"
    pub label: String,
    pub total: Decimal,
    /// Number of records in the bucket
    pub count: usize,
}

/// Label for a month in the fixed "Mar-2024" form
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b-%Y").to_string())
        .unwrap_or_else(|| format!("{:02}-{}", month, year))
}

/// Bucket records by calendar month, newest month first
pub fn monthly_totals(records: &[Record]) -> Vec<MonthlyTotal> {
    let mut buckets: HashMap<(i32, u32), (Decimal, usize)> = HashMap::new();
    for record in records {
        let entry = buckets.entry(record.month()).or_default();
        entry.0 += record.amount;
        entry.1 += 1;
    }

    let mut totals: Vec<MonthlyTotal> = buckets
        .into_iter()
        .map(|((year, month), (total, count))| MonthlyTotal {
            year,
            month,
            label: month_label(year, month),
            total,
            count,
        })
        .collect();
    totals.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
    totals
}

/// Sum of the month totals the caller is actually showing
pub fn grand_total(months: &[MonthlyTotal]) -> Decimal {
    months.iter().map(|m| m.total).sum()
}

/// Overall position across both record kinds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net: Decimal,
}

/// Totals over the given records, net = income - expense
pub fn summarize(incomes: &[Record], expenses: &[Record]) -> Summary {
    let total_income: Decimal = incomes.iter().map(|r| r.amount).sum();
    let total_expense: Decimal = expenses.iter().map(|r| r.amount).sum();
    Summary {
        total_income,
        total_expense,
        net: total_income - total_expense,
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use uuid::Uuid;

    fn record(year: i32, month: u32, day: u32, amount: i64) -> Record {
        Record {
            id: Uuid::new_v4(),
            source: "Test".to_string(),
            amount: Decimal::new(amount, 0),
            date: NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_time(NaiveTime::MIN),
            owner_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_month_label_format() {
        assert_eq!(month_label(2024, 3), "Mar-2024");
        assert_eq!(month_label(2024, 1), "Jan-2024");
        assert_eq!(month_label(2023, 12), "Dec-2023");
    }

    #[test]
    fn test_monthly_totals_buckets_by_month() {
        let records = vec![
            record(2024, 3, 1, 100),
            record(2024, 3, 20, 50),
            record(2024, 1, 5, 30),
            record(2023, 12, 31, 70),
        ];
        let totals = monthly_totals(&records);

        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].label, "Mar-2024");
        assert_eq!(totals[0].total, Decimal::new(150, 0));
        assert_eq!(totals[0].count, 2);
        assert_eq!(totals[1].label, "Jan-2024");
        assert_eq!(totals[2].label, "Dec-2023");
    }

    #[test]
    fn test_monthly_totals_newest_first() {
        let records = vec![
            record(2023, 6, 1, 10),
            record(2024, 2, 1, 10),
            record(2023, 11, 1, 10),
        ];
        let totals = monthly_totals(&records);
        let keys: Vec<(i32, u32)> = totals.iter().map(|t| (t.year, t.month)).collect();
        assert_eq!(keys, vec![(2024, 2), (2023, 11), (2023, 6)]);
    }

    #[test]
    fn test_grand_total_over_shown_months() {
        let records = vec![record(2024, 3, 1, 100), record(2024, 1, 5, 30)];
        let totals = monthly_totals(&records);
        assert_eq!(grand_total(&totals), Decimal::new(130, 0));
        assert_eq!(grand_total(&totals[..1]), Decimal::new(100, 0));
    }

    #[test]
    fn test_summarize_net() {
        let incomes = vec![record(2024, 3, 1, 500), record(2024, 2, 1, 500)];
        let expenses = vec![record(2024, 3, 2, 300)];
        let summary = summarize(&incomes, &expenses);
        assert_eq!(summary.total_income, Decimal::new(1000, 0));
        assert_eq!(summary.total_expense, Decimal::new(300, 0));
        assert_eq!(summary.net, Decimal::new(700, 0));
    }

    #[test]
    fn test_empty_input() {
        assert!(monthly_totals(&[]).is_empty());
        assert_eq!(summarize(&[], &[]), Summary::default());
    }
}
