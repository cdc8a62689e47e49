//! Listing surfaces over the record source
//!
//! Each surface owns one listing and exposes async operations that
//! return a snapshot of what it shows afterwards:
//! - feed: phone-sized expense list with a reset on leaving
//! - table: paged expense or income table with a page size selector
//! - monthly: per-month rollup with local month paging
//! - summary: income, expense and net in one view
//!
//! Surfaces never share pagination state and never update rows
//! optimistically; every change the user sees came back from the source.

pub mod error;
pub mod feed;
pub mod monthly;
pub mod summary;
pub mod table;

mod pager;
#[cfg(test)]
mod testutil;

pub use error::{
    DefaultErrorLogger, ErrorContext, ErrorLogger, ViewError, ViewErrorCode, ViewErrorDetails,
    ViewErrorSeverity, ViewResult,
};
pub use feed::{ExpenseFeed, FeedSnapshot};
pub use monthly::{MonthlySnapshot, MonthlyView};
pub use summary::{SummarySnapshot, SummaryView};
pub use table::{RecordTable, TableSnapshot};
