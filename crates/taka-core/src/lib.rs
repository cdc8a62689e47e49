//! Core record model and listing logic
//!
//! Pagination, filtering, and aggregation for expense/income listings.
//! Everything here is side-effect free; fetching and mutation live in
//! the record source crates built on top of these types.

pub mod filter;
pub mod listing;
pub mod paging;
pub mod query;
pub mod records;
pub mod rollup;

pub use filter::{day_bounds, ListFilter};
pub use listing::{page_total, visible_items, ListingController, DEFAULT_PAGE_SIZE};
pub use paging::{Connection, Cursor, CursorStack, Edge, PageInfo};
pub use query::{DateBounds, OrderBy, OrderField, RecordFilter, RecordQuery, SortDirection};

// Re-export commonly used types
pub use records::{NewRecord, Record, RecordKind, RecordPatch};
pub use rollup::{grand_total, month_label, monthly_totals, summarize, MonthlyTotal, Summary};
