//! Cursor pagination types
//!
//! Connection-style (edges/cursor/pageInfo) pagination as the record
//! source speaks it, plus the client-held cursor stack that makes
//! backward navigation possible without server-side "previous" queries.

use serde::{Deserialize, Serialize};

/// Opaque, server-issued pagination token.
///
/// The client never constructs or parses one; only the record source
/// mints and decodes them, and a cursor is only valid within the query
/// it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a server-issued token
    pub fn new(token: impl Into<String>) -> Self {
        Cursor(token.into())
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Adjacency metadata for the current page of the current query.
///
/// Describes neighboring pages of the query that produced it, not the
/// whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<Cursor>,
    pub end_cursor: Option<Cursor>,
}

/// A single item in a paginated result, with the cursor that addresses it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub cursor: Cursor,
    pub node: T,
}

/// One page of a paginated query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    /// Total matching items for the query, when the source computes it
    pub total_count: Option<u64>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
            total_count: None,
        }
    }
}

impl<T> Connection<T> {
    /// Strip the edges down to their nodes
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }
}

/// Client-held history of cursors.
///
/// Element 0 is always `None` ("start of sequence"); element *i* is the
/// cursor required to fetch page *i + 1*. The stack length equals the
/// current 1-based page number. Going back pops the stack and re-issues
/// the exact forward query that produced that page originally, which is
/// why the stack must retain every prior cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorStack {
    entries: Vec<Option<Cursor>>,
}

impl Default for CursorStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorStack {
    /// A stack positioned at page 1
    pub fn new() -> Self {
        Self {
            entries: vec![None],
        }
    }

    /// Current 1-based page number
    pub fn page_number(&self) -> usize {
        self.entries.len()
    }

    /// The cursor the current page was (or will be) fetched after.
    /// `None` on page 1.
    pub fn current(&self) -> Option<&Cursor> {
        self.entries.last().and_then(|c| c.as_ref())
    }

    /// Advance one page: the given cursor becomes the new anchor
    pub fn push(&mut self, cursor: Cursor) {
        self.entries.push(Some(cursor));
    }

    /// Step back one page. Returns false (and does nothing) on page 1;
    /// the stack never shrinks below length 1.
    pub fn pop(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            true
        } else {
            false
        }
    }

    /// Back to page 1, forgetting all history
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(None);
    }

    /// The raw cursor history, oldest first
    pub fn entries(&self) -> &[Option<Cursor>] {
        &self.entries
    }
}

// ==================== Tests ====================
