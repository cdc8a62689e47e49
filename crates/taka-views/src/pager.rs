//! Shared page fetch and mutation plumbing
//!
//! Every surface drives its controller the same way: build the next
//! controller state, fetch the page it describes, and commit both only
//! when the fetch succeeds. A failed fetch drops the candidate state, so
//! navigation never advances onto a page that was never delivered.
//! Mutations are owner-stamped here and re-fetch the current page only
//! after the write is confirmed; the list is never updated optimistically.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use taka_core::{ListingController, NewRecord, PageInfo, Record, RecordKind, RecordPatch};
use taka_source::{SourceError, SourceRef};

use crate::error::{report, ViewError, ViewResult};

pub(crate) struct Pager {
    kind: RecordKind,
    source: SourceRef,
    pub(crate) controller: ListingController,
    pub(crate) user: Option<Uuid>,
    pub(crate) rows: Vec<Record>,
    pub(crate) page_info: PageInfo,
    pub(crate) total_count: Option<u64>,
}

impl Pager {
    pub(crate) fn new(kind: RecordKind, source: SourceRef, page_size: usize) -> Self {
        Self {
            kind,
            source,
            controller: ListingController::new(page_size),
            user: None,
            rows: Vec::new(),
            page_info: PageInfo::default(),
            total_count: None,
        }
    }

    pub(crate) fn kind(&self) -> RecordKind {
        self.kind
    }

    /// No signed-in user yet; surfaces render a neutral state
    pub(crate) fn pending_auth(&self) -> bool {
        self.user.is_none()
    }

    /// Change the signed-in user. Cached rows belong to the previous
    /// identity, so they are dropped either way.
    pub(crate) fn set_user(&mut self, user: Option<Uuid>) {
        self.user = user;
        self.rows.clear();
        self.page_info = PageInfo::default();
        self.total_count = None;
    }

    // ==================== Fetching ====================

    /// Fetch the page `next` describes and commit it together with the
    /// fetched rows. Without a user the transition is kept but no fetch
    /// is issued. On fetch failure the current state stays in place.
    pub(crate) async fn apply(&mut self, op: &str, next: ListingController) -> ViewResult<()> {
        let Some(user) = self.user else {
            self.controller = next;
            self.rows.clear();
            self.page_info = PageInfo::default();
            self.total_count = None;
            return Ok(());
        };

        let query = next.page_query(user);
        match self.source.fetch(self.kind, query).await {
            Ok(conn) => {
                self.controller = next;
                self.page_info = conn.page_info.clone();
                self.total_count = conn.total_count;
                self.rows = conn.into_nodes();
                Ok(())
            }
            Err(err) => Err(self.report(op, ViewError::fetch(&err))),
        }
    }

    /// Re-fetch the page for the current state
    pub(crate) async fn reload(&mut self, op: &str) -> ViewResult<()> {
        let next = self.controller.clone();
        self.apply(op, next).await
    }

    // ==================== Mutations ====================

    /// Insert a record owned by the signed-in user, then re-fetch
    pub(crate) async fn insert(
        &mut self,
        op: &str,
        source_name: String,
        amount: Decimal,
        date: NaiveDateTime,
    ) -> ViewResult<()> {
        let user = self.signed_in_user(op)?;
        let record = NewRecord {
            source: source_name,
            amount,
            date,
            owner_id: user,
        };
        match self.source.insert(self.kind, record).await {
            Ok(_) => self.reload(op).await,
            Err(err) => Err(self.report(op, ViewError::mutation(&err))),
        }
    }

    /// Patch an owned record, then re-fetch
    pub(crate) async fn update(&mut self, op: &str, id: Uuid, patch: RecordPatch) -> ViewResult<()> {
        let user = self.signed_in_user(op)?;
        match self.source.update(self.kind, user, id, patch).await {
            Ok(_) => self.reload(op).await,
            Err(err) => Err(self.report(op, ViewError::mutation(&err))),
        }
    }

    /// Delete an owned record, then re-fetch
    pub(crate) async fn remove(&mut self, op: &str, id: Uuid) -> ViewResult<()> {
        let user = self.signed_in_user(op)?;
        match self.source.delete(self.kind, user, id).await {
            Ok(_) => self.reload(op).await,
            Err(err) => Err(self.report(op, ViewError::mutation(&err))),
        }
    }

    fn signed_in_user(&self, op: &str) -> ViewResult<Uuid> {
        self.user.ok_or_else(|| {
            self.report(
                op,
                ViewError::mutation(&SourceError::UnscopedQuery),
            )
        })
    }

    fn report(&self, op: &str, error: ViewError) -> ViewError {
        report(op, self.user, error)
    }
}
