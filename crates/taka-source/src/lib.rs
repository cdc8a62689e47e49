//! Record source abstraction
//!
//! The paginated query/mutation service expense and income listings are
//! built on, plus an in-memory implementation seeded from YAML.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use taka_core::{Connection, NewRecord, Record, RecordKind, RecordPatch, RecordQuery};

pub mod error;
pub mod memory;
pub mod seed;

pub use error::{SourceError, SourceResult};
pub use memory::MemorySource;
pub use seed::{load_seed, parse_seed, SeedFile, SeedRecord};

/// Source reference type
pub type SourceRef = Arc<dyn RecordSource>;

/// Paginated query and mutation service for expense/income records.
///
/// Every fetch must carry an owner scope, and every mutation is scoped
/// to the owner passed alongside it; a record belonging to someone else
/// is indistinguishable from a missing one.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Run a paginated query and return one page as a connection
    async fn fetch(&self, kind: RecordKind, query: RecordQuery) -> SourceResult<Connection<Record>>;

    /// Insert a new record and return it with its assigned id
    async fn insert(&self, kind: RecordKind, record: NewRecord) -> SourceResult<Record>;

    /// Apply a patch to an owned record and return the updated record
    async fn update(
        &self,
        kind: RecordKind,
        owner: Uuid,
        id: Uuid,
        patch: RecordPatch,
    ) -> SourceResult<Record>;

    /// Delete an owned record and return it
    async fn delete(&self, kind: RecordKind, owner: Uuid, id: Uuid) -> SourceResult<Record>;
}
