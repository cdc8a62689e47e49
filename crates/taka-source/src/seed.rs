//! YAML seed data
//!
//! Demo and test data for the in-memory source. A seed file names one
//! owner and the records that belong to them; ids are minted at load.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taka_core::Record;

use crate::error::SourceResult;

/// One record in a seed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRecord {
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDateTime,
}

impl SeedRecord {
    pub(crate) fn to_record(&self, owner: Uuid) -> Record {
        Record {
            id: Uuid::new_v4(),
            source: self.source.clone(),
            amount: self.amount,
            date: self.date,
            owner_id: owner,
        }
    }
}

/// Parsed seed file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedFile {
    /// Owner of every record in the file
    pub user_id: Uuid,
    #[serde(default)]
    pub expenses: Vec<SeedRecord>,
    #[serde(default)]
    pub incomes: Vec<SeedRecord>,
}

/// Parse seed data from a YAML string
pub fn parse_seed(content: &str) -> SourceResult<SeedFile> {
    Ok(serde_yaml::from_str(content)?)
}

/// Load seed data from a YAML file
pub async fn load_seed(path: PathBuf) -> SourceResult<SeedFile> {
    let content = tokio::fs::read_to_string(&path).await?;
    parse_seed(&content)
}

// ==================== Tests ====================
