use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::{LedgerRecord, RecordPatch};
use crate::error::{CoreError, Result, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Where ledger rows live.
///
/// The counting timeline never touches this; only the ledger screens and
/// CLI commands do.
pub trait RecordStore {
    fn create_user(&self, username: &str, at: DateTime<Utc>) -> Result<()>;

    /// Most recently active first.
    fn list_users(&self) -> Result<Vec<UserRecord>>;

    fn touch_user(&self, username: &str, at: DateTime<Utc>) -> Result<()>;

    fn add_record(&self, record: &LedgerRecord) -> Result<()>;

    /// Ordered by date, oldest first.
    fn records_for_user(&self, username: &str) -> Result<Vec<LedgerRecord>>;

    fn get_record(&self, id: Uuid) -> Result<Option<LedgerRecord>>;

    /// Overwrite the stored row with the same id.
    fn replace_record(&self, record: &LedgerRecord) -> Result<()>;

    /// Returns whether a row was deleted.
    fn delete_record(&self, id: Uuid) -> Result<bool>;

    /// Patch a stored row, recompute its profit and save it.
    fn update_record(&self, id: Uuid, patch: &RecordPatch, commission: f64) -> Result<LedgerRecord> {
        let mut record = self.get_record(id)?.ok_or_else(|| {
            CoreError::Validation(ValidationError::InvalidValue {
                field: "id".into(),
                message: format!("no record with id {id}"),
            })
        })?;
        record.apply(patch, commission)?;
        self.replace_record(&record)?;
        Ok(record)
    }
}
