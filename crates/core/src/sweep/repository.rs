//! Persistence seams for scheduled transactions and their history.
//!
//! These traits are implemented by the db crate; the core never touches storage
//! directly.

use chrono::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

use finaizen_shared::AppError;
use finaizen_shared::types::{ScheduledTransactionId, UserId};

use crate::recurrence::ScheduleDescriptor;
use crate::transaction::{HistoryEntry, ScheduledTransaction};

/// Repository operation errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Record not found.
    #[error("record not found: {0}")]
    NotFound(Uuid),

    /// Underlying storage failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => Self::NotFound(err.to_string()),
            RepositoryError::Storage(msg) => Self::Storage(msg),
        }
    }
}

/// Repository trait for scheduled transactions.
pub trait ScheduleRepository: Send + Sync {
    /// Insert or replace a scheduled transaction.
    fn save(&self, transaction: ScheduledTransaction) -> Result<(), RepositoryError>;

    /// Replace a stored transaction only if its schedule still equals `expected`.
    ///
    /// Returns false and writes nothing if the record was deleted or its
    /// schedule changed since it was read.
    fn save_if_unchanged(
        &self,
        expected: &ScheduleDescriptor,
        transaction: ScheduledTransaction,
    ) -> Result<bool, RepositoryError>;

    /// Find a scheduled transaction by ID.
    fn find_by_id(
        &self,
        id: ScheduledTransactionId,
    ) -> Result<Option<ScheduledTransaction>, RepositoryError>;

    /// Load every transaction that is due at `now`.
    fn load_due(&self, now: NaiveDateTime) -> Result<Vec<ScheduledTransaction>, RepositoryError>;

    /// List a user's scheduled transactions.
    fn list_by_user(&self, user_id: UserId) -> Result<Vec<ScheduledTransaction>, RepositoryError>;

    /// Delete a scheduled transaction. Returns false if it did not exist.
    fn delete(&self, id: ScheduledTransactionId) -> Result<bool, RepositoryError>;
}

/// Repository trait for materialized history records.
pub trait HistoryRepository: Send + Sync {
    /// Append a history record.
    fn append(&self, entry: HistoryEntry) -> Result<(), RepositoryError>;

    /// List a user's history records, oldest occurrence first.
    fn entries_for_user(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, RepositoryError>;
}
