//! In-memory store for scheduled transactions and history.

use chrono::NaiveDateTime;
use dashmap::DashMap;

use finaizen_core::recurrence::ScheduleDescriptor;
use finaizen_core::sweep::{HistoryRepository, RepositoryError, ScheduleRepository};
use finaizen_core::transaction::{HistoryEntry, ScheduledTransaction};
use finaizen_shared::types::{HistoryEntryId, ScheduledTransactionId, UserId};

/// Concurrent in-memory store.
///
/// Implements both [`ScheduleRepository`] and [`HistoryRepository`]. Listing
/// methods return results in a stable order (by occurrence, then ID).
#[derive(Debug, Default)]
pub struct InMemoryStore {
    schedules: DashMap<ScheduledTransactionId, ScheduledTransaction>,
    history: DashMap<HistoryEntryId, HistoryEntry>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with the given records.
    #[must_use]
    pub fn from_parts(
        schedules: impl IntoIterator<Item = ScheduledTransaction>,
        history: impl IntoIterator<Item = HistoryEntry>,
    ) -> Self {
        Self {
            schedules: schedules.into_iter().map(|tx| (tx.id, tx)).collect(),
            history: history.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    /// Returns every scheduled transaction, ordered by creation time.
    #[must_use]
    pub fn all_schedules(&self) -> Vec<ScheduledTransaction> {
        let mut all: Vec<_> = self.schedules.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|tx| (tx.created_at, tx.id));
        all
    }

    /// Returns every history record, ordered by occurrence.
    #[must_use]
    pub fn all_history(&self) -> Vec<HistoryEntry> {
        let mut all: Vec<_> = self.history.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|e| (e.occurred_at, e.id));
        all
    }

    /// Number of scheduled transactions.
    #[must_use]
    pub fn schedule_count(&self) -> usize {
        self.schedules.len()
    }

    /// Number of history records.
    #[must_use]
    pub fn history_count(&self) -> usize {
        self.history.len()
    }
}

impl ScheduleRepository for InMemoryStore {
    fn save(&self, transaction: ScheduledTransaction) -> Result<(), RepositoryError> {
        self.schedules.insert(transaction.id, transaction);
        Ok(())
    }

    fn save_if_unchanged(
        &self,
        expected: &ScheduleDescriptor,
        transaction: ScheduledTransaction,
    ) -> Result<bool, RepositoryError> {
        match self.schedules.get_mut(&transaction.id) {
            Some(mut current) if current.schedule == *expected => {
                *current = transaction;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn find_by_id(
        &self,
        id: ScheduledTransactionId,
    ) -> Result<Option<ScheduledTransaction>, RepositoryError> {
        Ok(self.schedules.get(&id).map(|r| r.value().clone()))
    }

    fn load_due(&self, now: NaiveDateTime) -> Result<Vec<ScheduledTransaction>, RepositoryError> {
        let mut due: Vec<_> = self
            .schedules
            .iter()
            .filter(|r| r.value().is_due(now))
            .map(|r| r.value().clone())
            .collect();
        due.sort_by_key(|tx| (tx.schedule.next_occurrence, tx.id));
        Ok(due)
    }

    fn list_by_user(&self, user_id: UserId) -> Result<Vec<ScheduledTransaction>, RepositoryError> {
        let mut owned: Vec<_> = self
            .schedules
            .iter()
            .filter(|r| r.value().user_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        owned.sort_by_key(|tx| (tx.schedule.next_occurrence, tx.id));
        Ok(owned)
    }

    fn delete(&self, id: ScheduledTransactionId) -> Result<bool, RepositoryError> {
        Ok(self.schedules.remove(&id).is_some())
    }
}

impl HistoryRepository for InMemoryStore {
    fn append(&self, entry: HistoryEntry) -> Result<(), RepositoryError> {
        self.history.insert(entry.id, entry);
        Ok(())
    }

    fn entries_for_user(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, RepositoryError> {
        let mut entries: Vec<_> = self
            .history
            .iter()
            .filter(|r| r.value().user_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        entries.sort_by_key(|e| (e.occurred_at, e.id));
        Ok(entries)
    }
}
