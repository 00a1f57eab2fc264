//! Scheduled income/expense entries and the history records they produce.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use finaizen_shared::types::{HistoryEntryId, Money, ScheduledTransactionId, UserId};

use super::error::TransactionError;
use crate::recurrence::{Recurrence, RecurrenceEngine, ScheduleDescriptor, TimeOfDay, Upcoming};

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (ingreso).
    Income,
    /// Money going out (egreso).
    Expense,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// Input for creating a scheduled transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduledTransactionInput {
    /// Owner.
    pub user_id: UserId,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Positive amount.
    pub amount: Money,
    /// Free-form description.
    pub description: String,
    /// Category label (e.g. "Salary", "Rent").
    pub category: String,
    /// When the entry fires.
    pub recurrence: Recurrence,
    /// Time of day every occurrence carries.
    pub time_of_day: TimeOfDay,
}

/// A recurring or one-off income/expense entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTransaction {
    /// Unique identifier.
    pub id: ScheduledTransactionId,
    /// Owner.
    pub user_id: UserId,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Positive amount.
    pub amount: Money,
    /// Free-form description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Schedule state.
    pub schedule: ScheduleDescriptor,
    /// Creation instant.
    pub created_at: NaiveDateTime,
}

/// A ledger record materialized when a scheduled transaction fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier.
    pub id: HistoryEntryId,
    /// The scheduled transaction that produced this record.
    pub scheduled_transaction_id: ScheduledTransactionId,
    /// Owner.
    pub user_id: UserId,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Positive amount.
    pub amount: Money,
    /// Description copied from the schedule.
    pub description: String,
    /// Category copied from the schedule.
    pub category: String,
    /// The scheduled occurrence this record fulfils.
    pub occurred_at: NaiveDateTime,
    /// When the record was materialized.
    pub recorded_at: NaiveDateTime,
}

impl HistoryEntry {
    /// Amount with sign: positive for income, negative for expense.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        signed(self.kind, self.amount)
    }
}

/// Outcome of executing a due transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// The materialized history record.
    pub entry: HistoryEntry,
    /// The transaction with its schedule advanced, to be persisted by the caller.
    pub transaction: ScheduledTransaction,
}

fn signed(kind: TransactionKind, amount: Money) -> Money {
    match kind {
        TransactionKind::Income => amount,
        TransactionKind::Expense => amount.negated(),
    }
}

impl ScheduledTransaction {
    /// Validates the input and creates an active transaction whose next
    /// occurrence is computed relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NonPositiveAmount` or
    /// `TransactionError::EmptyDescription` for invalid input, and
    /// `TransactionError::Recurrence` if the schedule cannot be evaluated.
    pub fn new(
        input: CreateScheduledTransactionInput,
        now: NaiveDateTime,
    ) -> Result<Self, TransactionError> {
        if !input.amount.is_positive() {
            return Err(TransactionError::NonPositiveAmount);
        }
        if input.description.trim().is_empty() {
            return Err(TransactionError::EmptyDescription);
        }

        let schedule = ScheduleDescriptor::new(input.recurrence, input.time_of_day, now)?;

        Ok(Self {
            id: ScheduledTransactionId::new(),
            user_id: input.user_id,
            kind: input.kind,
            amount: input.amount,
            description: input.description.trim().to_string(),
            category: input.category,
            schedule,
            created_at: now,
        })
    }

    /// Returns true if the transaction should be materialized at `now`.
    #[must_use]
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        RecurrenceEngine::is_due(&self.schedule, now)
    }

    /// Amount with sign: positive for income, negative for expense.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        signed(self.kind, self.amount)
    }

    /// Materializes the due occurrence and advances the schedule.
    ///
    /// `self` is left untouched; the caller persists both halves of the
    /// returned [`Execution`].
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Inactive` for a spent one-off,
    /// `TransactionError::NotDue` before the next occurrence, and
    /// `TransactionError::Recurrence` if the schedule cannot be advanced.
    pub fn execute(&self, now: NaiveDateTime) -> Result<Execution, TransactionError> {
        if !self.schedule.active {
            return Err(TransactionError::Inactive);
        }
        let occurred_at = match self.schedule.next_occurrence {
            Some(next) if next <= now => next,
            _ => return Err(TransactionError::NotDue),
        };

        let schedule = RecurrenceEngine::advance(&self.schedule, now)?;

        let entry = HistoryEntry {
            id: HistoryEntryId::new(),
            scheduled_transaction_id: self.id,
            user_id: self.user_id,
            kind: self.kind,
            amount: self.amount,
            description: self.description.clone(),
            category: self.category.clone(),
            occurred_at,
            recorded_at: now,
        };

        Ok(Execution {
            entry,
            transaction: Self {
                schedule,
                ..self.clone()
            },
        })
    }

    /// Replaces the schedule after the user edited it, reactivating it and
    /// recomputing the next occurrence from `now`.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Recurrence` if the new schedule cannot be evaluated.
    pub fn reschedule(
        &self,
        recurrence: Recurrence,
        time_of_day: TimeOfDay,
        now: NaiveDateTime,
    ) -> Result<Self, TransactionError> {
        Ok(Self {
            schedule: ScheduleDescriptor::new(recurrence, time_of_day, now)?,
            ..self.clone()
        })
    }

    /// Previews up to `limit` occurrences at or after `from`.
    #[must_use]
    pub fn upcoming(&self, from: NaiveDateTime, limit: usize) -> Upcoming {
        RecurrenceEngine::upcoming(&self.schedule, from, limit)
    }
}
