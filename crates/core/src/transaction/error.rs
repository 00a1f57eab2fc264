//! Scheduled transaction error types.

use finaizen_shared::AppError;
use thiserror::Error;

use crate::recurrence::RecurrenceError;

/// Errors raised by scheduled income/expense entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// Amount must be strictly positive; the kind carries the sign.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Description is required.
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// The schedule has not reached its next occurrence yet.
    #[error("Transaction is not due yet")]
    NotDue,

    /// The schedule is inactive (a one-off that already fired).
    #[error("Transaction schedule is inactive")]
    Inactive,

    /// Schedule could not be evaluated.
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NonPositiveAmount
            | TransactionError::EmptyDescription
            | TransactionError::Recurrence(_) => Self::Validation(err.to_string()),
            TransactionError::NotDue | TransactionError::Inactive => {
                Self::BusinessRule(err.to_string())
            }
        }
    }
}
