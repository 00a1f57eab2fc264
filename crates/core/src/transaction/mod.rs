//! Scheduled income and expense entries.
//!
//! Income and expense share one entity, distinguished by `TransactionKind`,
//! and both delegate their schedule to the recurrence engine.

pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::TransactionError;
pub use types::{
    CreateScheduledTransactionInput, Execution, HistoryEntry, ScheduledTransaction,
    TransactionKind,
};
