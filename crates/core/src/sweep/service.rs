//! Catch-up sweep over due scheduled transactions.

use std::sync::Arc;

use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use finaizen_shared::types::ScheduledTransactionId;

use super::repository::{HistoryRepository, RepositoryError, ScheduleRepository};
use crate::transaction::{Execution, ScheduledTransaction, TransactionError};

/// Summary of one sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Instant the sweep ran at.
    pub swept_at: NaiveDateTime,
    /// Transactions that fired and produced a history record.
    pub executed: usize,
    /// Of those, one-offs that became inactive.
    pub deactivated: usize,
    /// Transactions deleted or edited while the sweep ran; left untouched.
    pub skipped: usize,
    /// Transactions that could not be executed or written back.
    pub failed: Vec<SweepFailure>,
}

impl SweepReport {
    fn new(swept_at: NaiveDateTime) -> Self {
        Self {
            swept_at,
            executed: 0,
            deactivated: 0,
            skipped: 0,
            failed: Vec::new(),
        }
    }
}

/// A transaction the sweep could not execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFailure {
    /// The transaction that failed.
    pub transaction_id: ScheduledTransactionId,
    /// Why it failed.
    pub reason: String,
}

/// Materializes every due transaction and advances its schedule.
///
/// Executions are computed in parallel. Write-back is serial: the advanced
/// schedule replaces the stored one only if nobody changed it since it was
/// loaded, then the history record is appended.
pub struct SweepService<S: ScheduleRepository, H: HistoryRepository> {
    schedules: Arc<S>,
    history: Arc<H>,
}

impl<S: ScheduleRepository, H: HistoryRepository> SweepService<S, H> {
    /// Create a new sweep service.
    #[must_use]
    pub fn new(schedules: Arc<S>, history: Arc<H>) -> Self {
        Self { schedules, history }
    }

    /// Runs one sweep at `now`.
    ///
    /// Each due transaction fires at most once per sweep. A schedule that
    /// missed several occurrences produces a single record and is advanced
    /// relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` only if loading due transactions fails.
    /// Failed executions and failed writes are reported in the `SweepReport`.
    pub fn run(&self, now: NaiveDateTime) -> Result<SweepReport, RepositoryError> {
        let due = self.schedules.load_due(now)?;
        debug!(count = due.len(), %now, "Loaded due transactions");

        let outcomes: Vec<Result<Execution, TransactionError>> =
            due.par_iter().map(|tx| tx.execute(now)).collect();

        let mut report = SweepReport::new(now);

        for (original, outcome) in due.iter().zip(outcomes) {
            let execution = match outcome {
                Ok(execution) => execution,
                Err(err) => {
                    warn!(transaction_id = %original.id, error = %err, "Scheduled transaction not executed");
                    report.failed.push(SweepFailure {
                        transaction_id: original.id,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            debug!(
                transaction_id = %original.id,
                kind = %execution.entry.kind,
                amount = %execution.entry.amount,
                occurred_at = %execution.entry.occurred_at,
                next = ?execution.transaction.schedule.next_occurrence,
                "Executed scheduled transaction"
            );
            let deactivated = !execution.transaction.schedule.active;

            match self.commit(original, execution) {
                Ok(true) => {
                    report.executed += 1;
                    if deactivated {
                        report.deactivated += 1;
                    }
                }
                Ok(false) => {
                    debug!(transaction_id = %original.id, "Transaction changed during sweep, skipped");
                    report.skipped += 1;
                }
                Err(err) => {
                    warn!(transaction_id = %original.id, error = %err, "Write-back failed");
                    report.failed.push(SweepFailure {
                        transaction_id: original.id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            executed = report.executed,
            deactivated = report.deactivated,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Sweep finished"
        );

        Ok(report)
    }

    /// Writes one execution back. Returns false if the stored transaction
    /// no longer matches `original`.
    fn commit(
        &self,
        original: &ScheduledTransaction,
        execution: Execution,
    ) -> Result<bool, RepositoryError> {
        let Execution { entry, transaction } = execution;
        let advanced = transaction.schedule;

        if !self
            .schedules
            .save_if_unchanged(&original.schedule, transaction)?
        {
            return Ok(false);
        }

        if let Err(err) = self.history.append(entry) {
            // Restore the due schedule so the occurrence fires on the next sweep.
            self.schedules
                .save_if_unchanged(&advanced, original.clone())?;
            return Err(err);
        }
        Ok(true)
    }
}
