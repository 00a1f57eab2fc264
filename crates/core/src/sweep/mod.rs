//! Catch-up sweeps over due scheduled transactions.

pub mod repository;
pub mod service;


pub use repository::{HistoryRepository, RepositoryError, ScheduleRepository};
pub use service::{SweepFailure, SweepReport, SweepService};
