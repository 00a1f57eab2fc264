//! Recurring-transaction scheduling.
//!
//! This module implements the schedule logic shared by income and expense
//! entries:
//! - Schedule descriptor types (frequency, weekdays, day of month, time of day)
//! - Next-occurrence computation and due-ness checks
//! - Advancing a schedule after it fired
//! - Previewing upcoming occurrences

pub mod engine;
pub mod error;
pub mod types;
pub mod upcoming;

#[cfg(test)]
mod engine_props;

pub use engine::RecurrenceEngine;
pub use error::RecurrenceError;
pub use types::{DayOfMonth, Frequency, Recurrence, ScheduleDescriptor, TimeOfDay, WeekdaySet};
pub use upcoming::Upcoming;
