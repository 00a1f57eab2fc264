//! Recurrence error types.

use thiserror::Error;

/// Errors raised while building or evaluating a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    /// A weekly schedule was given no weekdays.
    #[error("Weekly schedule needs at least one weekday")]
    EmptyWeekdaySet,

    /// A weekly schedule found no qualifying day in the following seven days.
    #[error("No qualifying weekday within the next 7 days")]
    NoQualifyingWeekday,

    /// Weekday number outside 0 (Sunday) to 6 (Saturday).
    #[error("Invalid weekday number: {0} (expected 0-6, Sunday first)")]
    InvalidWeekdayNumber(u8),

    /// Day of month outside 1-31.
    #[error("Invalid day of month: {0} (expected 1-31)")]
    InvalidDayOfMonth(u32),

    /// Hour or minute out of range.
    #[error("Invalid time of day {hour}:{minute:02}")]
    InvalidTimeOfDay {
        /// Requested hour.
        hour: u32,
        /// Requested minute.
        minute: u32,
    },

    /// Time of day not in `HH:MM` form.
    #[error("Malformed time of day {0:?}, expected HH:MM")]
    MalformedTimeOfDay(String),

    /// The next occurrence falls outside the representable calendar.
    #[error("Next occurrence is outside the supported date range")]
    OutOfRange,
}
