//! Next-occurrence computation for recurring transactions.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use super::error::RecurrenceError;
use super::types::{DayOfMonth, Recurrence, ScheduleDescriptor, WeekdaySet};
use super::upcoming::Upcoming;

/// Number of days a weekly schedule searches ahead.
const WEEKLY_SEARCH_DAYS: u64 = 7;

/// Engine computing when schedules fire.
///
/// Every operation is a pure function of its inputs: the same descriptor and
/// reference instant always produce the same result, and nothing is mutated.
/// Callers persist the descriptors returned by [`RecurrenceEngine::advance`].
pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Computes the next firing instant of `descriptor` after `reference`.
    ///
    /// - Daily: the day after `reference`.
    /// - Weekly: the first qualifying weekday among the 7 days after `reference`.
    /// - Monthly: `day_of_month` in `reference`'s month, or in the following month
    ///   if that date is not after `reference`'s date. Short months clamp to
    ///   their last day.
    /// - Yearly: the anchor's month/day in `reference`'s year, or the next year if
    ///   that date is not after `reference`'s date. Feb 29 clamps to Feb 28.
    /// - One-off: the one-off date itself, even if it is in the past.
    ///
    /// The result always carries the descriptor's time of day with zero seconds.
    ///
    /// # Errors
    ///
    /// Returns `RecurrenceError::NoQualifyingWeekday` for a weekly schedule
    /// with no weekdays, and `RecurrenceError::OutOfRange` when the result
    /// would fall outside chrono's calendar.
    pub fn compute_next_occurrence(
        descriptor: &ScheduleDescriptor,
        reference: NaiveDateTime,
    ) -> Result<NaiveDateTime, RecurrenceError> {
        let date = Self::next_date(&descriptor.recurrence, reference.date())?;
        Ok(descriptor.time_of_day.on(date))
    }

    /// Returns true if the schedule is active and its next occurrence is at or
    /// before `now`.
    #[must_use]
    pub fn is_due(descriptor: &ScheduleDescriptor, now: NaiveDateTime) -> bool {
        descriptor.active && descriptor.next_occurrence.is_some_and(|next| next <= now)
    }

    /// Rolls a schedule forward after it fired.
    ///
    /// One-off schedules come back inactive; their next occurrence is kept
    /// only for display. Repeating schedules come back with the next
    /// occurrence after `reference`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`RecurrenceEngine::compute_next_occurrence`].
    pub fn advance(
        descriptor: &ScheduleDescriptor,
        reference: NaiveDateTime,
    ) -> Result<ScheduleDescriptor, RecurrenceError> {
        let next = Self::compute_next_occurrence(descriptor, reference)?;
        Ok(ScheduleDescriptor {
            active: descriptor.active && !descriptor.is_one_off(),
            next_occurrence: Some(next),
            ..*descriptor
        })
    }

    /// Lists up to `limit` occurrences at or after `from`.
    ///
    /// Inactive schedules yield nothing; a one-off yields at most its date.
    #[must_use]
    pub fn upcoming(descriptor: &ScheduleDescriptor, from: NaiveDateTime, limit: usize) -> Upcoming {
        Upcoming::new(*descriptor, from, limit)
    }

    fn next_date(recurrence: &Recurrence, reference: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        match recurrence {
            Recurrence::Daily => reference.succ_opt().ok_or(RecurrenceError::OutOfRange),
            Recurrence::Weekly { weekdays } => Self::next_weekday(*weekdays, reference),
            Recurrence::Monthly { day_of_month } => Self::next_monthly(*day_of_month, reference),
            Recurrence::Yearly { anchor } => Self::next_yearly(*anchor, reference),
            Recurrence::OneOff { date } => Ok(*date),
        }
    }

    fn next_weekday(weekdays: WeekdaySet, reference: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        for offset in 1..=WEEKLY_SEARCH_DAYS {
            let candidate = reference
                .checked_add_days(Days::new(offset))
                .ok_or(RecurrenceError::OutOfRange)?;
            if weekdays.contains(candidate.weekday()) {
                return Ok(candidate);
            }
        }
        Err(RecurrenceError::NoQualifyingWeekday)
    }

    fn next_monthly(day: DayOfMonth, reference: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        let this_month = clamped_date(reference.year(), reference.month(), day.get())
            .ok_or(RecurrenceError::OutOfRange)?;
        if this_month > reference {
            return Ok(this_month);
        }

        let (year, month) = following_month(reference.year(), reference.month())
            .ok_or(RecurrenceError::OutOfRange)?;
        clamped_date(year, month, day.get()).ok_or(RecurrenceError::OutOfRange)
    }

    fn next_yearly(anchor: NaiveDate, reference: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
        let this_year = clamped_date(reference.year(), anchor.month(), anchor.day())
            .ok_or(RecurrenceError::OutOfRange)?;
        if this_year > reference {
            return Ok(this_year);
        }

        let next_year = reference
            .year()
            .checked_add(1)
            .ok_or(RecurrenceError::OutOfRange)?;
        clamped_date(next_year, anchor.month(), anchor.day()).ok_or(RecurrenceError::OutOfRange)
    }
}

fn following_month(year: i32, month: u32) -> Option<(i32, u32)> {
    if month == 12 {
        Some((year.checked_add(1)?, 1))
    } else {
        Some((year, month + 1))
    }
}

/// Builds `year-month-day`, clamping `day` to the month's last day.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = following_month(year, month)?;
    let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()?
        .day();
    NaiveDate::from_ymd_opt(year, month, day.min(last_day))
}
