//! Property-based tests for the recurrence engine.
//!
//! Covers per-frequency placement of the next occurrence, due-ness over
//! time, and the one-off/repeating advance rules.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use proptest::prelude::*;

use super::engine::RecurrenceEngine;
use super::types::{DayOfMonth, Recurrence, ScheduleDescriptor, TimeOfDay, WeekdaySet};

/// Strategy for calendar dates between 2000 and 2099.
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..36_500).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(offset)))
            .unwrap()
    })
}

/// Strategy for wall-clock instants with second precision.
fn instant_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (date_strategy(), 0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(date, h, m, s)| date.and_hms_opt(h, m, s).unwrap())
}

fn time_of_day_strategy() -> impl Strategy<Value = TimeOfDay> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| TimeOfDay::new(h, m).unwrap())
}

/// Strategy for non-empty weekday sets.
fn weekday_set_strategy() -> impl Strategy<Value = WeekdaySet> {
    (1u8..128).prop_map(|mask| {
        let numbers: Vec<u8> = (0u8..7).filter(|n| mask & (1 << n) != 0).collect();
        WeekdaySet::from_numbers(&numbers).unwrap()
    })
}

/// Strategy for every repeating (non one-off) recurrence.
fn repeating_strategy() -> impl Strategy<Value = Recurrence> {
    prop_oneof![
        Just(Recurrence::Daily),
        weekday_set_strategy().prop_map(|weekdays| Recurrence::Weekly { weekdays }),
        (1u32..=31).prop_map(|d| Recurrence::Monthly {
            day_of_month: DayOfMonth::new(d).unwrap()
        }),
        date_strategy().prop_map(|anchor| Recurrence::Yearly { anchor }),
    ]
}

fn any_recurrence_strategy() -> impl Strategy<Value = Recurrence> {
    prop_oneof![
        4 => repeating_strategy(),
        1 => date_strategy().prop_map(|date| Recurrence::OneOff { date }),
    ]
}

fn descriptor(recurrence: Recurrence, time_of_day: TimeOfDay) -> ScheduleDescriptor {
    ScheduleDescriptor {
        recurrence,
        time_of_day,
        active: true,
        next_occurrence: None,
    }
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    (28..=31)
        .rev()
        .find(|&d| NaiveDate::from_ymd_opt(date.year(), date.month(), d).is_some())
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Daily: the next occurrence is the following calendar day at the time of day.
    #[test]
    fn prop_daily_is_next_calendar_day(
        t in instant_strategy(),
        time in time_of_day_strategy(),
    ) {
        let d = descriptor(Recurrence::Daily, time);
        let next = RecurrenceEngine::compute_next_occurrence(&d, t).unwrap();

        prop_assert_eq!(next.date(), t.date().succ_opt().unwrap());
        prop_assert_eq!((next.hour(), next.minute(), next.second()), (time.hour(), time.minute(), 0));
    }

    /// Weekly: a qualifying weekday, strictly after t, at most 7 days later.
    #[test]
    fn prop_weekly_lands_on_qualifying_day_within_a_week(
        t in instant_strategy(),
        time in time_of_day_strategy(),
        weekdays in weekday_set_strategy(),
    ) {
        let d = descriptor(Recurrence::Weekly { weekdays }, time);
        let next = RecurrenceEngine::compute_next_occurrence(&d, t).unwrap();

        prop_assert!(weekdays.contains(next.weekday()));
        prop_assert!(next > t);
        prop_assert!(next.date() <= t.date().checked_add_days(Days::new(7)).unwrap());
    }

    /// Monthly: day equals day_of_month clamped to the month's length, strictly after t.
    #[test]
    fn prop_monthly_day_is_clamped_and_after_reference(
        t in instant_strategy(),
        time in time_of_day_strategy(),
        day in 1u32..=31,
    ) {
        let d = descriptor(Recurrence::monthly(day).unwrap(), time);
        let next = RecurrenceEngine::compute_next_occurrence(&d, t).unwrap();

        prop_assert_eq!(next.day(), day.min(last_day_of_month(next.date())));
        prop_assert!(next > t);
        // Never skips a whole month.
        let months_ahead = (next.year() - t.year()) * 12 + next.month() as i32 - t.month() as i32;
        prop_assert!((0..=1).contains(&months_ahead));
    }

    /// Yearly: month/day match the anchor (Feb 29 clamps), strictly after t, within a year.
    #[test]
    fn prop_yearly_matches_anchor_and_after_reference(
        t in instant_strategy(),
        time in time_of_day_strategy(),
        anchor in date_strategy(),
    ) {
        let d = descriptor(Recurrence::Yearly { anchor }, time);
        let next = RecurrenceEngine::compute_next_occurrence(&d, t).unwrap();

        prop_assert_eq!(next.month(), anchor.month());
        prop_assert_eq!(next.day(), anchor.day().min(last_day_of_month(next.date())));
        prop_assert!(next > t);
        prop_assert!(next.year() == t.year() || next.year() == t.year() + 1);
    }

    /// Every result carries the descriptor's time of day with zero seconds.
    #[test]
    fn prop_result_carries_time_of_day(
        t in instant_strategy(),
        time in time_of_day_strategy(),
        recurrence in any_recurrence_strategy(),
    ) {
        let d = descriptor(recurrence, time);
        let next = RecurrenceEngine::compute_next_occurrence(&d, t).unwrap();

        prop_assert_eq!(next.hour(), time.hour());
        prop_assert_eq!(next.minute(), time.minute());
        prop_assert_eq!(next.second(), 0);
        prop_assert_eq!(next.nanosecond(), 0);
    }

    /// Same inputs, same output.
    #[test]
    fn prop_compute_is_deterministic(
        t in instant_strategy(),
        time in time_of_day_strategy(),
        recurrence in any_recurrence_strategy(),
    ) {
        let d = descriptor(recurrence, time);
        prop_assert_eq!(
            RecurrenceEngine::compute_next_occurrence(&d, t),
            RecurrenceEngine::compute_next_occurrence(&d, t)
        );
    }

    /// Once due, a schedule stays due as time passes.
    #[test]
    fn prop_is_due_is_monotonic(
        created in instant_strategy(),
        time in time_of_day_strategy(),
        recurrence in any_recurrence_strategy(),
        now in instant_strategy(),
        later_secs in 0u64..400_000_000,
    ) {
        let d = ScheduleDescriptor::new(recurrence, time, created).unwrap();
        let later = now + chrono::Duration::seconds(i64::try_from(later_secs).unwrap());

        if RecurrenceEngine::is_due(&d, now) {
            prop_assert!(RecurrenceEngine::is_due(&d, later));
        }
    }

    /// After advancing, a one-off is inactive and never due again.
    #[test]
    fn prop_advanced_one_off_never_due(
        created in instant_strategy(),
        time in time_of_day_strategy(),
        date in date_strategy(),
        fired in instant_strategy(),
        probe in instant_strategy(),
    ) {
        let d = ScheduleDescriptor::new(Recurrence::OneOff { date }, time, created).unwrap();
        let advanced = RecurrenceEngine::advance(&d, fired).unwrap();

        prop_assert!(!advanced.active);
        prop_assert!(!RecurrenceEngine::is_due(&advanced, probe));
    }

    /// Advancing a due repeating schedule strictly increases its next occurrence.
    #[test]
    fn prop_advance_repeating_moves_forward(
        created in instant_strategy(),
        time in time_of_day_strategy(),
        recurrence in repeating_strategy(),
        lateness_secs in 0i64..100_000_000,
    ) {
        let d = ScheduleDescriptor::new(recurrence, time, created).unwrap();
        let previous = d.next_occurrence.unwrap();
        // Fire at or after the scheduled instant, as a sweep would.
        let fired = previous + chrono::Duration::seconds(lateness_secs);

        let advanced = RecurrenceEngine::advance(&d, fired).unwrap();

        prop_assert!(advanced.active);
        prop_assert!(advanced.next_occurrence.unwrap() > previous);
        prop_assert!(!RecurrenceEngine::is_due(&advanced, fired));
    }
}
