//! Schedule descriptor types.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::engine::RecurrenceEngine;
use super::error::RecurrenceError;

/// Bare frequency tag of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// On selected weekdays.
    Weekly,
    /// On a fixed day of every month.
    Monthly,
    /// On a fixed month/day of every year.
    Yearly,
    /// Exactly once.
    OneOff,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
            Self::OneOff => write!(f, "one_off"),
        }
    }
}

/// Set of weekdays, numbered 0 = Sunday through 6 = Saturday.
///
/// Serialized as a sorted list of those numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Creates a set with no days in it.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a set from weekday numbers (0 = Sunday .. 6 = Saturday).
    ///
    /// # Errors
    ///
    /// Returns `RecurrenceError::InvalidWeekdayNumber` for numbers above 6.
    pub fn from_numbers(numbers: &[u8]) -> Result<Self, RecurrenceError> {
        numbers.iter().try_fold(Self::empty(), |set, &n| {
            if n > 6 {
                return Err(RecurrenceError::InvalidWeekdayNumber(n));
            }
            Ok(Self(set.0 | (1 << n)))
        })
    }

    /// Returns a copy of the set with `day` added.
    #[must_use]
    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | Self::bit(day))
    }

    /// Returns true if `day` is in the set.
    #[must_use]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// Returns true if no day is in the set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of days in the set.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates the days in the set, Sunday first.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        (0u8..7)
            .filter(move |n| self.0 & (1 << n) != 0)
            .map(weekday_from_sunday)
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_sunday()
    }
}

fn weekday_from_sunday(n: u8) -> Weekday {
    match n {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = RecurrenceError;

    fn try_from(numbers: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_numbers(&numbers)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        (0u8..7).filter(|n| set.0 & (1 << n) != 0).collect()
    }
}

/// Day of the month a monthly schedule fires on (1-31).
///
/// Months shorter than the configured day fire on their last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DayOfMonth(u32);

impl DayOfMonth {
    /// Creates a validated day of month.
    ///
    /// # Errors
    ///
    /// Returns `RecurrenceError::InvalidDayOfMonth` outside 1-31.
    pub fn new(day: u32) -> Result<Self, RecurrenceError> {
        if (1..=31).contains(&day) {
            Ok(Self(day))
        } else {
            Err(RecurrenceError::InvalidDayOfMonth(day))
        }
    }

    /// Returns the raw day number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for DayOfMonth {
    type Error = RecurrenceError;

    fn try_from(day: u32) -> Result<Self, Self::Error> {
        Self::new(day)
    }
}

impl From<DayOfMonth> for u32 {
    fn from(day: DayOfMonth) -> Self {
        day.0
    }
}

/// Wall-clock time a schedule fires at, with minute precision.
///
/// Serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Creates a time of day from hour (0-23) and minute (0-59).
    ///
    /// # Errors
    ///
    /// Returns `RecurrenceError::InvalidTimeOfDay` if either part is out of range.
    pub fn new(hour: u32, minute: u32) -> Result<Self, RecurrenceError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or(RecurrenceError::InvalidTimeOfDay { hour, minute })
    }

    /// Hour component.
    #[must_use]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    /// Minute component.
    #[must_use]
    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    /// Places this time on `date`, with zero seconds.
    #[must_use]
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RecurrenceError::MalformedTimeOfDay(s.to_string());
        let (hour, minute) = s.split_once(':').ok_or_else(malformed)?;
        let hour = hour.parse().map_err(|_| malformed())?;
        let minute = minute.parse().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = RecurrenceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// Frequency together with the anchor fields that frequency needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "snake_case")]
pub enum Recurrence {
    /// Fires every day.
    Daily,
    /// Fires on each qualifying weekday.
    Weekly {
        /// Qualifying weekdays; must not be empty.
        weekdays: WeekdaySet,
    },
    /// Fires once a month.
    Monthly {
        /// Day of the month, clamped to the month's last day.
        day_of_month: DayOfMonth,
    },
    /// Fires once a year on the anchor's month and day; the anchor's year is ignored.
    Yearly {
        /// Month/day anchor.
        anchor: NaiveDate,
    },
    /// Fires exactly once on `date`.
    OneOff {
        /// The single firing date.
        date: NaiveDate,
    },
}

impl Recurrence {
    /// Weekly recurrence on the given days.
    ///
    /// # Errors
    ///
    /// Returns `RecurrenceError::EmptyWeekdaySet` if `weekdays` is empty.
    pub fn weekly(weekdays: WeekdaySet) -> Result<Self, RecurrenceError> {
        if weekdays.is_empty() {
            return Err(RecurrenceError::EmptyWeekdaySet);
        }
        Ok(Self::Weekly { weekdays })
    }

    /// Monthly recurrence on the given day.
    ///
    /// # Errors
    ///
    /// Returns `RecurrenceError::InvalidDayOfMonth` outside 1-31.
    pub fn monthly(day_of_month: u32) -> Result<Self, RecurrenceError> {
        Ok(Self::Monthly {
            day_of_month: DayOfMonth::new(day_of_month)?,
        })
    }

    /// Returns the bare frequency tag.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        match self {
            Self::Daily => Frequency::Daily,
            Self::Weekly { .. } => Frequency::Weekly,
            Self::Monthly { .. } => Frequency::Monthly,
            Self::Yearly { .. } => Frequency::Yearly,
            Self::OneOff { .. } => Frequency::OneOff,
        }
    }

    /// Qualifying weekdays, for weekly schedules.
    #[must_use]
    pub const fn qualifying_weekdays(&self) -> Option<WeekdaySet> {
        match self {
            Self::Weekly { weekdays } => Some(*weekdays),
            _ => None,
        }
    }

    /// Day of month, for monthly schedules.
    #[must_use]
    pub const fn day_of_month(&self) -> Option<DayOfMonth> {
        match self {
            Self::Monthly { day_of_month } => Some(*day_of_month),
            _ => None,
        }
    }

    /// Anchor date, for yearly and one-off schedules.
    #[must_use]
    pub const fn specific_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Yearly { anchor } => Some(*anchor),
            Self::OneOff { date } => Some(*date),
            _ => None,
        }
    }
}

/// When a transaction fires next, and whether it still fires at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDescriptor {
    /// Frequency and anchor fields.
    #[serde(flatten)]
    pub recurrence: Recurrence,
    /// Time of day every occurrence carries.
    pub time_of_day: TimeOfDay,
    /// False once a one-off schedule has fired. Terminal.
    pub active: bool,
    /// Cached next firing instant.
    pub next_occurrence: Option<NaiveDateTime>,
}

impl ScheduleDescriptor {
    /// Creates an active schedule and seeds its next occurrence relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns a `RecurrenceError` if no next occurrence can be computed.
    pub fn new(
        recurrence: Recurrence,
        time_of_day: TimeOfDay,
        now: NaiveDateTime,
    ) -> Result<Self, RecurrenceError> {
        let mut descriptor = Self {
            recurrence,
            time_of_day,
            active: true,
            next_occurrence: None,
        };
        descriptor.next_occurrence = Some(RecurrenceEngine::compute_next_occurrence(
            &descriptor,
            now,
        )?);
        Ok(descriptor)
    }

    /// Returns the bare frequency tag.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.recurrence.frequency()
    }

    /// Returns true for schedules that fire only once.
    #[must_use]
    pub const fn is_one_off(&self) -> bool {
        matches!(self.recurrence, Recurrence::OneOff { .. })
    }
}
