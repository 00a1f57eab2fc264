//! Preview of future occurrences.

use chrono::NaiveDateTime;

use super::engine::RecurrenceEngine;
use super::types::{Recurrence, ScheduleDescriptor};

/// Iterator over the occurrences of a schedule at or after a starting instant.
///
/// Built by [`RecurrenceEngine::upcoming`]. Iteration stops early if the
/// engine cannot compute a further occurrence.
#[derive(Debug, Clone)]
pub struct Upcoming {
    descriptor: ScheduleDescriptor,
    next: Option<NaiveDateTime>,
    remaining: usize,
}

impl Upcoming {
    pub(super) fn new(descriptor: ScheduleDescriptor, from: NaiveDateTime, limit: usize) -> Self {
        let next = if descriptor.active {
            first_at_or_after(&descriptor, from)
        } else {
            None
        };
        Self {
            descriptor,
            next,
            remaining: limit,
        }
    }
}

fn first_at_or_after(descriptor: &ScheduleDescriptor, from: NaiveDateTime) -> Option<NaiveDateTime> {
    if let Recurrence::OneOff { date } = descriptor.recurrence {
        let only = descriptor.time_of_day.on(date);
        return (only >= from).then_some(only);
    }

    // Starting one day early lets an occurrence later today qualify.
    let day_before = from.date().pred_opt()?.and_time(from.time());
    let mut candidate = RecurrenceEngine::compute_next_occurrence(descriptor, day_before).ok()?;
    while candidate < from {
        candidate = RecurrenceEngine::compute_next_occurrence(descriptor, candidate).ok()?;
    }
    Some(candidate)
}

impl Iterator for Upcoming {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = if self.descriptor.is_one_off() {
            None
        } else {
            RecurrenceEngine::compute_next_occurrence(&self.descriptor, current).ok()
        };
        Some(current)
    }
}
