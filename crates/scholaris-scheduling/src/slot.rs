//! Minute-granular time intervals within a single day.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A half-open `[start, end)` interval measured in minutes since midnight.
///
/// Seconds are truncated, so 09:00:59 and 09:00:00 start the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    start: u32,
    end: u32,
}

pub(crate) fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: minute_of_day(start),
            end: minute_of_day(end),
        }
    }

    /// Builds a slot from two timestamps on the same date.
    pub fn from_datetimes(
        start: &NaiveDateTime,
        end: &NaiveDateTime,
    ) -> Result<Self, ScheduleError> {
        if start.date() != end.date() {
            return Err(ScheduleError::SpansMultipleDays);
        }
        Ok(Self::new(start.time(), end.time()))
    }

    pub fn start_minute(&self) -> u32 {
        self.start
    }

    pub fn end_minute(&self) -> u32 {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Two slots overlap when each starts before the other ends.
    /// Slots that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start / 60,
            self.start % 60,
            self.end / 60,
            self.end % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn slot(sh: u32, sm: u32, eh: u32, em: u32) -> TimeSlot {
        TimeSlot::new(
            NaiveTime::from_hms_opt(sh, sm, 0).unwrap(),
            NaiveTime::from_hms_opt(eh, em, 0).unwrap(),
        )
    }

    #[test]
    fn overlapping_slots_conflict() {
        assert!(slot(9, 0, 10, 0).overlaps(&slot(9, 30, 10, 30)));
        assert!(slot(9, 30, 10, 30).overlaps(&slot(9, 0, 10, 0)));
        assert!(slot(9, 0, 12, 0).overlaps(&slot(10, 0, 11, 0)));
    }

    #[test]
    fn touching_slots_do_not_conflict() {
        assert!(!slot(9, 0, 10, 0).overlaps(&slot(10, 0, 11, 0)));
        assert!(!slot(10, 0, 11, 0).overlaps(&slot(9, 0, 10, 0)));
    }

    #[test]
    fn disjoint_slots_do_not_conflict() {
        assert!(!slot(8, 0, 9, 0).overlaps(&slot(13, 0, 14, 0)));
    }

    #[test]
    fn truncates_seconds() {
        let a = TimeSlot::new(
            NaiveTime::from_hms_opt(9, 0, 59).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 30).unwrap(),
        );
        assert_eq!(a, slot(9, 0, 10, 0));
        assert_eq!(a.duration_minutes(), 60);
    }

    #[test]
    fn rejects_datetimes_on_different_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 7, 7)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 7, 8)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(
            TimeSlot::from_datetimes(&start, &end),
            Err(ScheduleError::SpansMultipleDays)
        );
    }

    #[test]
    fn displays_as_clock_range() {
        assert_eq!(slot(8, 5, 9, 45).to_string(), "08:05-09:45");
        assert!(slot(10, 0, 10, 0).is_empty());
    }
}
