//! The window of the school day in which lessons may be held.

use chrono::{NaiveDateTime, NaiveTime};

use crate::day::SchoolDay;
use crate::error::ScheduleError;
use crate::slot::{TimeSlot, minute_of_day};

/// Bounds on lesson start and end times, inclusive at minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeachingHours {
    pub earliest_start: NaiveTime,
    pub latest_start: NaiveTime,
    pub latest_end: NaiveTime,
}

impl Default for TeachingHours {
    /// Lessons start between 08:00 and 15:00 and end by 15:59.
    fn default() -> Self {
        Self {
            earliest_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            latest_start: NaiveTime::from_hms_opt(15, 0, 0).unwrap_or(NaiveTime::MIN),
            latest_end: NaiveTime::from_hms_opt(15, 59, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl TeachingHours {
    /// Checks that `slot` is non-empty and sits inside the window.
    pub fn check(&self, slot: &TimeSlot) -> Result<(), ScheduleError> {
        let earliest = minute_of_day(self.earliest_start);
        let latest_start = minute_of_day(self.latest_start);
        let latest_end = minute_of_day(self.latest_end);

        if slot.start_minute() < earliest || slot.start_minute() > latest_start {
            return Err(ScheduleError::StartOutsideHours {
                earliest: self.earliest_start,
                latest: self.latest_start,
            });
        }
        if slot.end_minute() < earliest || slot.end_minute() > latest_end {
            return Err(ScheduleError::EndOutsideHours {
                earliest: self.earliest_start,
                latest: self.latest_end,
            });
        }
        if slot.is_empty() {
            return Err(ScheduleError::EmptySlot);
        }
        Ok(())
    }

    /// Full validation of a lesson's day and timestamps.
    pub fn check_lesson(
        &self,
        day: SchoolDay,
        start: &NaiveDateTime,
        end: &NaiveDateTime,
    ) -> Result<TimeSlot, ScheduleError> {
        let slot = TimeSlot::from_datetimes(start, end)?;
        day.ensure_matches(start.date())?;
        self.check(&slot)?;
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 7)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn check(sh: u32, sm: u32, eh: u32, em: u32) -> Result<TimeSlot, ScheduleError> {
        TeachingHours::default().check_lesson(SchoolDay::Monday, &at(sh, sm), &at(eh, em))
    }

    #[test]
    fn accepts_lessons_inside_window() {
        assert!(check(8, 0, 8, 45).is_ok());
        assert!(check(15, 0, 15, 59).is_ok());
    }

    #[test]
    fn rejects_early_or_late_start() {
        assert!(matches!(
            check(7, 59, 8, 30),
            Err(ScheduleError::StartOutsideHours { .. })
        ));
        assert!(matches!(
            check(15, 1, 15, 30),
            Err(ScheduleError::StartOutsideHours { .. })
        ));
    }

    #[test]
    fn rejects_late_end() {
        assert!(matches!(
            check(14, 0, 16, 0),
            Err(ScheduleError::EndOutsideHours { .. })
        ));
    }

    #[test]
    fn rejects_end_not_after_start() {
        assert_eq!(check(10, 0, 10, 0), Err(ScheduleError::EmptySlot));
        assert_eq!(check(11, 0, 10, 0), Err(ScheduleError::EmptySlot));
    }

    #[test]
    fn rejects_wrong_weekday() {
        let result =
            TeachingHours::default().check_lesson(SchoolDay::Friday, &at(9, 0), &at(10, 0));
        assert!(matches!(result, Err(ScheduleError::DayMismatch { .. })));
    }
}
