//! Expansion of a weekly lesson template over an academic module.
//!
//! Given the day and clock times of a recurring lesson, [`occurrences`] lists
//! every date in the module's range that falls on that day, minus holidays.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::day::SchoolDay;
use crate::error::ScheduleError;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ScheduleError> {
        if start > end {
            return Err(ScheduleError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The first date in the range falling on `day`, if any.
    pub fn first(&self, day: SchoolDay) -> Option<NaiveDate> {
        let current = self.start.weekday().num_days_from_monday();
        let target = day.weekday().num_days_from_monday();
        let offset = (7 + target - current) % 7;

        self.start
            .checked_add_days(Days::new(u64::from(offset)))
            .filter(|date| self.contains(*date))
    }
}

/// Dates on which no lessons are held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<NaiveDate> for HolidayCalendar {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

/// A lesson that repeats every week on the same day and times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyTemplate {
    pub day: SchoolDay,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WeeklyTemplate {
    pub fn new(day: SchoolDay, start: NaiveTime, end: NaiveTime) -> Self {
        Self { day, start, end }
    }
}

/// One concrete dated instance of a [`WeeklyTemplate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub day: SchoolDay,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Lists the template's dates within `range`, ascending, skipping holidays.
pub fn occurrences(
    template: &WeeklyTemplate,
    range: &DateRange,
    holidays: &HolidayCalendar,
) -> Vec<Occurrence> {
    let Some(first) = range.first(template.day) else {
        return Vec::new();
    };

    first
        .iter_weeks()
        .take_while(|date| range.contains(*date))
        .filter(|date| !holidays.contains(*date))
        .map(|date| Occurrence {
            date,
            day: template.day,
            start: date.and_time(template.start),
            end: date.and_time(template.end),
        })
        .collect()
}

/// Name of a generated lesson: the base name followed by its date.
pub fn occurrence_name(base: &str, date: NaiveDate) -> String {
    format!("{} - {}", base.trim(), date.format("%d.%m.%Y"))
}
