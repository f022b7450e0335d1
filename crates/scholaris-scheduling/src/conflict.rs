//! Teacher availability.
//!
//! A teacher is busy during a candidate slot when one of their existing
//! lessons falls on the same school day, on the same date if the candidate is
//! dated, and overlaps it by at least one minute.

use chrono::NaiveDate;

use crate::day::SchoolDay;
use crate::recurrence::Occurrence;
use crate::slot::TimeSlot;

/// Anything occupying a teacher at a given time.
pub trait Scheduled {
    fn school_day(&self) -> SchoolDay;
    fn slot(&self) -> TimeSlot;
    fn date(&self) -> NaiveDate;
}

/// A slot someone wants to book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub day: SchoolDay,
    pub slot: TimeSlot,
    /// When unset the candidate matches every week.
    pub date: Option<NaiveDate>,
}

impl Candidate {
    pub fn weekly(day: SchoolDay, slot: TimeSlot) -> Self {
        Self {
            day,
            slot,
            date: None,
        }
    }

    pub fn on(date: NaiveDate, day: SchoolDay, slot: TimeSlot) -> Self {
        Self {
            day,
            slot,
            date: Some(date),
        }
    }

    pub fn clashes_with<T: Scheduled + ?Sized>(&self, other: &T) -> bool {
        self.day == other.school_day()
            && self.date.is_none_or(|date| date == other.date())
            && self.slot.overlaps(&other.slot())
    }
}

/// Returns the entries of `existing` that clash with `candidate`.
pub fn find_conflicts<'a, T, I>(candidate: &Candidate, existing: I) -> Vec<&'a T>
where
    T: Scheduled + 'a,
    I: IntoIterator<Item = &'a T>,
{
    existing
        .into_iter()
        .filter(|entry| candidate.clashes_with(*entry))
        .collect()
}

/// Returns the occurrences that clash with at least one existing entry.
pub fn conflicting_occurrences<'o, T: Scheduled>(
    occurrences: &'o [Occurrence],
    existing: &[T],
) -> Vec<&'o Occurrence> {
    occurrences
        .iter()
        .filter(|occurrence| {
            let candidate = Candidate::from(*occurrence);
            existing.iter().any(|entry| candidate.clashes_with(entry))
        })
        .collect()
}

impl From<&Occurrence> for Candidate {
    fn from(occurrence: &Occurrence) -> Self {
        Candidate::on(
            occurrence.date,
            occurrence.day,
            TimeSlot::new(occurrence.start.time(), occurrence.end.time()),
        )
    }
}

impl Scheduled for Occurrence {
    fn school_day(&self) -> SchoolDay {
        self.day
    }

    fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.start.time(), self.end.time())
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, NaiveTime};

    use crate::recurrence::{DateRange, HolidayCalendar, WeeklyTemplate, occurrences};

    struct Booked {
        day: SchoolDay,
        start: NaiveDateTime,
        end: NaiveDateTime,
    }

    impl Scheduled for Booked {
        fn school_day(&self) -> SchoolDay {
            self.day
        }
        fn slot(&self) -> TimeSlot {
            TimeSlot::new(self.start.time(), self.end.time())
        }
        fn date(&self) -> NaiveDate {
            self.start.date()
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2025-07-07 is a Monday.
    fn booked(d: u32, sh: u32, eh: u32) -> Booked {
        let day = SchoolDay::of(date(d)).unwrap();
        Booked {
            day,
            start: date(d).and_time(time(sh, 0)),
            end: date(d).and_time(time(eh, 0)),
        }
    }

    #[test]
    fn overlapping_lesson_on_same_day_conflicts() {
        let existing = [booked(7, 9, 10)];
        let candidate = Candidate::on(date(7), SchoolDay::Monday, TimeSlot::new(time(9, 30), time(10, 30)));
        assert_eq!(find_conflicts(&candidate, &existing).len(), 1);
    }

    #[test]
    fn back_to_back_lessons_do_not_conflict() {
        let existing = [booked(7, 9, 10)];
        let candidate = Candidate::on(date(7), SchoolDay::Monday, TimeSlot::new(time(10, 0), time(11, 0)));
        assert!(find_conflicts(&candidate, &existing).is_empty());
    }

    #[test]
    fn different_day_does_not_conflict() {
        let existing = [booked(8, 9, 10)];
        let candidate = Candidate::weekly(SchoolDay::Monday, TimeSlot::new(time(9, 0), time(10, 0)));
        assert!(find_conflicts(&candidate, &existing).is_empty());
    }

    #[test]
    fn dated_candidate_ignores_other_weeks() {
        let existing = [booked(14, 9, 10)];
        let slot = TimeSlot::new(time(9, 0), time(10, 0));

        assert!(find_conflicts(&Candidate::on(date(7), SchoolDay::Monday, slot), &existing).is_empty());
        assert_eq!(
            find_conflicts(&Candidate::weekly(SchoolDay::Monday, slot), &existing).len(),
            1
        );
    }

    #[test]
    fn reports_only_clashing_occurrences() {
        let template = WeeklyTemplate::new(SchoolDay::Monday, time(9, 0), time(10, 0));
        let range = DateRange::new(date(1), date(31)).unwrap();
        let planned = occurrences(&template, &range, &HolidayCalendar::default());
        let existing = [booked(14, 9, 11), booked(21, 10, 11), booked(22, 9, 10)];

        let clashes = conflicting_occurrences(&planned, &existing);
        assert_eq!(clashes.len(), 1);
        assert_eq!(clashes[0].date, date(14));
    }
}
