//! # Scholaris Scheduling
//!
//! Pure calendar logic for the weekly lesson timetable. Nothing in this crate
//! touches the database; services load lessons and hand them in through the
//! [`Scheduled`] trait.
//!
//! - [`day`]: the five school days a lesson may fall on
//! - [`slot`]: minute-of-day intervals and the half-open overlap test
//! - [`hours`]: the teaching-hours window lessons must fit in
//! - [`recurrence`]: expanding a weekly template over a module, skipping holidays
//! - [`conflict`]: finding a teacher's clashing lessons
//!
//! ```
//! use chrono::{NaiveDate, NaiveTime};
//! use scholaris_scheduling::{DateRange, HolidayCalendar, SchoolDay, WeeklyTemplate, occurrences};
//!
//! let template = WeeklyTemplate::new(
//!     SchoolDay::Monday,
//!     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
//!     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
//! );
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
//! )
//! .unwrap();
//! let holidays = HolidayCalendar::from_iter([NaiveDate::from_ymd_opt(2025, 7, 21).unwrap()]);
//!
//! // Mondays in July 2025: 7, 14, 21, 28; the 21st is a holiday.
//! assert_eq!(occurrences(&template, &range, &holidays).len(), 3);
//! ```

pub mod conflict;
pub mod day;
pub mod error;
pub mod hours;
pub mod recurrence;
pub mod slot;

pub use conflict::{Candidate, Scheduled, conflicting_occurrences, find_conflicts};
pub use day::SchoolDay;
pub use error::ScheduleError;
pub use hours::TeachingHours;
pub use recurrence::{
    DateRange, HolidayCalendar, Occurrence, WeeklyTemplate, occurrence_name, occurrences,
};
pub use slot::TimeSlot;
