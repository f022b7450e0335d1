use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Unknown school day: {0}")]
    UnknownDay(String),

    #[error("{0} is not a school day")]
    NotASchoolDay(NaiveDate),

    #[error("Lesson day {expected} does not match the weekday of {date}")]
    DayMismatch { expected: String, date: NaiveDate },

    #[error("Start and end time must fall on the same date")]
    SpansMultipleDays,

    #[error("End time must be after start time")]
    EmptySlot,

    #[error("Start time must be between {earliest} and {latest}")]
    StartOutsideHours {
        earliest: NaiveTime,
        latest: NaiveTime,
    },

    #[error("End time must be between {earliest} and {latest}")]
    EndOutsideHours {
        earliest: NaiveTime,
        latest: NaiveTime,
    },

    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
