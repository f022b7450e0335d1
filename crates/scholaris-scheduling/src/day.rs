use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A weekday on which lessons can be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "lesson_day", rename_all = "UPPERCASE")
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 5] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
    ];

    pub fn weekday(self) -> Weekday {
        match self {
            SchoolDay::Monday => Weekday::Mon,
            SchoolDay::Tuesday => Weekday::Tue,
            SchoolDay::Wednesday => Weekday::Wed,
            SchoolDay::Thursday => Weekday::Thu,
            SchoolDay::Friday => Weekday::Fri,
        }
    }

    /// Weekends have no school day.
    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(SchoolDay::Monday),
            Weekday::Tue => Some(SchoolDay::Tuesday),
            Weekday::Wed => Some(SchoolDay::Wednesday),
            Weekday::Thu => Some(SchoolDay::Thursday),
            Weekday::Fri => Some(SchoolDay::Friday),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    /// The school day `date` falls on.
    pub fn of(date: NaiveDate) -> Result<Self, ScheduleError> {
        Self::from_weekday(date.weekday()).ok_or(ScheduleError::NotASchoolDay(date))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchoolDay::Monday => "MONDAY",
            SchoolDay::Tuesday => "TUESDAY",
            SchoolDay::Wednesday => "WEDNESDAY",
            SchoolDay::Thursday => "THURSDAY",
            SchoolDay::Friday => "FRIDAY",
        }
    }

    /// Fails unless `date` falls on this day.
    pub fn ensure_matches(self, date: NaiveDate) -> Result<(), ScheduleError> {
        if date.weekday() == self.weekday() {
            Ok(())
        } else {
            Err(ScheduleError::DayMismatch {
                expected: self.as_str().to_string(),
                date,
            })
        }
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchoolDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchoolDay::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScheduleError::UnknownDay(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn maps_dates_to_school_days() {
        assert_eq!(SchoolDay::of(date(2025, 7, 7)), Ok(SchoolDay::Monday));
        assert_eq!(SchoolDay::of(date(2025, 7, 11)), Ok(SchoolDay::Friday));
        assert_eq!(
            SchoolDay::of(date(2025, 7, 12)),
            Err(ScheduleError::NotASchoolDay(date(2025, 7, 12)))
        );
    }

    #[test]
    fn weekday_round_trip() {
        for day in SchoolDay::ALL {
            assert_eq!(SchoolDay::from_weekday(day.weekday()), Some(day));
        }
        assert_eq!(SchoolDay::from_weekday(Weekday::Sun), None);
    }

    #[test]
    fn parses_any_case() {
        assert_eq!("wednesday".parse::<SchoolDay>(), Ok(SchoolDay::Wednesday));
        assert_eq!("FRIDAY".parse::<SchoolDay>(), Ok(SchoolDay::Friday));
        assert!("SATURDAY".parse::<SchoolDay>().is_err());
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&SchoolDay::Thursday).unwrap(),
            "\"THURSDAY\""
        );
    }

    #[test]
    fn ensure_matches_checks_weekday() {
        assert!(SchoolDay::Monday.ensure_matches(date(2025, 7, 7)).is_ok());
        assert!(SchoolDay::Tuesday.ensure_matches(date(2025, 7, 7)).is_err());
    }
}
