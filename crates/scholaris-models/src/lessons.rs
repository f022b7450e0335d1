//! Lessons: one dated teaching slot of a subject for a class.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use scholaris_core::serde::{deserialize_optional_trimmed, deserialize_optional_uuid};
use scholaris_core::{PaginationMeta, PaginationParams};
use scholaris_scheduling::{SchoolDay, Scheduled, TimeSlot};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::deserialize_optional_date;
use crate::ids::{ClassId, LessonId, ModuleId, SubjectId, TeacherId};

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn deserialize_clock_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_clock_time(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid time '{}', expected HH:MM", s)))
}

/// A lesson joined with the names the timetable shows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lesson {
    pub id: LessonId,
    pub name: String,
    pub day: SchoolDay,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub class_id: ClassId,
    pub class_name: String,
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub teacher_surname: String,
    pub created_at: DateTime<Utc>,
}

impl Scheduled for Lesson {
    fn school_day(&self) -> SchoolDay {
        self.day
    }

    fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.start_time.time(), self.end_time.time())
    }

    fn date(&self) -> NaiveDate {
        self.start_time.date()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLessonDto {
    #[validate(length(min = 1, max = 120, message = "Lesson name is required!"))]
    pub name: String,
    pub day: SchoolDay,
    #[schema(value_type = String, example = "2025-09-15T09:00:00")]
    pub start_time: NaiveDateTime,
    #[schema(value_type = String, example = "2025-09-15T09:50:00")]
    pub end_time: NaiveDateTime,
    pub subject_id: SubjectId,
    pub class_id: ClassId,
    pub teacher_id: TeacherId,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLessonDto {
    #[validate(length(min = 1, max = 120, message = "Lesson name is required!"))]
    pub name: Option<String>,
    pub day: Option<SchoolDay>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveDateTime>,
    pub subject_id: Option<SubjectId>,
    pub class_id: Option<ClassId>,
    pub teacher_id: Option<TeacherId>,
}

/// A weekly template expanded over every week of a module.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRecurringLessonsDto {
    /// Base name; each lesson gets its date appended
    #[validate(length(min = 1, max = 120, message = "Lesson name is required!"))]
    pub name: String,
    pub day: SchoolDay,
    #[serde(deserialize_with = "deserialize_clock_time")]
    #[schema(value_type = String, example = "09:00")]
    pub start_time: NaiveTime,
    #[serde(deserialize_with = "deserialize_clock_time")]
    #[schema(value_type = String, example = "09:50")]
    pub end_time: NaiveTime,
    pub subject_id: SubjectId,
    pub class_id: ClassId,
    pub teacher_id: TeacherId,
    pub module_id: ModuleId,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecurringLessonsResponse {
    /// Number of dates the template expanded to
    pub total: usize,
    /// Number of lessons inserted
    pub created: usize,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LessonFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub class_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub teacher_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub subject_id: Option<Uuid>,
    /// Only lessons starting within this module's dates
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub module_id: Option<Uuid>,
    /// Matches subject, teacher or class name
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedLessonsResponse {
    pub data: Vec<Lesson>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityParams {
    pub teacher_id: TeacherId,
    pub day: SchoolDay,
    #[serde(deserialize_with = "deserialize_clock_time")]
    #[param(value_type = String, example = "09:00")]
    #[schema(value_type = String)]
    pub start_time: NaiveTime,
    #[serde(deserialize_with = "deserialize_clock_time")]
    #[param(value_type = String, example = "09:50")]
    #[schema(value_type = String)]
    pub end_time: NaiveTime,
    /// Narrows the check to lessons on this date
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[param(value_type = Option<String>, example = "2025-09-15")]
    #[schema(value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    /// Lesson to ignore, typically the one being edited
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub exclude_lesson_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub conflicts: Vec<Lesson>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clock_times() {
        assert_eq!(parse_clock_time("09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_clock_time("14:30:00"), NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(parse_clock_time("25:00"), None);
    }

    #[test]
    fn recurring_dto_accepts_short_times() {
        let json = serde_json::json!({
            "name": "Mathematics 5A",
            "day": "MONDAY",
            "start_time": "09:00",
            "end_time": "09:50",
            "subject_id": Uuid::new_v4(),
            "class_id": Uuid::new_v4(),
            "teacher_id": Uuid::new_v4(),
            "module_id": Uuid::new_v4(),
        });
        let dto: CreateRecurringLessonsDto = serde_json::from_value(json).unwrap();
        assert_eq!(dto.day, SchoolDay::Monday);
        assert_eq!(dto.end_time, NaiveTime::from_hms_opt(9, 50, 0).unwrap());
    }

    #[test]
    fn lesson_exposes_its_slot() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let lesson = Lesson {
            id: LessonId::new(),
            name: "Mathematics - 15.09.2025".to_string(),
            day: SchoolDay::Monday,
            start_time: start,
            end_time: start + chrono::Duration::minutes(50),
            subject_id: SubjectId::new(),
            subject_name: "Mathematics".to_string(),
            class_id: ClassId::new(),
            class_name: "5A".to_string(),
            teacher_id: TeacherId::new(),
            teacher_name: "Maria".to_string(),
            teacher_surname: "Popescu".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(lesson.slot().to_string(), "09:00-09:50");
        assert_eq!(lesson.date(), start.date());
    }
}
