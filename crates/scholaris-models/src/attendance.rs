use chrono::{DateTime, NaiveDate, Utc};
use scholaris_core::serde::deserialize_optional_uuid;
use scholaris_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::deserialize_optional_date;
use crate::ids::{AttendanceId, ClassId, LessonId, StudentId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    pub id: AttendanceId,
    pub date: NaiveDate,
    pub present: bool,
    /// Only meaningful for absences
    pub excused: bool,
    pub student_id: StudentId,
    pub student_name: String,
    pub student_surname: String,
    pub lesson_id: LessonId,
    pub lesson_name: String,
    pub class_id: ClassId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAttendanceDto {
    pub date: NaiveDate,
    pub present: bool,
    #[serde(default)]
    pub excused: bool,
    pub student_id: StudentId,
    pub lesson_id: LessonId,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAttendanceDto {
    pub date: Option<NaiveDate>,
    pub present: Option<bool>,
    pub excused: Option<bool>,
    pub student_id: Option<StudentId>,
    pub lesson_id: Option<LessonId>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub lesson_id: Option<Uuid>,
    /// First date to include
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[param(value_type = Option<String>, example = "2025-09-01")]
    #[schema(value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    /// Last date to include
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[param(value_type = Option<String>, example = "2025-09-30")]
    #[schema(value_type = Option<String>)]
    pub to: Option<NaiveDate>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAttendanceResponse {
    pub data: Vec<Attendance>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_filters_parse() {
        let params: AttendanceFilterParams =
            serde_json::from_str(r#"{"from":"2025-09-01","to":""}"#).unwrap();
        assert_eq!(params.from, NaiveDate::from_ymd_opt(2025, 9, 1));
        assert!(params.to.is_none());
    }

    #[test]
    fn excused_defaults_to_false() {
        let dto: CreateAttendanceDto = serde_json::from_value(serde_json::json!({
            "date": "2025-09-15",
            "present": false,
            "student_id": Uuid::new_v4(),
            "lesson_id": Uuid::new_v4(),
        }))
        .unwrap();
        assert!(!dto.excused);
    }
}
