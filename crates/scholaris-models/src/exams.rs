use chrono::{DateTime, NaiveDateTime, Utc};
use scholaris_core::serde::{deserialize_optional_trimmed, deserialize_optional_uuid};
use scholaris_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::ids::{ClassId, ExamId, LessonId, SubjectId, TeacherId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exam {
    pub id: ExamId,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub lesson_id: LessonId,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub class_id: ClassId,
    pub class_name: String,
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub teacher_surname: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExamDto {
    #[validate(length(min = 1, max = 150, message = "Title is required!"))]
    pub title: String,
    #[schema(value_type = String, example = "2025-10-06T10:00:00")]
    pub start_time: NaiveDateTime,
    #[schema(value_type = String, example = "2025-10-06T10:50:00")]
    pub end_time: NaiveDateTime,
    pub lesson_id: LessonId,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateExamDto {
    #[validate(length(min = 1, max = 150, message = "Title is required!"))]
    pub title: Option<String>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveDateTime>,
    pub lesson_id: Option<LessonId>,
}

/// Shared by the exam and assignment lists.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssessmentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub class_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub teacher_id: Option<Uuid>,
    /// Matches the title or the subject name
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedExamsResponse {
    pub data: Vec<Exam>,
    pub meta: PaginationMeta,
}
