use chrono::{DateTime, NaiveDateTime, Utc};
use scholaris_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{AssignmentId, ClassId, LessonId, SubjectId, TeacherId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub start_date: NaiveDateTime,
    pub due_date: NaiveDateTime,
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
pub struct CreateAssignmentDto {
    #[validate(length(min = 1, max = 150, message = "Title is required!"))]
    pub title: String,
    #[schema(value_type = String, example = "2025-10-06T08:00:00")]
    pub start_date: NaiveDateTime,
    #[schema(value_type = String, example = "2025-10-13T08:00:00")]
    pub due_date: NaiveDateTime,
    pub lesson_id: LessonId,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentDto {
    #[validate(length(min = 1, max = 150, message = "Title is required!"))]
    pub title: Option<String>,
    #[schema(value_type = Option<String>)]
    pub start_date: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>)]
    pub due_date: Option<NaiveDateTime>,
    pub lesson_id: Option<LessonId>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAssignmentsResponse {
    pub data: Vec<Assignment>,
    pub meta: PaginationMeta,
}
