use chrono::{DateTime, Utc};
use scholaris_core::serde::deserialize_optional_trimmed;
use scholaris_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{SubjectId, TeacherId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeacherRef {
    pub id: TeacherId,
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubjectWithTeachers {
    #[serde(flatten)]
    pub subject: Subject,
    pub teachers: Vec<TeacherRef>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1, max = 100, message = "Subject name is required!"))]
    pub name: String,
    #[validate(length(min = 1, message = "A subject needs at least one teacher"))]
    pub teacher_ids: Vec<TeacherId>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSubjectDto {
    #[validate(length(min = 1, max = 100, message = "Subject name is required!"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "A subject needs at least one teacher"))]
    pub teacher_ids: Option<Vec<TeacherId>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubjectFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedSubjectsResponse {
    pub data: Vec<SubjectWithTeachers>,
    pub meta: PaginationMeta,
}
