//! Student profiles.

use chrono::{DateTime, NaiveDate, Utc};
use scholaris_core::serde::{deserialize_optional_trimmed, deserialize_optional_uuid};
use scholaris_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{Gender, validate_blood_type, validate_username};
use crate::ids::{ClassId, GradeId, ParentId, StudentId};

/// A student joined with their class, grade and parent names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub img: Option<String>,
    pub blood_type: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
    pub grade_id: GradeId,
    pub grade_level: i32,
    pub class_id: ClassId,
    pub class_name: String,
    pub parent_id: ParentId,
    pub parent_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// Registration number printed on school documents.
    pub fn registration_number(&self) -> String {
        self.id.short()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(
        length(min = 3, max = 20, message = "Username must be between 3 and 20 characters long!"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long!"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "First name is required!"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required!"))]
    pub surname: String,
    #[validate(email(message = "Invalid email address!"))]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 30, message = "Phone number is invalid!"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Address is required!"))]
    pub address: String,
    #[validate(url(message = "Image must be a URL!"))]
    pub img: Option<String>,
    #[validate(custom(function = "validate_blood_type"))]
    pub blood_type: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
    pub grade_id: GradeId,
    pub class_id: ClassId,
    pub parent_id: ParentId,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(
        length(min = 3, max = 20, message = "Username must be between 3 and 20 characters long!"),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long!"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 100, message = "First name is required!"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name is required!"))]
    pub surname: Option<String>,
    #[validate(email(message = "Invalid email address!"))]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 30, message = "Phone number is invalid!"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Address is required!"))]
    pub address: Option<String>,
    #[validate(url(message = "Image must be a URL!"))]
    pub img: Option<String>,
    #[validate(custom(function = "validate_blood_type"))]
    pub blood_type: Option<String>,
    pub gender: Option<Gender>,
    pub birthday: Option<NaiveDate>,
    pub grade_id: Option<GradeId>,
    pub class_id: Option<ClassId>,
    pub parent_id: Option<ParentId>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    /// Only students of classes where this teacher holds a lesson
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub teacher_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub class_id: Option<Uuid>,
    /// Matches name or surname
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}
