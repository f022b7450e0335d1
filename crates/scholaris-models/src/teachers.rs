//! Teacher profiles and the subjects they teach.

use chrono::{DateTime, NaiveDate, Utc};
use scholaris_core::serde::{deserialize_optional_trimmed, deserialize_optional_uuid};
use scholaris_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{Gender, validate_blood_type, validate_username};
use crate::ids::{ClassId, SubjectId, TeacherId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: TeacherId,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// `id` and `name` of a subject, as listed on a teacher.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SubjectRef {
    pub id: SubjectId,
    pub name: String,
}

/// `id` and `name` of a class, as listed on a teacher.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassRef {
    pub id: ClassId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherWithRelations {
    #[serde(flatten)]
    pub teacher: Teacher,
    pub subjects: Vec<SubjectRef>,
    /// Classes in which the teacher holds at least one lesson
    pub classes: Vec<ClassRef>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
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
    #[serde(default)]
    pub subject_ids: Vec<SubjectId>,
}

/// Only provided fields change. `subject_ids`, when present, replaces the
/// whole subject list.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherDto {
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
    pub subject_ids: Option<Vec<SubjectId>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeacherFilterParams {
    /// Only teachers holding a lesson in this class
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub class_id: Option<Uuid>,
    /// Matches name or surname
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub data: Vec<Teacher>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreateTeacherDto {
        CreateTeacherDto {
            username: "mpopescu".to_string(),
            password: "password123".to_string(),
            name: "Maria".to_string(),
            surname: "Popescu".to_string(),
            email: Some("maria@school.test".to_string()),
            phone: None,
            address: "Str. Lalelelor 1".to_string(),
            img: None,
            blood_type: "O+".to_string(),
            gender: Gender::Female,
            birthday: NaiveDate::from_ymd_opt(1985, 3, 14).unwrap(),
            subject_ids: vec![],
        }
    }

    #[test]
    fn accepts_valid_teacher() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_short_username_and_password() {
        let dto = CreateTeacherDto {
            username: "ab".to_string(),
            password: "short".to_string(),
            ..valid()
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn rejects_unknown_blood_type() {
        let dto = CreateTeacherDto {
            blood_type: "Z".to_string(),
            ..valid()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UpdateTeacherDto::default().validate().is_ok());
    }

    #[test]
    fn update_password_is_checked_when_present() {
        let dto = UpdateTeacherDto {
            password: Some("1234".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
