//! Classes (a named group of students within a grade).

use chrono::{DateTime, Utc};
use scholaris_core::serde::{deserialize_optional_trimmed, deserialize_optional_uuid};
use scholaris_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::ids::{ClassId, GradeId, TeacherId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub capacity: i32,
    pub grade_id: GradeId,
    pub grade_level: i32,
    pub supervisor_id: Option<TeacherId>,
    pub supervisor_name: Option<String>,
    pub student_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn has_room(&self) -> bool {
        self.student_count < i64::from(self.capacity)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 50, message = "Class name is required!"))]
    pub name: String,
    #[validate(range(min = 1, max = 100, message = "Capacity must be between 1 and 100"))]
    pub capacity: i32,
    pub grade_id: GradeId,
    pub supervisor_id: Option<TeacherId>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 50, message = "Class name is required!"))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 100, message = "Capacity must be between 1 and 100"))]
    pub capacity: Option<i32>,
    pub grade_id: Option<GradeId>,
    pub supervisor_id: Option<TeacherId>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub supervisor_id: Option<Uuid>,
    /// Matches the class name
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedClassesResponse {
    pub data: Vec<Class>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(capacity: i32, student_count: i64) -> Class {
        Class {
            id: ClassId::new(),
            name: "5A".to_string(),
            capacity,
            grade_id: GradeId::new(),
            grade_level: 5,
            supervisor_id: None,
            supervisor_name: None,
            student_count,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn room_until_capacity() {
        assert!(class(2, 1).has_room());
        assert!(!class(2, 2).has_room());
    }

    #[test]
    fn capacity_must_be_positive() {
        let dto = CreateClassDto {
            name: "5A".to_string(),
            capacity: 0,
            grade_id: GradeId::new(),
            supervisor_id: None,
        };
        assert!(dto.validate().is_err());
    }
}
