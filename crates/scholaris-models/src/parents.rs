//! Parent profiles.

use chrono::{DateTime, Utc};
use scholaris_core::serde::deserialize_optional_trimmed;
use scholaris_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validate_username;
use crate::ids::ParentId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Parent {
    pub id: ParentId,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    /// Full names of the parent's children
    pub students: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateParentDto {
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
    pub phone: String,
    #[validate(length(min = 1, message = "Address is required!"))]
    pub address: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateParentDto {
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
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParentFilterParams {
    /// Matches name or surname
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedParentsResponse {
    pub data: Vec<Parent>,
    pub meta: PaginationMeta,
}
