//! School events and announcements. Both are either school-wide
//! (`class_id` unset) or addressed to one class.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scholaris_core::serde::{
    deserialize_nullable, deserialize_optional_trimmed, deserialize_optional_uuid,
};
use scholaris_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::ids::{AnnouncementId, ClassId, EventId};

/// Events must last at least this long.
pub const MIN_EVENT_MINUTES: i64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub class_id: Option<ClassId>,
    pub class_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 150, message = "Title is required!"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required!"))]
    pub description: String,
    #[schema(value_type = String, example = "2025-10-10T12:00:00")]
    pub start_time: NaiveDateTime,
    #[schema(value_type = String, example = "2025-10-10T14:00:00")]
    pub end_time: NaiveDateTime,
    pub class_id: Option<ClassId>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEventDto {
    #[validate(length(min = 1, max = 150, message = "Title is required!"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description is required!"))]
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveDateTime>,
    /// Omit to keep the class, `null` to make the event school-wide
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub class_id: Option<Option<ClassId>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub class_id: Option<ClassId>,
    pub class_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAnnouncementDto {
    #[validate(length(min = 1, max = 150, message = "Title is required!"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required!"))]
    pub description: String,
    pub date: NaiveDate,
    pub class_id: Option<ClassId>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAnnouncementDto {
    #[validate(length(min = 1, max = 150, message = "Title is required!"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description is required!"))]
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    /// Omit to keep the class, `null` to make the announcement school-wide
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub class_id: Option<Option<ClassId>>,
}

/// Shared by the event and announcement lists.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NoticeFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub class_id: Option<Uuid>,
    /// Matches the title
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedEventsResponse {
    pub data: Vec<Event>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAnnouncementsResponse {
    pub data: Vec<Announcement>,
    pub meta: PaginationMeta,
}
