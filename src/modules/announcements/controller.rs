use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use scholaris_core::AppError;
use scholaris_models::{AnnouncementId, MessageResponse};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::announcements::model::{
    Announcement, CreateAnnouncementDto, NoticeFilterParams, PaginatedAnnouncementsResponse,
    UpdateAnnouncementDto,
};
use crate::modules::announcements::service::AnnouncementService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/announcements",
    request_body = CreateAnnouncementDto,
    responses(
        (status = 201, description = "Announcement published", body = Announcement),
        (status = 403, description = "Teacher does not teach the class"),
        (status = 422, description = "Date in the past")
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn create_announcement(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateAnnouncementDto>,
) -> Result<(StatusCode, Json<Announcement>), AppError> {
    let announcement =
        AnnouncementService::create_announcement(&state.db, staff.viewer()?, dto).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

#[utoipa::path(
    get,
    path = "/api/announcements",
    params(NoticeFilterParams),
    responses(
        (status = 200, description = "Announcements visible to the caller", body = PaginatedAnnouncementsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_announcements(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<NoticeFilterParams>,
) -> Result<Json<PaginatedAnnouncementsResponse>, AppError> {
    let announcements =
        AnnouncementService::get_announcements(&state.db, auth_user.viewer()?, filters).await?;
    Ok(Json(announcements))
}

#[utoipa::path(
    get,
    path = "/api/announcements/{id}",
    params(("id" = uuid::Uuid, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement details", body = Announcement),
        (status = 404, description = "Announcement not found")
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_announcement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<AnnouncementId>,
) -> Result<Json<Announcement>, AppError> {
    let announcement =
        AnnouncementService::get_announcement(&state.db, auth_user.viewer()?, id).await?;
    Ok(Json(announcement))
}

#[utoipa::path(
    put,
    path = "/api/announcements/{id}",
    params(("id" = uuid::Uuid, Path, description = "Announcement ID")),
    request_body = UpdateAnnouncementDto,
    responses(
        (status = 200, description = "Announcement updated", body = Announcement),
        (status = 403, description = "Teacher does not teach the class"),
        (status = 404, description = "Announcement not found"),
        (status = 422, description = "Date in the past")
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn update_announcement(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<AnnouncementId>,
    ValidatedJson(dto): ValidatedJson<UpdateAnnouncementDto>,
) -> Result<Json<Announcement>, AppError> {
    let announcement =
        AnnouncementService::update_announcement(&state.db, staff.viewer()?, id, dto).await?;
    Ok(Json(announcement))
}

#[utoipa::path(
    delete,
    path = "/api/announcements/{id}",
    params(("id" = uuid::Uuid, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement deleted", body = MessageResponse),
        (status = 403, description = "Teacher does not teach the class"),
        (status = 404, description = "Announcement not found")
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn delete_announcement(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<AnnouncementId>,
) -> Result<Json<MessageResponse>, AppError> {
    AnnouncementService::delete_announcement(&state.db, staff.viewer()?, id).await?;
    Ok(Json(MessageResponse::new("Announcement deleted successfully")))
}
