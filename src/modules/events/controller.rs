use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use scholaris_core::AppError;
use scholaris_models::{EventId, MessageResponse};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::events::model::{
    CreateEventDto, Event, NoticeFilterParams, PaginatedEventsResponse, UpdateEventDto,
};
use crate::modules::events::service::EventService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 403, description = "Teacher does not teach the class"),
        (status = 422, description = "Invalid, past or too short time range")
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn create_event(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateEventDto>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let event = EventService::create_event(&state.db, staff.viewer()?, dto).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/events",
    params(NoticeFilterParams),
    responses(
        (status = 200, description = "Events visible to the caller", body = PaginatedEventsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_events(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<NoticeFilterParams>,
) -> Result<Json<PaginatedEventsResponse>, AppError> {
    let events = EventService::get_events(&state.db, auth_user.viewer()?, filters).await?;
    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = uuid::Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = Event),
        (status = 404, description = "Event not found")
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<EventId>,
) -> Result<Json<Event>, AppError> {
    let event = EventService::get_event(&state.db, auth_user.viewer()?, id).await?;
    Ok(Json(event))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = uuid::Uuid, Path, description = "Event ID")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 403, description = "Teacher does not teach the class"),
        (status = 404, description = "Event not found"),
        (status = 422, description = "Invalid, past or too short time range")
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn update_event(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<EventId>,
    ValidatedJson(dto): ValidatedJson<UpdateEventDto>,
) -> Result<Json<Event>, AppError> {
    let event = EventService::update_event(&state.db, staff.viewer()?, id, dto).await?;
    Ok(Json(event))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = uuid::Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 403, description = "Teacher does not teach the class"),
        (status = 404, description = "Event not found")
    ),
    tag = "Events",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn delete_event(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<EventId>,
) -> Result<Json<MessageResponse>, AppError> {
    EventService::delete_event(&state.db, staff.viewer()?, id).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}
