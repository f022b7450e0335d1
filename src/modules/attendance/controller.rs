use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use scholaris_core::AppError;
use scholaris_models::{AttendanceId, MessageResponse};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::attendance::model::{
    Attendance, AttendanceFilterParams, CreateAttendanceDto, PaginatedAttendanceResponse,
    UpdateAttendanceDto,
};
use crate::modules::attendance::service::AttendanceService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendanceDto,
    responses(
        (status = 201, description = "Attendance recorded", body = Attendance),
        (status = 400, description = "Lesson not found"),
        (status = 403, description = "Not the lesson teacher"),
        (status = 422, description = "Validation error")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn create_attendance(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceDto>,
) -> Result<(StatusCode, Json<Attendance>), AppError> {
    let record = AttendanceService::create_attendance(&state.db, staff.viewer()?, dto).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceFilterParams),
    responses(
        (status = 200, description = "Attendance visible to the caller", body = PaginatedAttendanceResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_attendances(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<AttendanceFilterParams>,
) -> Result<Json<PaginatedAttendanceResponse>, AppError> {
    let records =
        AttendanceService::get_attendances(&state.db, auth_user.viewer()?, filters).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = uuid::Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record", body = Attendance),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<AttendanceId>,
) -> Result<Json<Attendance>, AppError> {
    let record = AttendanceService::get_attendance(&state.db, auth_user.viewer()?, id).await?;
    Ok(Json(record))
}

#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(("id" = uuid::Uuid, Path, description = "Attendance record ID")),
    request_body = UpdateAttendanceDto,
    responses(
        (status = 200, description = "Record updated", body = Attendance),
        (status = 403, description = "Not the lesson teacher"),
        (status = 404, description = "Attendance record not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn update_attendance(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<AttendanceId>,
    ValidatedJson(dto): ValidatedJson<UpdateAttendanceDto>,
) -> Result<Json<Attendance>, AppError> {
    let record =
        AttendanceService::update_attendance(&state.db, staff.viewer()?, id, dto).await?;
    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id" = uuid::Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Record deleted", body = MessageResponse),
        (status = 403, description = "Not the lesson teacher"),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn delete_attendance(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<AttendanceId>,
) -> Result<Json<MessageResponse>, AppError> {
    AttendanceService::delete_attendance(&state.db, staff.viewer()?, id).await?;
    Ok(Json(MessageResponse::new("Attendance record deleted successfully")))
}
