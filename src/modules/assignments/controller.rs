use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use scholaris_core::AppError;
use scholaris_models::{AssignmentId, MessageResponse};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::assignments::model::{
    AssessmentFilterParams, Assignment, CreateAssignmentDto, PaginatedAssignmentsResponse,
    UpdateAssignmentDto,
};
use crate::modules::assignments::service::AssignmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 400, description = "Lesson not found"),
        (status = 403, description = "Not the lesson's teacher"),
        (status = 422, description = "Start before today or due before start")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let assignment = AssignmentService::create_assignment(&state.db, staff.viewer()?, dto).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[utoipa::path(
    get,
    path = "/api/assignments",
    params(AssessmentFilterParams),
    responses(
        (status = 200, description = "Assignments visible to the caller", body = PaginatedAssignmentsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_assignments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<AssessmentFilterParams>,
) -> Result<Json<PaginatedAssignmentsResponse>, AppError> {
    let assignments = AssignmentService::get_assignments(&state.db, auth_user.viewer()?, filters).await?;
    Ok(Json(assignments))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment details", body = Assignment),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_assignment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<AssignmentId>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = AssignmentService::get_assignment(&state.db, auth_user.viewer()?, id).await?;
    Ok(Json(assignment))
}

#[utoipa::path(
    put,
    path = "/api/assignments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 403, description = "Not the lesson's teacher"),
        (status = 404, description = "Assignment not found"),
        (status = 422, description = "Start before today or due before start")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn update_assignment(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<AssignmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentDto>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = AssignmentService::update_assignment(&state.db, staff.viewer()?, id, dto).await?;
    Ok(Json(assignment))
}

#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    params(("id" = uuid::Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted", body = MessageResponse),
        (status = 403, description = "Not the lesson's teacher"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<AssignmentId>,
) -> Result<Json<MessageResponse>, AppError> {
    AssignmentService::delete_assignment(&state.db, staff.viewer()?, id).await?;
    Ok(Json(MessageResponse::new("Assignment deleted successfully")))
}
