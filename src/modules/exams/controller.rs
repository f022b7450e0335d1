use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use scholaris_core::AppError;
use scholaris_models::{ExamId, MessageResponse};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::exams::model::{
    AssessmentFilterParams, CreateExamDto, Exam, PaginatedExamsResponse, UpdateExamDto,
};
use crate::modules::exams::service::ExamService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/exams",
    request_body = CreateExamDto,
    responses(
        (status = 201, description = "Exam scheduled", body = Exam),
        (status = 400, description = "Lesson not found"),
        (status = 403, description = "Not the lesson's teacher"),
        (status = 422, description = "Invalid or past times")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn create_exam(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateExamDto>,
) -> Result<(StatusCode, Json<Exam>), AppError> {
    let exam = ExamService::create_exam(&state.db, staff.viewer()?, dto).await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

#[utoipa::path(
    get,
    path = "/api/exams",
    params(AssessmentFilterParams),
    responses(
        (status = 200, description = "Exams visible to the caller", body = PaginatedExamsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_exams(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<AssessmentFilterParams>,
) -> Result<Json<PaginatedExamsResponse>, AppError> {
    let exams = ExamService::get_exams(&state.db, auth_user.viewer()?, filters).await?;
    Ok(Json(exams))
}

#[utoipa::path(
    get,
    path = "/api/exams/{id}",
    params(("id" = uuid::Uuid, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam details", body = Exam),
        (status = 404, description = "Exam not found")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_exam(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ExamId>,
) -> Result<Json<Exam>, AppError> {
    let exam = ExamService::get_exam(&state.db, auth_user.viewer()?, id).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    put,
    path = "/api/exams/{id}",
    params(("id" = uuid::Uuid, Path, description = "Exam ID")),
    request_body = UpdateExamDto,
    responses(
        (status = 200, description = "Exam updated", body = Exam),
        (status = 403, description = "Not the lesson's teacher"),
        (status = 404, description = "Exam not found"),
        (status = 422, description = "Invalid or past times")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn update_exam(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<ExamId>,
    ValidatedJson(dto): ValidatedJson<UpdateExamDto>,
) -> Result<Json<Exam>, AppError> {
    let exam = ExamService::update_exam(&state.db, staff.viewer()?, id, dto).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    delete,
    path = "/api/exams/{id}",
    params(("id" = uuid::Uuid, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam deleted", body = MessageResponse),
        (status = 403, description = "Not the lesson's teacher"),
        (status = 404, description = "Exam not found")
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn delete_exam(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<ExamId>,
) -> Result<Json<MessageResponse>, AppError> {
    ExamService::delete_exam(&state.db, staff.viewer()?, id).await?;
    Ok(Json(MessageResponse::new("Exam deleted successfully")))
}
