use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use tracing::instrument;

use scholaris_core::AppError;
use scholaris_models::{MessageResponse, ResultId};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::results::model::{
    CreateResultDto, ExportFormat, PaginatedResultsResponse, ResultEntry, ResultExportParams,
    ResultFilterParams, ResultListParams, ResultSummaryResponse, UpdateResultDto,
};
use crate::modules::results::service::ResultService;
use crate::state::AppState;
use crate::utils::{attachment, download};
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/results",
    request_body = CreateResultDto,
    responses(
        (status = 201, description = "Result recorded", body = ResultEntry),
        (status = 400, description = "Unknown exam, assignment or student"),
        (status = 403, description = "Not the teacher of the exam or assignment"),
        (status = 422, description = "Score out of range or no single source")
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn create_result(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateResultDto>,
) -> Result<(StatusCode, Json<ResultEntry>), AppError> {
    let result = ResultService::create_result(&state.db, staff.viewer()?, dto).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/results",
    params(ResultListParams),
    responses(
        (status = 200, description = "Results visible to the caller", body = PaginatedResultsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_results(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ResultListParams>,
) -> Result<Json<PaginatedResultsResponse>, AppError> {
    let results = ResultService::get_results(&state.db, auth_user.viewer()?, params).await?;
    Ok(Json(results))
}

#[utoipa::path(
    get,
    path = "/api/results/summary",
    params(ResultFilterParams),
    responses(
        (status = 200, description = "Average, min, max and pass rate of the matching scores", body = ResultSummaryResponse)
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_summary(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<ResultFilterParams>,
) -> Result<Json<ResultSummaryResponse>, AppError> {
    let summary = ResultService::get_summary(&state.db, auth_user.viewer()?, filters).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/results/export",
    params(ResultExportParams),
    responses(
        (
            status = 200,
            description = "CSV or PDF download",
            content((String = "text/csv"), (String = "application/pdf"))
        ),
        (status = 403, description = "Staff only")
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn export_results(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Query(params): Query<ResultExportParams>,
) -> Result<Response, AppError> {
    let export = ResultService::export_results(
        &state.db,
        staff.viewer()?,
        params.format,
        params.filters,
        state.school_header(),
    )
    .await?;

    let content_type = match export.format {
        ExportFormat::Csv => download::CSV,
        ExportFormat::Pdf => download::PDF,
    };
    Ok(attachment(content_type, &export.filename, export.bytes))
}

#[utoipa::path(
    get,
    path = "/api/results/{id}",
    params(("id" = uuid::Uuid, Path, description = "Result ID")),
    responses(
        (status = 200, description = "Result details", body = ResultEntry),
        (status = 404, description = "Result not found")
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_result(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ResultId>,
) -> Result<Json<ResultEntry>, AppError> {
    let result = ResultService::get_result(&state.db, auth_user.viewer()?, id).await?;
    Ok(Json(result))
}

#[utoipa::path(
    put,
    path = "/api/results/{id}",
    params(("id" = uuid::Uuid, Path, description = "Result ID")),
    request_body = UpdateResultDto,
    responses(
        (status = 200, description = "Result updated", body = ResultEntry),
        (status = 403, description = "Not the teacher of the exam or assignment"),
        (status = 404, description = "Result not found")
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn update_result(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<ResultId>,
    ValidatedJson(dto): ValidatedJson<UpdateResultDto>,
) -> Result<Json<ResultEntry>, AppError> {
    let result = ResultService::update_result(&state.db, staff.viewer()?, id, dto).await?;
    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/api/results/{id}",
    params(("id" = uuid::Uuid, Path, description = "Result ID")),
    responses(
        (status = 200, description = "Result deleted", body = MessageResponse),
        (status = 403, description = "Not the teacher of the exam or assignment"),
        (status = 404, description = "Result not found")
    ),
    tag = "Results",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, staff))]
pub async fn delete_result(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<ResultId>,
) -> Result<Json<MessageResponse>, AppError> {
    ResultService::delete_result(&state.db, staff.viewer()?, id).await?;
    Ok(Json(MessageResponse::new("Result deleted successfully")))
}
