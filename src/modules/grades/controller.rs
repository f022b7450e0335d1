use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use scholaris_core::AppError;

use crate::middleware::role::RequireAdmin;
use crate::modules::grades::model::{CreateGradeDto, Grade};
use crate::modules::grades::service::GradeService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade created", body = Grade),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only"),
        (status = 409, description = "Grade level already exists"),
        (status = 422, description = "Validation error")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_grade(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    let grade = GradeService::create_grade(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

#[utoipa::path(
    get,
    path = "/api/grades",
    responses(
        (status = 200, description = "All grades by level", body = Vec<Grade>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_grades(State(state): State<AppState>) -> Result<Json<Vec<Grade>>, AppError> {
    let grades = GradeService::get_grades(&state.db).await?;
    Ok(Json(grades))
}
