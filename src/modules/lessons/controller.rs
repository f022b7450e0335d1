use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use scholaris_core::AppError;
use scholaris_models::{LessonId, MessageResponse};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::lessons::model::{
    AvailabilityParams, AvailabilityResponse, CreateLessonDto, CreateRecurringLessonsDto, Lesson,
    LessonFilterParams, PaginatedLessonsResponse, RecurringLessonsResponse, UpdateLessonDto,
};
use crate::modules::lessons::service::LessonService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 400, description = "Unknown subject, class or teacher"),
        (status = 403, description = "Teachers may only book themselves"),
        (status = 409, description = "Teacher is not available in this time slot"),
        (status = 422, description = "Outside teaching hours or day mismatch")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user = %auth_user.username()))]
pub async fn create_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let lesson = LessonService::create_lesson(&state.db, auth_user.viewer()?, dto).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    post,
    path = "/api/lessons/recurring",
    request_body = CreateRecurringLessonsDto,
    responses(
        (status = 201, description = "One lesson per free module date", body = RecurringLessonsResponse),
        (status = 403, description = "Teachers may only book themselves"),
        (status = 404, description = "Module not found"),
        (status = 409, description = "Teacher is busy on the listed dates; nothing was created"),
        (status = 422, description = "Outside teaching hours or no matching dates")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user = %auth_user.username()))]
pub async fn create_recurring_lessons(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateRecurringLessonsDto>,
) -> Result<(StatusCode, Json<RecurringLessonsResponse>), AppError> {
    let created =
        LessonService::create_recurring_lessons(&state.db, auth_user.viewer()?, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/lessons/availability",
    params(AvailabilityParams),
    responses(
        (status = 200, description = "Whether the teacher is free, with clashing lessons", body = AvailabilityResponse),
        (status = 403, description = "Staff only"),
        (status = 422, description = "Empty slot or date not on the given day")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _staff))]
pub async fn check_availability(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let availability = LessonService::check_availability(&state.db, params).await?;
    Ok(Json(availability))
}

#[utoipa::path(
    get,
    path = "/api/lessons",
    params(LessonFilterParams),
    responses(
        (status = 200, description = "Lessons in the caller's timetable, by start time", body = PaginatedLessonsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_lessons(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<LessonFilterParams>,
) -> Result<Json<PaginatedLessonsResponse>, AppError> {
    let lessons = LessonService::get_lessons(&state.db, auth_user.viewer()?, filters).await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    params(("id" = uuid::Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson details", body = Lesson),
        (status = 404, description = "Lesson not found")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<LessonId>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = LessonService::get_lesson(&state.db, auth_user.viewer()?, id).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    put,
    path = "/api/lessons/{id}",
    params(("id" = uuid::Uuid, Path, description = "Lesson ID")),
    request_body = UpdateLessonDto,
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 403, description = "Not the lesson's teacher"),
        (status = 404, description = "Lesson not found"),
        (status = 409, description = "Teacher is not available in this time slot"),
        (status = 422, description = "Outside teaching hours or day mismatch")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user = %auth_user.username()))]
pub async fn update_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<LessonId>,
    ValidatedJson(dto): ValidatedJson<UpdateLessonDto>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = LessonService::update_lesson(&state.db, auth_user.viewer()?, id, dto).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    params(("id" = uuid::Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson deleted", body = MessageResponse),
        (status = 403, description = "Not the lesson's teacher"),
        (status = 404, description = "Lesson not found")
    ),
    tag = "Lessons",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(user = %auth_user.username()))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<LessonId>,
) -> Result<Json<MessageResponse>, AppError> {
    LessonService::delete_lesson(&state.db, auth_user.viewer()?, id).await?;
    Ok(Json(MessageResponse::new("Lesson deleted successfully")))
}
