use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use scholaris_core::AppError;
use scholaris_models::{MessageResponse, ParentId};

use crate::middleware::role::RequireAdmin;
use crate::modules::parents::model::{
    CreateParentDto, PaginatedParentsResponse, Parent, ParentFilterParams, UpdateParentDto,
};
use crate::modules::parents::service::ParentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/parents",
    request_body = CreateParentDto,
    responses(
        (status = 201, description = "Parent created", body = Parent),
        (status = 403, description = "Admins only"),
        (status = 409, description = "Username, email or phone already taken"),
        (status = 422, description = "Validation error")
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_parent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateParentDto>,
) -> Result<(StatusCode, Json<Parent>), AppError> {
    let parent = ParentService::create_parent(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(parent)))
}

#[utoipa::path(
    get,
    path = "/api/parents",
    params(ParentFilterParams),
    responses(
        (status = 200, description = "Paginated parents", body = PaginatedParentsResponse),
        (status = 403, description = "Staff only")
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_parents(
    State(state): State<AppState>,
    Query(filters): Query<ParentFilterParams>,
) -> Result<Json<PaginatedParentsResponse>, AppError> {
    let parents = ParentService::get_parents(&state.db, filters).await?;
    Ok(Json(parents))
}

#[utoipa::path(
    get,
    path = "/api/parents/{id}",
    params(("id" = uuid::Uuid, Path, description = "Parent ID")),
    responses(
        (status = 200, description = "Parent details", body = Parent),
        (status = 404, description = "Parent not found")
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_parent(
    State(state): State<AppState>,
    Path(id): Path<ParentId>,
) -> Result<Json<Parent>, AppError> {
    let parent = ParentService::get_parent(&state.db, id).await?;
    Ok(Json(parent))
}

#[utoipa::path(
    put,
    path = "/api/parents/{id}",
    params(("id" = uuid::Uuid, Path, description = "Parent ID")),
    request_body = UpdateParentDto,
    responses(
        (status = 200, description = "Parent updated", body = Parent),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Parent not found"),
        (status = 409, description = "Username, email or phone already taken")
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_parent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ParentId>,
    ValidatedJson(dto): ValidatedJson<UpdateParentDto>,
) -> Result<Json<Parent>, AppError> {
    let parent = ParentService::update_parent(&state.db, id, dto).await?;
    Ok(Json(parent))
}

#[utoipa::path(
    delete,
    path = "/api/parents/{id}",
    params(("id" = uuid::Uuid, Path, description = "Parent ID")),
    responses(
        (status = 200, description = "Parent deleted", body = MessageResponse),
        (status = 400, description = "Parent still has enrolled students"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Parent not found")
    ),
    tag = "Parents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_parent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ParentId>,
) -> Result<Json<MessageResponse>, AppError> {
    ParentService::delete_parent(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Parent deleted successfully")))
}
