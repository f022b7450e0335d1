use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use scholaris_core::AppError;
use scholaris_models::{HolidayId, MessageResponse, ModuleId};

use crate::middleware::role::RequireAdmin;
use crate::modules::academic_modules::model::{
    AcademicModule, CreateHolidayDto, CreateModuleDto, Holiday, ModuleWithHolidays,
    UpdateModuleDto,
};
use crate::modules::academic_modules::service::AcademicModuleService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/modules",
    request_body = CreateModuleDto,
    responses(
        (status = 201, description = "Module created", body = ModuleWithHolidays),
        (status = 403, description = "Admins only"),
        (status = 409, description = "Module name already exists"),
        (status = 422, description = "End date before start date")
    ),
    tag = "Academic modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_module(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateModuleDto>,
) -> Result<(StatusCode, Json<ModuleWithHolidays>), AppError> {
    let module = AcademicModuleService::create_module(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

#[utoipa::path(
    get,
    path = "/api/modules",
    responses(
        (status = 200, description = "Modules ordered by start date", body = Vec<AcademicModule>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Academic modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_modules(
    State(state): State<AppState>,
) -> Result<Json<Vec<AcademicModule>>, AppError> {
    let modules = AcademicModuleService::get_modules(&state.db).await?;
    Ok(Json(modules))
}

#[utoipa::path(
    get,
    path = "/api/modules/{id}",
    params(("id" = uuid::Uuid, Path, description = "Module ID")),
    responses(
        (status = 200, description = "Module with holidays", body = ModuleWithHolidays),
        (status = 404, description = "Module not found")
    ),
    tag = "Academic modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_module(
    State(state): State<AppState>,
    Path(id): Path<ModuleId>,
) -> Result<Json<ModuleWithHolidays>, AppError> {
    let module = AcademicModuleService::get_module(&state.db, id).await?;
    Ok(Json(module))
}

#[utoipa::path(
    put,
    path = "/api/modules/{id}",
    params(("id" = uuid::Uuid, Path, description = "Module ID")),
    request_body = UpdateModuleDto,
    responses(
        (status = 200, description = "Module updated", body = ModuleWithHolidays),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Module not found"),
        (status = 422, description = "Invalid range or holidays left outside it")
    ),
    tag = "Academic modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_module(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ModuleId>,
    ValidatedJson(dto): ValidatedJson<UpdateModuleDto>,
) -> Result<Json<ModuleWithHolidays>, AppError> {
    let module = AcademicModuleService::update_module(&state.db, id, dto).await?;
    Ok(Json(module))
}

#[utoipa::path(
    delete,
    path = "/api/modules/{id}",
    params(("id" = uuid::Uuid, Path, description = "Module ID")),
    responses(
        (status = 200, description = "Module deleted", body = MessageResponse),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Module not found")
    ),
    tag = "Academic modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_module(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ModuleId>,
) -> Result<Json<MessageResponse>, AppError> {
    AcademicModuleService::delete_module(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Module deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/modules/{id}/holidays",
    params(("id" = uuid::Uuid, Path, description = "Module ID")),
    responses(
        (status = 200, description = "Holidays ordered by date", body = Vec<Holiday>),
        (status = 404, description = "Module not found")
    ),
    tag = "Academic modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_holidays(
    State(state): State<AppState>,
    Path(id): Path<ModuleId>,
) -> Result<Json<Vec<Holiday>>, AppError> {
    let holidays = AcademicModuleService::get_holidays(&state.db, id).await?;
    Ok(Json(holidays))
}

#[utoipa::path(
    post,
    path = "/api/modules/{id}/holidays",
    params(("id" = uuid::Uuid, Path, description = "Module ID")),
    request_body = CreateHolidayDto,
    responses(
        (status = 201, description = "Holiday added", body = Holiday),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Module not found"),
        (status = 409, description = "The module already has a holiday on that date"),
        (status = 422, description = "Date outside the module")
    ),
    tag = "Academic modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_holiday(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ModuleId>,
    ValidatedJson(dto): ValidatedJson<CreateHolidayDto>,
) -> Result<(StatusCode, Json<Holiday>), AppError> {
    let holiday = AcademicModuleService::create_holiday(&state.db, id, dto).await?;
    Ok((StatusCode::CREATED, Json(holiday)))
}

#[utoipa::path(
    delete,
    path = "/api/modules/{id}/holidays/{holiday_id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Module ID"),
        ("holiday_id" = uuid::Uuid, Path, description = "Holiday ID")
    ),
    responses(
        (status = 200, description = "Holiday removed", body = MessageResponse),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Holiday not found")
    ),
    tag = "Academic modules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_holiday(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((id, holiday_id)): Path<(ModuleId, HolidayId)>,
) -> Result<Json<MessageResponse>, AppError> {
    AcademicModuleService::delete_holiday(&state.db, id, holiday_id).await?;
    Ok(Json(MessageResponse::new("Holiday deleted successfully")))
}
