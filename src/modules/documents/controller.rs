use axum::{
    extract::{Path, State},
    response::Response,
};
use tracing::instrument;

use scholaris_core::AppError;
use scholaris_models::StudentId;

use crate::middleware::role::RequireAdmin;
use crate::modules::documents::model::{
    AbsenceReportRequest, CertificateRequest, TranscriptRequest,
};
use crate::modules::documents::service::{DocumentService, GeneratedDocument};
use crate::state::AppState;
use crate::utils::{attachment, download};
use crate::validator::ValidatedJson;

fn pdf(document: GeneratedDocument) -> Response {
    attachment(download::PDF, &document.filename, document.bytes)
}

#[utoipa::path(
    post,
    path = "/api/documents/students/{id}/certificate",
    params(("id" = uuid::Uuid, Path, description = "Student ID")),
    request_body = CertificateRequest,
    responses(
        (status = 200, description = "Enrolment certificate", content_type = "application/pdf", body = Vec<u8>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn generate_certificate(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<StudentId>,
    ValidatedJson(request): ValidatedJson<CertificateRequest>,
) -> Result<Response, AppError> {
    let document =
        DocumentService::certificate(&state.db, state.school_header(), id, request).await?;
    Ok(pdf(document))
}

#[utoipa::path(
    post,
    path = "/api/documents/students/{id}/transcript",
    params(("id" = uuid::Uuid, Path, description = "Student ID")),
    request_body = TranscriptRequest,
    responses(
        (status = 200, description = "Transcript of records", content_type = "application/pdf", body = Vec<u8>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn generate_transcript(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<StudentId>,
    ValidatedJson(request): ValidatedJson<TranscriptRequest>,
) -> Result<Response, AppError> {
    let document =
        DocumentService::transcript(&state.db, state.school_header(), id, request).await?;
    Ok(pdf(document))
}

#[utoipa::path(
    post,
    path = "/api/documents/students/{id}/absence-report",
    params(("id" = uuid::Uuid, Path, description = "Student ID")),
    request_body = AbsenceReportRequest,
    responses(
        (status = 200, description = "Monthly absence report", content_type = "application/pdf", body = Vec<u8>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Student not found"),
        (status = 422, description = "Invalid month")
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn generate_absence_report(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<StudentId>,
    ValidatedJson(request): ValidatedJson<AbsenceReportRequest>,
) -> Result<Response, AppError> {
    let document =
        DocumentService::absence_report(&state.db, state.school_header(), id, request).await?;
    Ok(pdf(document))
}
