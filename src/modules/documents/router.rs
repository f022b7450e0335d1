use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{generate_absence_report, generate_certificate, generate_transcript};

pub fn init_documents_router() -> Router<AppState> {
    Router::new()
        .route("/students/{id}/certificate", post(generate_certificate))
        .route("/students/{id}/transcript", post(generate_transcript))
        .route("/students/{id}/absence-report", post(generate_absence_report))
}
