use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use scholaris_observability::{logging_middleware, metrics_middleware};

use crate::docs::ApiDoc;
use crate::middleware::role::{require_admin, require_auth, require_staff};
use crate::modules::{
    academic_modules::init_academic_modules_router, announcements::init_announcements_router,
    assignments::init_assignments_router, attendance::init_attendance_router,
    auth::init_auth_router, classes::init_classes_router, documents::init_documents_router,
    events::init_events_router, exams::init_exams_router, grades::init_grades_router,
    lessons::init_lessons_router, parents::init_parents_router, results::init_results_router,
    students::init_students_router, subjects::init_subjects_router,
    teachers::init_teachers_router,
};
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_DISPOSITION])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let any_user = || middleware::from_fn_with_state(state.clone(), require_auth);
    let staff = || middleware::from_fn_with_state(state.clone(), require_staff);
    let admin = || middleware::from_fn_with_state(state.clone(), require_admin);

    let api = Router::new()
        .nest("/auth", init_auth_router())
        .nest("/teachers", init_teachers_router().route_layer(staff()))
        .nest("/students", init_students_router().route_layer(staff()))
        .nest("/parents", init_parents_router().route_layer(staff()))
        .nest("/grades", init_grades_router().route_layer(any_user()))
        .nest("/classes", init_classes_router().route_layer(staff()))
        .nest("/subjects", init_subjects_router().route_layer(staff()))
        .nest(
            "/modules",
            init_academic_modules_router().route_layer(any_user()),
        )
        .nest("/lessons", init_lessons_router().route_layer(any_user()))
        .nest("/exams", init_exams_router().route_layer(any_user()))
        .nest("/assignments", init_assignments_router().route_layer(any_user()))
        .nest("/results", init_results_router().route_layer(any_user()))
        .nest("/attendance", init_attendance_router().route_layer(any_user()))
        .nest("/events", init_events_router().route_layer(any_user()))
        .nest(
            "/announcements",
            init_announcements_router().route_layer(any_user()),
        )
        .nest("/documents", init_documents_router().route_layer(admin()));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
