use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_exam, delete_exam, get_exam, get_exams, update_exam,
};

pub fn init_exams_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_exam).get(get_exams))
        .route(
            "/{id}",
            get(get_exam).put(update_exam).delete(delete_exam),
        )
}
