use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    check_availability, create_lesson, create_recurring_lessons, delete_lesson, get_lesson,
    get_lessons, update_lesson,
};

pub fn init_lessons_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lesson).get(get_lessons))
        .route("/recurring", post(create_recurring_lessons))
        .route("/availability", get(check_availability))
        .route(
            "/{id}",
            get(get_lesson).put(update_lesson).delete(delete_lesson),
        )
}
