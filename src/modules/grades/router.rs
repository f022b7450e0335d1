use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{create_grade, get_grades};

pub fn init_grades_router() -> Router<AppState> {
    Router::new().route("/", post(create_grade).get(get_grades))
}
