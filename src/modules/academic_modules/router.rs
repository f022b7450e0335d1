use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    create_holiday, create_module, delete_holiday, delete_module, get_holidays, get_module,
    get_modules, update_module,
};

pub fn init_academic_modules_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_module).get(get_modules))
        .route(
            "/{id}",
            get(get_module).put(update_module).delete(delete_module),
        )
        .route("/{id}/holidays", get(get_holidays).post(create_holiday))
        .route("/{id}/holidays/{holiday_id}", delete(delete_holiday))
}
