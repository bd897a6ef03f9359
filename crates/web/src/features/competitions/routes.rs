use axum::{
    Router,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{
    create_competition, get_competition, list_competitions, list_entries, list_open_competitions,
    record_actual, rescore_competition, rescore_entry,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_competitions))
        .route("/", post(create_competition))
        .route("/open", get(list_open_competitions))
        .route("/:id", get(get_competition))
        .route("/:id/entries", get(list_entries))
        .route("/:id/rescore", post(rescore_competition))
}

pub fn entry_routes() -> Router<Database> {
    Router::new()
        .route("/:id/actual", put(record_actual))
        .route("/:id/rescore", post(rescore_entry))
}
