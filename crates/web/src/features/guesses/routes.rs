use axum::{
    Router,
    routing::{delete, post},
};
use storage::Database;

use super::handlers::{delete_guess, submit_guess};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", post(submit_guess))
        .route("/:player_id/:entry_id", delete(delete_guess))
}
