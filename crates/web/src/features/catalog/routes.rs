use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{list_athletes, list_disciplines};

pub fn athlete_routes() -> Router<Database> {
    Router::new().route("/", get(list_athletes))
}

pub fn discipline_routes() -> Router<Database> {
    Router::new().route("/", get(list_disciplines))
}
