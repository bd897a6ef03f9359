use axum::{
    Router,
    routing::{delete, get, post},
};
use storage::Database;

use super::handlers::{
    delete_competition_guesses, get_player, get_player_total, list_competition_summaries,
    register_player,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", post(register_player))
        .route("/:id", get(get_player))
        .route("/:id/competitions", get(list_competition_summaries))
        .route("/:id/total", get(get_player_total))
        .route(
            "/:id/competitions/:competition_id/guesses",
            delete(delete_competition_guesses),
        )
}
