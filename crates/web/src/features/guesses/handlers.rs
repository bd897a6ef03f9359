use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::guess::SubmitGuessRequest, models::Guess};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/guesses",
    request_body = SubmitGuessRequest,
    responses(
        (status = 200, description = "Guess saved (new or replaced)", body = Guess),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Prediction deadline has passed")
    ),
    tag = "guesses"
)]
pub async fn submit_guess(
    State(db): State<Database>,
    Json(req): Json<SubmitGuessRequest>,
) -> Result<Json<Guess>, WebError> {
    req.validate()?;

    let guess = services::submit_guess(db.pool(), &req).await?;

    Ok(Json(guess))
}

#[utoipa::path(
    delete,
    path = "/api/guesses/{player_id}/{entry_id}",
    params(
        ("player_id" = Uuid, Path, description = "Player ID"),
        ("entry_id" = Uuid, Path, description = "Entry ID")
    ),
    responses(
        (status = 204, description = "Guess deleted"),
        (status = 404, description = "Guess not found"),
        (status = 409, description = "Prediction deadline has passed")
    ),
    tag = "guesses"
)]
pub async fn delete_guess(
    State(db): State<Database>,
    Path((player_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    services::delete_guess(db.pool(), player_id, entry_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
