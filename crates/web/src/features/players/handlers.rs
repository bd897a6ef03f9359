use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::{
    Database,
    dto::{
        guess::{DeletedGuessesResponse, PlayerCompetitionSummary},
        player::{CreatePlayerRequest, PlayerResponse, PlayerTotalResponse},
    },
};
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::features::guesses;

use super::services;

#[derive(Debug, Deserialize, IntoParams)]
pub struct PlayerTotalQuery {
    /// Restrict the total to one competition; absent means overall
    pub competition_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/players",
    request_body = CreatePlayerRequest,
    responses(
        (status = 201, description = "Player registered successfully", body = PlayerResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username already taken")
    ),
    tag = "players"
)]
pub async fn register_player(
    State(db): State<Database>,
    Json(req): Json<CreatePlayerRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let player = services::register_player(db.pool(), &req.username).await?;

    Ok((StatusCode::CREATED, Json(PlayerResponse::from(player))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/players/{id}",
    params(
        ("id" = Uuid, Path, description = "Player ID")
    ),
    responses(
        (status = 200, description = "Player found", body = PlayerResponse),
        (status = 404, description = "Player not found")
    ),
    tag = "players"
)]
pub async fn get_player(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerResponse>, WebError> {
    let player = services::get_player(db.pool(), id).await?;

    Ok(Json(PlayerResponse::from(player)))
}

#[utoipa::path(
    get,
    path = "/api/players/{id}/competitions",
    params(
        ("id" = Uuid, Path, description = "Player ID")
    ),
    responses(
        (status = 200, description = "Guessing progress per competition", body = Vec<PlayerCompetitionSummary>),
        (status = 404, description = "Player not found")
    ),
    tag = "players"
)]
pub async fn list_competition_summaries(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PlayerCompetitionSummary>>, WebError> {
    let summaries = services::competition_summaries(db.pool(), id).await?;

    Ok(Json(summaries))
}

#[utoipa::path(
    get,
    path = "/api/players/{id}/total",
    params(
        ("id" = Uuid, Path, description = "Player ID"),
        PlayerTotalQuery
    ),
    responses(
        (status = 200, description = "Total points in the requested scope", body = PlayerTotalResponse),
        (status = 404, description = "Player not found")
    ),
    tag = "players"
)]
pub async fn get_player_total(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Query(query): Query<PlayerTotalQuery>,
) -> Result<Json<PlayerTotalResponse>, WebError> {
    let total_points = services::player_total(db.pool(), id, query.competition_id).await?;

    Ok(Json(PlayerTotalResponse {
        player_id: id,
        competition_id: query.competition_id,
        total_points,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/players/{id}/competitions/{competition_id}/guesses",
    params(
        ("id" = Uuid, Path, description = "Player ID"),
        ("competition_id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Guesses deleted", body = DeletedGuessesResponse),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Prediction deadline has passed")
    ),
    tag = "players"
)]
pub async fn delete_competition_guesses(
    State(db): State<Database>,
    Path((id, competition_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DeletedGuessesResponse>, WebError> {
    let deleted =
        guesses::services::delete_competition_guesses(db.pool(), id, competition_id).await?;

    Ok(Json(DeletedGuessesResponse { deleted }))
}
