use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;

use config::Config;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::competitions::handlers::list_competitions,
        features::competitions::handlers::list_open_competitions,
        features::competitions::handlers::get_competition,
        features::competitions::handlers::create_competition,
        features::competitions::handlers::list_entries,
        features::competitions::handlers::rescore_competition,
        features::competitions::handlers::rescore_entry,
        features::competitions::handlers::record_actual,
        features::catalog::handlers::list_athletes,
        features::catalog::handlers::list_disciplines,
        features::guesses::handlers::submit_guess,
        features::guesses::handlers::delete_guess,
        features::leaderboard::handlers::get_leaderboard,
        features::players::handlers::register_player,
        features::players::handlers::get_player,
        features::players::handlers::list_competition_summaries,
        features::players::handlers::get_player_total,
        features::players::handlers::delete_competition_guesses,
    ),
    components(
        schemas(
            storage::dto::competition::CreateCompetitionRequest,
            storage::dto::competition::RecordActualRequest,
            storage::dto::competition::CompetitionResponse,
            storage::dto::competition::RescoreResponse,
            storage::dto::guess::SubmitGuessRequest,
            storage::dto::guess::EntryWithGuess,
            storage::dto::guess::PlayerCompetitionSummary,
            storage::dto::guess::DeletedGuessesResponse,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::RankTrend,
            storage::dto::player::CreatePlayerRequest,
            storage::dto::player::PlayerResponse,
            storage::dto::player::PlayerTotalResponse,
            storage::models::Competition,
            storage::models::CompetitionStatus,
            storage::models::Entry,
            storage::models::Guess,
            storage::models::PointsState,
            storage::models::Player,
            storage::models::Athlete,
            storage::models::Discipline,
        )
    ),
    tags(
        (name = "competitions", description = "Competition and entry endpoints"),
        (name = "catalog", description = "Athlete and discipline reference data"),
        (name = "guesses", description = "Guess submission endpoints"),
        (name = "leaderboard", description = "Ranking endpoints"),
        (name = "players", description = "Player endpoints"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting score prediction API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/competitions", features::competitions::routes())
        .nest("/api/entries", features::competitions::entry_routes())
        .nest("/api/athletes", features::catalog::athlete_routes())
        .nest("/api/disciplines", features::catalog::discipline_routes())
        .nest("/api/guesses", features::guesses::routes())
        .nest("/api/leaderboard", features::leaderboard::routes())
        .nest("/api/players", features::players::routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(db);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await?;

    Ok(())
}
