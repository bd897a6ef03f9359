use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Player {
    pub player_id: Uuid,
    pub username: String,
    /// Kept for the documented (not yet applied) ranking tier on earlier registration.
    pub registered_at: chrono::DateTime<chrono::Utc>,
}
