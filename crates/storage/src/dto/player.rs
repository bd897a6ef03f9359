use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::Player;

/// Request payload for registering a player
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePlayerRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username must be between 3 and 50 characters"
    ))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,
}

fn validate_username(value: &str) -> Result<(), ValidationError> {
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        let mut err = ValidationError::new("username_charset");
        err.message =
            Some("Username may only contain letters, digits, underscores and hyphens".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerResponse {
    pub player_id: Uuid,
    pub username: String,
    pub registered_at: DateTime<Utc>,
}

impl From<Player> for PlayerResponse {
    fn from(player: Player) -> Self {
        Self {
            player_id: player.player_id,
            username: player.username,
            registered_at: player.registered_at,
        }
    }
}

/// Total points a player has collected in a scope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerTotalResponse {
    pub player_id: Uuid,
    pub competition_id: Option<Uuid>,
    pub total_points: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_allow_word_chars() {
        assert!(validate_username("anna_k-99").is_ok());
    }

    #[test]
    fn usernames_reject_spaces_and_symbols() {
        assert!(validate_username("anna k").is_err());
        assert!(validate_username("anna@k").is_err());
    }
}
