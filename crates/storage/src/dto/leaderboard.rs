use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Optional restrictions on which guesses feed the leaderboard. Absent fields
/// impose no constraint; present fields combine with AND.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct LeaderboardFilter {
    pub competition_id: Option<Uuid>,
    pub discipline_id: Option<Uuid>,
    pub gender: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl LeaderboardFilter {
    pub fn for_competition(competition_id: Uuid) -> Self {
        Self {
            competition_id: Some(competition_id),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref gender) = self.gender
            && gender != "M"
            && gender != "F"
        {
            return Err("gender must be 'M' or 'F'".to_string());
        }

        if let (Some(from), Some(to)) = (self.date_from, self.date_to)
            && from > to
        {
            return Err("date_from must not be after date_to".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardQuery {
    #[serde(flatten)]
    pub filter: LeaderboardFilter,
    /// Marks this player's row with `is_current_player`; never filters rows.
    pub player_id: Option<Uuid>,
}

/// Movement of a player's rank versus a previous period. Computing it needs
/// stored rank history per competition, which does not exist yet, so every
/// row currently reports `stable`.
///
/// TODO: snapshot ranks per competition so up/down/new can be derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RankTrend {
    Up,
    Down,
    #[default]
    Stable,
    New,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub player_id: Uuid,
    pub username: String,
    pub rank: i64,
    pub total_points: i64,
    pub total_guesses: i64,
    pub exact_count: i64,
    pub avg_points: f64,
    pub trend: RankTrend,
    pub is_current_player: bool,
}

/// One scored guess as fetched for aggregation: the entry's actual value is
/// recorded and points have been assigned.
#[derive(Debug, Clone, FromRow)]
pub struct ScoredGuessRow {
    pub player_id: Uuid,
    pub username: String,
    pub points: i16,
}

/// Per-player aggregate, not yet ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTotals {
    pub player_id: Uuid,
    pub username: String,
    pub total_points: i64,
    pub total_guesses: i64,
    pub exact_count: i64,
}

impl PlayerTotals {
    /// Sort key for ranking, all tiers descending. The next documented tier,
    /// earlier registration first, is not applied yet.
    pub fn rank_key(&self) -> (i64, i64, i64) {
        (self.total_points, self.exact_count, self.total_guesses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_validate() {
        assert!(LeaderboardFilter::default().validate().is_ok());
    }

    #[test]
    fn competition_shortcut_sets_only_that_dimension() {
        let id = Uuid::new_v4();
        let filter = LeaderboardFilter::for_competition(id);
        assert_eq!(filter.competition_id, Some(id));
        assert!(filter.discipline_id.is_none());
        assert!(filter.gender.is_none());
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn gender_must_be_m_or_f() {
        let filter = LeaderboardFilter {
            gender: Some("X".to_string()),
            ..LeaderboardFilter::default()
        };
        assert!(filter.validate().is_err());

        let filter = LeaderboardFilter {
            gender: Some("F".to_string()),
            ..LeaderboardFilter::default()
        };
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let filter = LeaderboardFilter {
            date_from: Some(chrono::Utc::now()),
            date_to: Some(chrono::Utc::now() - chrono::Duration::days(1)),
            ..LeaderboardFilter::default()
        };
        assert!(filter.validate().is_err());
    }
}
