use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Guess {
    pub guess_id: Uuid,
    pub player_id: Uuid,
    pub entry_id: Uuid,
    pub predicted: Decimal,
    pub points: Option<i16>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub points_updated_at: Option<DateTime<Utc>>,
}

/// Scoring state of a guess. A bare nullable column cannot distinguish
/// "scored 0" from "never scored", and scoring logic also needs to know when
/// stored points predate the currently recorded actual value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PointsState {
    #[default]
    Unscored,
    Scored(i16),
    /// Points were computed against an actual value that has since been
    /// re-recorded. Still counts as scored until the next recomputation
    /// overwrites it.
    Stale(i16),
}

impl PointsState {
    pub fn classify(
        points: Option<i16>,
        points_updated_at: Option<DateTime<Utc>>,
        actual_recorded_at: Option<DateTime<Utc>>,
    ) -> Self {
        match (points, points_updated_at, actual_recorded_at) {
            (None, _, _) => Self::Unscored,
            (Some(p), Some(scored_at), Some(recorded_at)) if scored_at < recorded_at => {
                Self::Stale(p)
            }
            (Some(p), _, _) => Self::Scored(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 14, hour, 0, 0).unwrap()
    }

    #[test]
    fn null_points_are_unscored() {
        assert_eq!(
            PointsState::classify(None, None, Some(at(10))),
            PointsState::Unscored
        );
    }

    #[test]
    fn zero_points_are_scored_not_unscored() {
        assert_eq!(
            PointsState::classify(Some(0), Some(at(11)), Some(at(10))),
            PointsState::Scored(0)
        );
    }

    #[test]
    fn points_older_than_actual_are_stale() {
        assert_eq!(
            PointsState::classify(Some(2), Some(at(10)), Some(at(12))),
            PointsState::Stale(2)
        );
    }
}
