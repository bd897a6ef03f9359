use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::leaderboard::{LeaderboardEntry, LeaderboardFilter, PlayerTotals, RankTrend, ScoredGuessRow};
use crate::error::Result;
use crate::repository::leaderboard::LeaderboardRepository;
use crate::services::scoring::EXACT_MATCH_POINTS;

/// Roll scored guesses up to one aggregate per player. Players appear only
/// with at least one qualifying guess; there are no zero-guess rows.
pub fn aggregate(rows: &[ScoredGuessRow]) -> Vec<PlayerTotals> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut totals: HashMap<Uuid, PlayerTotals> = HashMap::new();

    for row in rows {
        let entry = totals.entry(row.player_id).or_insert_with(|| {
            order.push(row.player_id);
            PlayerTotals {
                player_id: row.player_id,
                username: row.username.clone(),
                total_points: 0,
                total_guesses: 0,
                exact_count: 0,
            }
        });

        entry.total_points += i64::from(row.points);
        entry.total_guesses += 1;
        if row.points == EXACT_MATCH_POINTS {
            entry.exact_count += 1;
        }
    }

    order.into_iter().filter_map(|id| totals.remove(&id)).collect()
}

/// Sort aggregates and assign competition ranks: tied key tuples share a
/// rank, and the next distinct tuple gets its 1-based position, so ranks can
/// skip. Tiers are total points, then exact matches, then guesses made, all
/// descending; the sort is stable, so order within a fully tied group is
/// whatever the caller supplied.
pub fn assign_ranks(mut totals: Vec<PlayerTotals>, viewer: Option<Uuid>) -> Vec<LeaderboardEntry> {
    totals.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));

    let mut entries = Vec::with_capacity(totals.len());
    let mut rank = 1i64;

    for (position, row) in totals.iter().enumerate() {
        if position > 0 && row.rank_key() != totals[position - 1].rank_key() {
            rank = position as i64 + 1;
        }

        entries.push(LeaderboardEntry {
            player_id: row.player_id,
            username: row.username.clone(),
            rank,
            total_points: row.total_points,
            total_guesses: row.total_guesses,
            exact_count: row.exact_count,
            avg_points: average_points(row.total_points, row.total_guesses),
            trend: RankTrend::Stable,
            is_current_player: viewer == Some(row.player_id),
        });
    }

    entries
}

fn average_points(total_points: i64, total_guesses: i64) -> f64 {
    if total_guesses == 0 {
        return 0.0;
    }
    let avg = Decimal::from(total_points) / Decimal::from(total_guesses);
    decimal_to_f64(avg.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

fn decimal_to_f64(decimal: Decimal) -> f64 {
    decimal.to_string().parse().unwrap_or(0.0)
}

/// Compute the leaderboard for a filter. An empty row set is an empty
/// leaderboard, never an error. `viewer` only flags that player's row.
pub async fn leaderboard(
    pool: &PgPool,
    filter: &LeaderboardFilter,
    viewer: Option<Uuid>,
) -> Result<Vec<LeaderboardEntry>> {
    let repo = LeaderboardRepository::new(pool);
    let rows = repo.fetch_scored_guesses(filter).await?;

    let entries = assign_ranks(aggregate(&rows), viewer);
    tracing::debug!(players = entries.len(), "calculated leaderboard");

    Ok(entries)
}

/// Total points for one player, across everything or one competition.
/// 0 when nothing qualifies.
pub async fn player_total(
    pool: &PgPool,
    player_id: Uuid,
    competition_id: Option<Uuid>,
) -> Result<i64> {
    let repo = LeaderboardRepository::new(pool);
    repo.sum_points(player_id, competition_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(player: Uuid, username: &str, points: i16) -> ScoredGuessRow {
        ScoredGuessRow {
            player_id: player,
            username: username.to_string(),
            points,
        }
    }

    fn totals(username: &str, points: i64, exact: i64, guesses: i64) -> PlayerTotals {
        PlayerTotals {
            player_id: Uuid::new_v4(),
            username: username.to_string(),
            total_points: points,
            total_guesses: guesses,
            exact_count: exact,
        }
    }

    // --- aggregate ---

    #[test]
    fn aggregates_per_player() {
        let anna = Uuid::new_v4();
        let ben = Uuid::new_v4();
        let rows = vec![
            row(anna, "anna", 3),
            row(ben, "ben", 1),
            row(anna, "anna", 2),
            row(anna, "anna", 3),
        ];

        let mut totals = aggregate(&rows);
        totals.sort_by(|a, b| a.username.cmp(&b.username));

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].username, "anna");
        assert_eq!(totals[0].total_points, 8);
        assert_eq!(totals[0].total_guesses, 3);
        assert_eq!(totals[0].exact_count, 2);
        assert_eq!(totals[1].username, "ben");
        assert_eq!(totals[1].total_points, 1);
        assert_eq!(totals[1].total_guesses, 1);
        assert_eq!(totals[1].exact_count, 0);
    }

    #[test]
    fn zero_point_guesses_still_count_as_guesses() {
        let anna = Uuid::new_v4();
        let rows = vec![row(anna, "anna", 0), row(anna, "anna", 0)];

        let totals = aggregate(&rows);
        assert_eq!(totals[0].total_points, 0);
        assert_eq!(totals[0].total_guesses, 2);
        assert_eq!(totals[0].exact_count, 0);
    }

    #[test]
    fn no_rows_aggregate_to_nothing() {
        assert!(aggregate(&[]).is_empty());
    }

    // --- assign_ranks ---

    #[test]
    fn ranks_strictly_by_total_points() {
        let entries = assign_ranks(
            vec![
                totals("charlie", 2, 0, 2),
                totals("alice", 6, 2, 2),
                totals("bob", 4, 0, 2),
            ],
            None,
        );

        assert_eq!(entries[0].username, "alice");
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].username, "bob");
        assert_eq!(entries[1].rank, 2);
        assert_eq!(entries[2].username, "charlie");
        assert_eq!(entries[2].rank, 3);
    }

    #[test]
    fn exact_matches_break_point_ties() {
        let entries = assign_ranks(
            vec![totals("without", 6, 0, 3), totals("with", 6, 2, 3)],
            None,
        );

        assert_eq!(entries[0].username, "with");
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].username, "without");
        assert_eq!(entries[1].rank, 2);
    }

    #[test]
    fn guess_count_breaks_remaining_ties() {
        let entries = assign_ranks(
            vec![totals("fewer", 5, 1, 2), totals("more", 5, 1, 3)],
            None,
        );

        assert_eq!(entries[0].username, "more");
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].username, "fewer");
        assert_eq!(entries[1].rank, 2);
    }

    #[test]
    fn full_ties_share_a_rank_and_later_ranks_skip() {
        let entries = assign_ranks(
            vec![
                totals("tied_a", 6, 1, 2),
                totals("tied_b", 6, 1, 2),
                totals("third", 4, 0, 2),
                totals("fourth", 3, 0, 2),
            ],
            None,
        );

        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].rank, 1);
        // rank 2 is skipped by the tie group
        assert_eq!(entries[2].rank, 3);
        assert_eq!(entries[3].rank, 4);
    }

    #[test]
    fn every_rank_is_at_least_one() {
        let entries = assign_ranks(
            vec![totals("a", 0, 0, 1), totals("b", 0, 0, 1)],
            None,
        );
        assert!(entries.iter().all(|e| e.rank >= 1));
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].rank, 1);
    }

    #[test]
    fn viewer_row_is_flagged_without_filtering() {
        let viewer = totals("me", 2, 0, 1);
        let viewer_id = viewer.player_id;
        let entries = assign_ranks(vec![totals("other", 5, 0, 2), viewer], Some(viewer_id));

        assert_eq!(entries.len(), 2);
        assert!(!entries[0].is_current_player);
        assert!(entries[1].is_current_player);
    }

    #[test]
    fn empty_input_ranks_to_empty_output() {
        assert!(assign_ranks(Vec::new(), None).is_empty());
    }

    #[test]
    fn trend_reports_stable_for_everyone() {
        let entries = assign_ranks(vec![totals("a", 5, 1, 2)], None);
        assert_eq!(entries[0].trend, RankTrend::Stable);
    }

    // --- average_points ---

    #[test]
    fn average_is_rounded_to_two_decimals_half_up() {
        // 5 / 3 = 1.666... rounds to 1.67
        assert_eq!(average_points(5, 3), 1.67);
        // 1 / 8 = 0.125 rounds half-up to 0.13
        assert_eq!(average_points(1, 8), 0.13);
        assert_eq!(average_points(6, 2), 3.0);
        assert_eq!(average_points(0, 0), 0.0);
    }

    #[test]
    fn ranked_entries_carry_the_average() {
        let entries = assign_ranks(vec![totals("anna", 5, 1, 3)], None);
        assert_eq!(entries[0].avg_points, 1.67);
    }
}
