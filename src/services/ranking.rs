use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::{
    db::WardrobeRepository,
    error::{AppError, AppResult},
    models::{LeaderboardEntry, RankedWardrobe, RankingUpdateResponse, WardrobeSummary},
};

/// Largest leaderboard page a caller may ask for
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Orders wardrobes into a leaderboard by item count
///
/// Sorting is stable, so wardrobes with equal item counts keep their input
/// order. Position is 1-based and the score falls linearly from 100 for the
/// first wardrobe in steps of `100 / N`, rounded to 2 decimals.
pub fn rank(wardrobes: &[WardrobeSummary]) -> Vec<RankedWardrobe> {
    let mut ordered: Vec<&WardrobeSummary> = wardrobes.iter().collect();
    ordered.sort_by(|a, b| b.item_count.cmp(&a.item_count));

    let total = ordered.len() as f64;

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, wardrobe)| {
            let raw = 100.0 - (index as f64 / total * 100.0);
            RankedWardrobe {
                id: wardrobe.id,
                user_id: wardrobe.user_id,
                item_count: wardrobe.item_count,
                ranking_position: index as i32 + 1,
                ranking_score: (raw * 100.0).round() / 100.0,
            }
        })
        .collect()
}

/// Recomputes every wardrobe's ranking and persists it
///
/// Runs against a snapshot: items added while the batch runs are picked up
/// by the next run.
pub async fn update_rankings(
    repository: Arc<dyn WardrobeRepository>,
) -> AppResult<RankingUpdateResponse> {
    let start = Instant::now();

    let wardrobes = repository.wardrobe_summaries().await?;
    tracing::info!(wardrobes = wardrobes.len(), "Starting ranking update");

    let rankings = rank(&wardrobes);
    let updated_at = Utc::now();

    if !rankings.is_empty() {
        repository.save_rankings(&rankings, updated_at).await?;
    }

    tracing::info!(
        updated = rankings.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Ranking update completed"
    );

    Ok(RankingUpdateResponse {
        updated: rankings.len(),
        top: rankings.into_iter().next(),
        updated_at,
    })
}

/// Reads the persisted leaderboard
pub async fn leaderboard(
    repository: Arc<dyn WardrobeRepository>,
    limit: i64,
) -> AppResult<Vec<LeaderboardEntry>> {
    if !(1..=MAX_LEADERBOARD_LIMIT).contains(&limit) {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_LEADERBOARD_LIMIT
        )));
    }

    repository.leaderboard(limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockWardrobeRepository;
    use uuid::Uuid;

    fn wardrobes(counts: &[i64]) -> Vec<WardrobeSummary> {
        counts
            .iter()
            .map(|&item_count| WardrobeSummary {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                item_count,
            })
            .collect()
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&[]).is_empty());
    }

    #[test]
    fn test_rank_single_wardrobe() {
        let input = wardrobes(&[0]);
        let ranked = rank(&input);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].ranking_position, 1);
        assert_eq!(ranked[0].ranking_score, 100.0);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let input = wardrobes(&[10, 5, 5]);
        let ranked = rank(&input);

        let positions: Vec<i32> = ranked.iter().map(|r| r.ranking_position).collect();
        let scores: Vec<f64> = ranked.iter().map(|r| r.ranking_score).collect();
        let ids: Vec<Uuid> = ranked.iter().map(|r| r.id).collect();

        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(scores, vec![100.0, 66.67, 33.33]);
        assert_eq!(ids, vec![input[0].id, input[1].id, input[2].id]);
    }

    #[test]
    fn test_rank_sorts_descending() {
        let input = wardrobes(&[1, 7, 3, 7]);
        let ranked = rank(&input);

        assert_eq!(ranked[0].id, input[1].id);
        assert_eq!(ranked[1].id, input[3].id);
        assert_eq!(ranked[2].id, input[2].id);
        assert_eq!(ranked[3].id, input[0].id);
        assert_eq!(ranked[3].ranking_score, 25.0);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let input = wardrobes(&[4, 9, 4, 0, 12]);
        assert_eq!(rank(&input), rank(&input));
    }

    #[test]
    fn test_rank_score_formula() {
        let input = wardrobes(&[5, 4, 3, 2, 1, 0, 9]);
        let ranked = rank(&input);
        let n = ranked.len() as f64;

        for r in &ranked {
            let expected =
                ((100.0 - (r.ranking_position - 1) as f64 / n * 100.0) * 100.0).round() / 100.0;
            assert_eq!(r.ranking_score, expected);
        }
    }

    #[tokio::test]
    async fn test_update_rankings_persists_ranked_rows() {
        let input = wardrobes(&[2, 8]);
        let expected_top = input[1].id;

        let mut repository = MockWardrobeRepository::new();
        let summaries = input.clone();
        repository
            .expect_wardrobe_summaries()
            .times(1)
            .returning(move || Ok(summaries.clone()));
        repository
            .expect_save_rankings()
            .withf(move |rankings, _| {
                rankings.len() == 2 && rankings[0].id == expected_top
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let response = update_rankings(Arc::new(repository)).await.unwrap();

        assert_eq!(response.updated, 2);
        assert_eq!(response.top.unwrap().id, expected_top);
    }

    #[tokio::test]
    async fn test_update_rankings_with_no_wardrobes_skips_save() {
        let mut repository = MockWardrobeRepository::new();
        repository
            .expect_wardrobe_summaries()
            .returning(|| Ok(Vec::new()));
        repository.expect_save_rankings().never();

        let response = tokio_test::assert_ok!(update_rankings(Arc::new(repository)).await);
        assert_eq!(response.updated, 0);
        assert!(response.top.is_none());
    }

    #[tokio::test]
    async fn test_leaderboard_rejects_bad_limit() {
        let repository = MockWardrobeRepository::new();
        let result = leaderboard(Arc::new(repository), 0).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
