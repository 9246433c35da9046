use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{LeaderboardEntry, RankedWardrobe, WardrobeItem, WardrobeSummary},
};

/// Storage access for wardrobes and their items
///
/// The recommendation engine and the ranking updater only ever see
/// snapshots returned from here; they never touch storage themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WardrobeRepository: Send + Sync {
    /// All items owned by a user
    async fn wardrobe_items(&self, user_id: Uuid) -> AppResult<Vec<WardrobeItem>>;

    /// Every wardrobe with its item count, in creation order
    async fn wardrobe_summaries(&self) -> AppResult<Vec<WardrobeSummary>>;

    /// Writes ranking position and score for each wardrobe
    async fn save_rankings(
        &self,
        rankings: &[RankedWardrobe],
        updated_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Ranked wardrobes ordered by position
    async fn leaderboard(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>>;
}

#[derive(Debug, Clone)]
struct StoredWardrobe {
    id: Uuid,
    user_id: Uuid,
    ranking_position: Option<i32>,
    ranking_score: f64,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    wardrobes: Vec<StoredWardrobe>,
    items: Vec<WardrobeItem>,
}

/// Process-local repository for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryWardrobeRepository {
    inner: Arc<RwLock<InMemoryState>>,
}

impl InMemoryWardrobeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a wardrobe for a user and returns its id
    pub async fn add_wardrobe(&self, user_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        let mut inner = self.inner.write().await;
        inner.wardrobes.push(StoredWardrobe {
            id,
            user_id,
            ranking_position: None,
            ranking_score: 0.0,
            updated_at: Utc::now(),
        });
        id
    }

    pub async fn add_item(&self, item: WardrobeItem) {
        let mut inner = self.inner.write().await;
        inner.items.push(item);
    }
}

#[async_trait::async_trait]
impl WardrobeRepository for InMemoryWardrobeRepository {
    async fn wardrobe_items(&self, user_id: Uuid) -> AppResult<Vec<WardrobeItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .iter()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn wardrobe_summaries(&self) -> AppResult<Vec<WardrobeSummary>> {
        let inner = self.inner.read().await;
        Ok(inner
            .wardrobes
            .iter()
            .map(|wardrobe| WardrobeSummary {
                id: wardrobe.id,
                user_id: wardrobe.user_id,
                item_count: inner
                    .items
                    .iter()
                    .filter(|item| item.user_id == wardrobe.user_id)
                    .count() as i64,
            })
            .collect())
    }

    async fn save_rankings(
        &self,
        rankings: &[RankedWardrobe],
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        for ranked in rankings {
            match inner.wardrobes.iter_mut().find(|w| w.id == ranked.id) {
                Some(wardrobe) => {
                    wardrobe.ranking_position = Some(ranked.ranking_position);
                    wardrobe.ranking_score = ranked.ranking_score;
                    wardrobe.updated_at = updated_at;
                }
                None => {
                    tracing::warn!(wardrobe_id = %ranked.id, "Ranked wardrobe no longer exists");
                }
            }
        }
        Ok(())
    }

    async fn leaderboard(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<LeaderboardEntry> = inner
            .wardrobes
            .iter()
            .filter_map(|w| {
                w.ranking_position.map(|position| LeaderboardEntry {
                    wardrobe_id: w.id,
                    user_id: w.user_id,
                    ranking_position: position,
                    ranking_score: w.ranking_score,
                    updated_at: w.updated_at,
                })
            })
            .collect();
        entries.sort_by_key(|e| e.ranking_position);
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }
}
