use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::WardrobeRepository,
    error::AppResult,
    models::{Category, LeaderboardEntry, RankedWardrobe, WardrobeItem, WardrobeSummary},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Raw `wardrobe_items` row; category and season are stored as text
#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    user_id: Uuid,
    category: String,
    color: String,
    style: String,
    season: Option<String>,
    material: Option<String>,
    last_worn_at: Option<DateTime<Utc>>,
    wear_count: i32,
    created_at: DateTime<Utc>,
}

impl From<ItemRow> for WardrobeItem {
    fn from(row: ItemRow) -> Self {
        let season = row.season.as_deref().and_then(|s| match s.parse() {
            Ok(season) => Some(season),
            Err(e) => {
                tracing::debug!(item_id = %row.id, error = %e, "Ignoring unrecognized season tag");
                None
            }
        });

        WardrobeItem {
            id: row.id,
            user_id: row.user_id,
            category: Category::parse(&row.category),
            color: row.color,
            style: row.style,
            season,
            material: row.material,
            last_worn_at: row.last_worn_at,
            wear_count: row.wear_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: Uuid,
    user_id: Uuid,
    item_count: i64,
}

#[derive(Debug, FromRow)]
struct LeaderboardRow {
    id: Uuid,
    user_id: Uuid,
    ranking_position: i32,
    ranking_score: f64,
    updated_at: DateTime<Utc>,
}

/// Wardrobe storage backed by PostgreSQL
#[derive(Clone)]
pub struct PgWardrobeRepository {
    pool: PgPool,
}

impl PgWardrobeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WardrobeRepository for PgWardrobeRepository {
    async fn wardrobe_items(&self, user_id: Uuid) -> AppResult<Vec<WardrobeItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, category, color, style, season, material,
                   last_worn_at, wear_count, created_at
            FROM wardrobe_items
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(user_id = %user_id, items = rows.len(), "Loaded wardrobe items");

        Ok(rows.into_iter().map(WardrobeItem::from).collect())
    }

    async fn wardrobe_summaries(&self) -> AppResult<Vec<WardrobeSummary>> {
        // Creation order keeps the ranking tie-break stable between runs
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT w.id, w.user_id, COUNT(i.id) AS item_count
            FROM wardrobes w
            LEFT JOIN wardrobe_items i ON i.user_id = w.user_id
            GROUP BY w.id
            ORDER BY w.created_at, w.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| WardrobeSummary {
                id: row.id,
                user_id: row.user_id,
                item_count: row.item_count,
            })
            .collect())
    }

    async fn save_rankings(
        &self,
        rankings: &[RankedWardrobe],
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for ranked in rankings {
            sqlx::query(
                r#"
                UPDATE wardrobes
                SET ranking_position = $1, ranking_score = $2, updated_at = $3
                WHERE id = $4
                "#,
            )
            .bind(ranked.ranking_position)
            .bind(ranked.ranking_score)
            .bind(updated_at)
            .bind(ranked.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(rows = rankings.len(), "Persisted wardrobe rankings");

        Ok(())
    }

    async fn leaderboard(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        let rows: Vec<LeaderboardRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, ranking_position, ranking_score, updated_at
            FROM wardrobes
            WHERE ranking_position IS NOT NULL
            ORDER BY ranking_position
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LeaderboardEntry {
                wardrobe_id: row.id,
                user_id: row.user_id,
                ranking_position: row.ranking_position,
                ranking_score: row.ranking_score,
                updated_at: row.updated_at,
            })
            .collect())
    }
}
