//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgExecutor, PgPool, Row};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use quizbox_core::{BoxDistribution, BoxNumber, SessionOutcome};

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Database(e.into()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Profile Repository ===

    /// Create a user profile with a generated API token.
    ///
    /// Registering an existing email returns the existing profile (and its
    /// original token) instead of failing.
    pub async fn create_user_profile(
        &self,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<DbUserProfile> {
        let token = Uuid::new_v4().to_string();
        let profile = sqlx::query_as::<_, DbUserProfile>(
            r#"
            INSERT INTO user_profiles (email, display_name, api_token)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET
                display_name = COALESCE(EXCLUDED.display_name, user_profiles.display_name),
                updated_at = NOW()
            RETURNING id, email, display_name, api_token, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(display_name)
        .bind(&token)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Get user profile by API token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<DbUserProfile>> {
        let profile = sqlx::query_as::<_, DbUserProfile>(
            r#"
            SELECT id, email, display_name, api_token, created_at, updated_at
            FROM user_profiles
            WHERE api_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Get user profile by ID
    pub async fn get_user_profile(&self, user_id: Uuid) -> Result<Option<DbUserProfile>> {
        let profile = sqlx::query_as::<_, DbUserProfile>(
            r#"
            SELECT id, email, display_name, api_token, created_at, updated_at
            FROM user_profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    // === Card Progress Repository ===

    /// Record one card review: insert the row or move the card to its new
    /// box, bumping review_count.
    pub async fn upsert_card_progress(
        &self,
        key: &ProgressKey,
        box_number: BoxNumber,
        reviewed_at: DateTime<Utc>,
    ) -> Result<DbCardProgress> {
        upsert_progress_row(&self.pool, key, box_number, reviewed_at).await
    }

    /// Get all progress rows for one card set
    pub async fn get_progress_snapshot(
        &self,
        user_id: Uuid,
        flashcard_id: &str,
    ) -> Result<Vec<DbCardProgress>> {
        let rows = sqlx::query_as::<_, DbCardProgress>(
            r#"
            SELECT id, user_id, flashcard_id, card_id, box, last_reviewed,
                   review_count, created_at, updated_at
            FROM flashcard_progress
            WHERE user_id = $1 AND flashcard_id = $2
            ORDER BY card_id
            "#,
        )
        .bind(user_id)
        .bind(flashcard_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Get the card sets a user has progress in
    pub async fn get_progress_flashcard_ids(&self, user_id: Uuid) -> Result<Vec<String>> {
        let rows = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT flashcard_id
            FROM flashcard_progress
            WHERE user_id = $1
            ORDER BY flashcard_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Delete all progress rows for one card set.
    ///
    /// Session history is deliberately left alone so reports survive a reset.
    pub async fn delete_progress(&self, user_id: Uuid, flashcard_id: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM flashcard_progress
            WHERE user_id = $1 AND flashcard_id = $2
            "#,
        )
        .bind(user_id)
        .bind(flashcard_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // === Quiz Session Repository ===

    /// Persist one aggregated session and its per-card progress updates.
    ///
    /// Runs in a single transaction: the session row and every progress
    /// upsert land together or not at all. Each card is reviewed-at the
    /// session's completion time.
    pub async fn record_session(
        &self,
        user_id: Uuid,
        flashcard_id: &str,
        flashcard_title: Option<&str>,
        outcome: &SessionOutcome,
    ) -> Result<DbQuizSession> {
        let summary = &outcome.summary;
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, DbQuizSession>(
            r#"
            INSERT INTO quiz_sessions (user_id, flashcard_id, flashcard_title, started_at,
                                      completed_at, cards_reviewed, box1_count, box2_count,
                                      box3_count, duration_seconds, average_time_to_flip_seconds)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, user_id, flashcard_id, flashcard_title, started_at, completed_at,
                      cards_reviewed, box1_count, box2_count, box3_count, duration_seconds,
                      average_time_to_flip_seconds, created_at
            "#,
        )
        .bind(user_id)
        .bind(flashcard_id)
        .bind(flashcard_title)
        .bind(summary.started_at)
        .bind(summary.completed_at)
        .bind(summary.cards_reviewed as i32)
        .bind(summary.distribution.box1 as i32)
        .bind(summary.distribution.box2 as i32)
        .bind(summary.distribution.box3 as i32)
        .bind(summary.duration_seconds)
        .bind(summary.average_time_to_flip_seconds)
        .fetch_one(&mut *tx)
        .await?;

        for card in &outcome.outcomes {
            let key = ProgressKey {
                user_id,
                flashcard_id: flashcard_id.to_string(),
                card_id: card.card_id.clone(),
            };
            upsert_progress_row(&mut *tx, &key, card.box_number, summary.completed_at).await?;
        }

        tx.commit().await?;

        Ok(session)
    }

    /// Get the most recent sessions for one card set, newest first
    pub async fn get_recent_sessions(
        &self,
        user_id: Uuid,
        flashcard_id: &str,
        limit: i64,
    ) -> Result<Vec<DbQuizSession>> {
        let sessions = sqlx::query_as::<_, DbQuizSession>(
            r#"
            SELECT id, user_id, flashcard_id, flashcard_title, started_at, completed_at,
                   cards_reviewed, box1_count, box2_count, box3_count, duration_seconds,
                   average_time_to_flip_seconds, created_at
            FROM quiz_sessions
            WHERE user_id = $1 AND flashcard_id = $2
            ORDER BY completed_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(flashcard_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Get sessions completed within [since, until] inclusive, optionally
    /// filtered by card set, newest first
    pub async fn get_sessions_in_window(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        flashcard_id: Option<&str>,
    ) -> Result<Vec<DbQuizSession>> {
        let sessions = match flashcard_id {
            Some(set) => {
                sqlx::query_as::<_, DbQuizSession>(
                    r#"
                    SELECT id, user_id, flashcard_id, flashcard_title, started_at, completed_at,
                           cards_reviewed, box1_count, box2_count, box3_count, duration_seconds,
                           average_time_to_flip_seconds, created_at
                    FROM quiz_sessions
                    WHERE user_id = $1 AND flashcard_id = $2 AND completed_at BETWEEN $3 AND $4
                    ORDER BY completed_at DESC
                    "#,
                )
                .bind(user_id)
                .bind(set)
                .bind(since)
                .bind(until)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DbQuizSession>(
                    r#"
                    SELECT id, user_id, flashcard_id, flashcard_title, started_at, completed_at,
                           cards_reviewed, box1_count, box2_count, box3_count, duration_seconds,
                           average_time_to_flip_seconds, created_at
                    FROM quiz_sessions
                    WHERE user_id = $1 AND completed_at BETWEEN $2 AND $3
                    ORDER BY completed_at DESC
                    "#,
                )
                .bind(user_id)
                .bind(since)
                .bind(until)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(sessions)
    }

    // === Report Repository ===

    /// Count progress rows per box, optionally narrowed to one card set
    pub async fn get_box_distribution(
        &self,
        user_id: Uuid,
        flashcard_id: Option<&str>,
    ) -> Result<BoxDistribution> {
        let row = match flashcard_id {
            Some(set) => {
                sqlx::query(
                    r#"
                    SELECT
                        COUNT(CASE WHEN box = 1 THEN 1 END)::INT as box1,
                        COUNT(CASE WHEN box = 2 THEN 1 END)::INT as box2,
                        COUNT(CASE WHEN box = 3 THEN 1 END)::INT as box3
                    FROM flashcard_progress
                    WHERE user_id = $1 AND flashcard_id = $2
                    "#,
                )
                .bind(user_id)
                .bind(set)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT
                        COUNT(CASE WHEN box = 1 THEN 1 END)::INT as box1,
                        COUNT(CASE WHEN box = 2 THEN 1 END)::INT as box2,
                        COUNT(CASE WHEN box = 3 THEN 1 END)::INT as box3
                    FROM flashcard_progress
                    WHERE user_id = $1
                    "#,
                )
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(BoxDistribution {
            box1: row.get::<i32, _>("box1") as u32,
            box2: row.get::<i32, _>("box2") as u32,
            box3: row.get::<i32, _>("box3") as u32,
        })
    }
}

/// Upsert one progress row. The conflict path increments review_count under
/// the row lock, which serializes concurrent submissions touching the same
/// card.
async fn upsert_progress_row<'e>(
    executor: impl PgExecutor<'e>,
    key: &ProgressKey,
    box_number: BoxNumber,
    reviewed_at: DateTime<Utc>,
) -> Result<DbCardProgress> {
    let row = sqlx::query_as::<_, DbCardProgress>(
        r#"
        INSERT INTO flashcard_progress (user_id, flashcard_id, card_id, box, last_reviewed)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, flashcard_id, card_id) DO UPDATE SET
            box = EXCLUDED.box,
            last_reviewed = EXCLUDED.last_reviewed,
            review_count = flashcard_progress.review_count + 1,
            updated_at = NOW()
        RETURNING id, user_id, flashcard_id, card_id, box, last_reviewed,
                  review_count, created_at, updated_at
        "#,
    )
    .bind(key.user_id)
    .bind(&key.flashcard_id)
    .bind(&key.card_id)
    .bind(box_number.as_i32())
    .bind(reviewed_at)
    .fetch_one(executor)
    .await?;

    Ok(row)
}
