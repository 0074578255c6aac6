//! PostgreSQL database operations

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

const WORD_COLUMNS: &str = "id, learner_id, word, translation, dialect, ease_factor, \
     interval_days, repetitions, next_review_date, last_review_date, is_learning, \
     created_at, updated_at";

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Learner Repository ===

    pub async fn create_learner(&self, name: Option<&str>) -> Result<Learner> {
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            INSERT INTO learners (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(learner)
    }

    pub async fn get_learner(&self, learner_id: Uuid) -> Result<Option<Learner>> {
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            SELECT id, name, created_at
            FROM learners
            WHERE id = $1
            "#,
        )
        .bind(learner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(learner)
    }

    // === Word Review Repository ===

    /// Save a word with the initial schedule state.
    ///
    /// Saving the same word and dialect twice returns the existing row
    /// untouched, so review progress is never reset by a re-save.
    pub async fn save_word(&self, learner_id: Uuid, request: &SaveWordRequest) -> Result<DbWordReview> {
        let initial = WordScheduleState::initial();
        let query = format!(
            r#"
            INSERT INTO word_reviews (learner_id, word, translation, dialect,
                                      ease_factor, interval_days, repetitions,
                                      next_review_date, is_learning)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, $8)
            ON CONFLICT (learner_id, word, dialect) DO UPDATE SET
                updated_at = word_reviews.updated_at
            RETURNING {WORD_COLUMNS}
            "#
        );

        let word = sqlx::query_as::<_, DbWordReview>(&query)
            .bind(learner_id)
            .bind(&request.word)
            .bind(&request.translation)
            .bind(&request.dialect)
            .bind(initial.ease_factor)
            .bind(initial.interval_days as i32)
            .bind(initial.repetitions as i32)
            .bind(initial.is_learning)
            .fetch_one(&self.pool)
            .await?;

        Ok(word)
    }

    /// All saved words for a learner, oldest first
    pub async fn list_words(&self, learner_id: Uuid) -> Result<Vec<DbWordReview>> {
        let query = format!(
            r#"
            SELECT {WORD_COLUMNS}
            FROM word_reviews
            WHERE learner_id = $1
            ORDER BY id
            "#
        );

        let words = sqlx::query_as::<_, DbWordReview>(&query)
            .bind(learner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(words)
    }

    pub async fn get_word(&self, learner_id: Uuid, word_review_id: i64) -> Result<Option<DbWordReview>> {
        let query = format!(
            r#"
            SELECT {WORD_COLUMNS}
            FROM word_reviews
            WHERE id = $1 AND learner_id = $2
            "#
        );

        let word = sqlx::query_as::<_, DbWordReview>(&query)
            .bind(word_review_id)
            .bind(learner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(word)
    }

    /// Delete a saved word; its history goes with it
    pub async fn delete_word(&self, learner_id: Uuid, word_review_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM word_reviews
            WHERE id = $1 AND learner_id = $2
            "#,
        )
        .bind(word_review_id)
        .bind(learner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Read-modify-write of one word's schedule state.
    ///
    /// The row is locked for the duration of the transaction, so `schedule`
    /// always sees the latest committed state and concurrent reviews of the
    /// same word apply one after another. Returns `None` if the word does
    /// not exist for this learner.
    pub async fn record_review<F>(
        &self,
        learner_id: Uuid,
        word_review_id: i64,
        schedule: F,
    ) -> Result<Option<(DbWordReview, DbReviewHistory)>>
    where
        F: FnOnce(&DbWordReview) -> Result<(DbScheduleUpdate, DbReviewHistory)>,
    {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            r#"
            SELECT {WORD_COLUMNS}
            FROM word_reviews
            WHERE id = $1 AND learner_id = $2
            FOR UPDATE
            "#
        );
        let current = sqlx::query_as::<_, DbWordReview>(&select)
            .bind(word_review_id)
            .bind(learner_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let (update, history) = schedule(&current)?;

        let update_query = format!(
            r#"
            UPDATE word_reviews SET
                ease_factor = $3,
                interval_days = $4,
                repetitions = $5,
                next_review_date = $6,
                last_review_date = $7,
                is_learning = $8,
                updated_at = NOW()
            WHERE id = $1 AND learner_id = $2
            RETURNING {WORD_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, DbWordReview>(&update_query)
            .bind(word_review_id)
            .bind(learner_id)
            .bind(update.ease_factor)
            .bind(update.interval_days)
            .bind(update.repetitions)
            .bind(update.next_review_date)
            .bind(update.last_review_date)
            .bind(update.is_learning)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO review_history (id, word_review_id, learner_id, difficulty,
                                        ease_factor, interval_days, repetitions,
                                        next_review_date, reviewed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(history.id)
        .bind(history.word_review_id)
        .bind(history.learner_id)
        .bind(history.difficulty)
        .bind(history.ease_factor)
        .bind(history.interval_days)
        .bind(history.repetitions)
        .bind(history.next_review_date)
        .bind(history.reviewed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some((updated, history)))
    }

    // === Review History Repository ===

    /// Audit log for one word, newest first
    pub async fn get_review_history(
        &self,
        learner_id: Uuid,
        word_review_id: i64,
    ) -> Result<Vec<DbReviewHistory>> {
        let entries = sqlx::query_as::<_, DbReviewHistory>(
            r#"
            SELECT id, word_review_id, learner_id, difficulty, ease_factor,
                   interval_days, repetitions, next_review_date, reviewed_at
            FROM review_history
            WHERE word_review_id = $1 AND learner_id = $2
            ORDER BY reviewed_at DESC
            "#,
        )
        .bind(word_review_id)
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
