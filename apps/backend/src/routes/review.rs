//! Review endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::require_learner;
use crate::services::review;
use crate::AppState;

/// GET /api/learners/{learner_id}/review/due
pub async fn due(
    State(state): State<AppState>,
    Path(learner_id): Path<Uuid>,
    Query(query): Query<BatchQuery>,
) -> Result<Json<ReviewBatchResponse>> {
    require_learner(&state, learner_id).await?;
    let limit = state.config.batch_limit(query.limit);
    let words = state.db.list_words(learner_id).await?;
    let now = state.scheduler.clock().now();

    let batch = review::due_batch(words, now, limit);

    Ok(Json(ReviewBatchResponse {
        words: batch.words.iter().map(DbWordReview::to_api_word).collect(),
        total: batch.total,
        limit,
    }))
}

/// GET /api/learners/{learner_id}/review/new
pub async fn new_words(
    State(state): State<AppState>,
    Path(learner_id): Path<Uuid>,
    Query(query): Query<BatchQuery>,
) -> Result<Json<ReviewBatchResponse>> {
    require_learner(&state, learner_id).await?;
    let limit = state.config.batch_limit(query.limit);
    let words = state.db.list_words(learner_id).await?;

    let batch = review::new_batch(words, limit);

    Ok(Json(ReviewBatchResponse {
        words: batch.words.iter().map(DbWordReview::to_api_word).collect(),
        total: batch.total,
        limit,
    }))
}

/// GET /api/learners/{learner_id}/review/stats
pub async fn stats(
    State(state): State<AppState>,
    Path(learner_id): Path<Uuid>,
) -> Result<Json<ReviewStatsResponse>> {
    require_learner(&state, learner_id).await?;
    let words = state.db.list_words(learner_id).await?;
    let now = state.scheduler.clock().now();

    Ok(Json(review::stats(&words, now)))
}

/// POST /api/learners/{learner_id}/review/{word_review_id}
pub async fn submit(
    State(state): State<AppState>,
    Path((learner_id, word_review_id)): Path<(Uuid, i64)>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Json<SubmitReviewResponse>> {
    let difficulty = review::resolve_difficulty(payload.difficulty, state.config.difficulty_mode)?;

    let scheduler = state.scheduler.clone();
    let (updated, history) = state
        .db
        .record_review(learner_id, word_review_id, move |current| {
            review::schedule_review(&scheduler, current, difficulty)
        })
        .await?
        .ok_or_else(|| ApiError::NotFound("Word not found".to_string()))?;

    tracing::info!(
        %learner_id,
        word_review_id,
        difficulty = difficulty.as_str(),
        interval_days = updated.interval_days,
        "recorded review"
    );

    Ok(Json(SubmitReviewResponse {
        word_review_id,
        difficulty,
        state: updated.to_core_state(),
        reviewed_at: history.reviewed_at,
    }))
}

/// GET /api/learners/{learner_id}/review/{word_review_id}/history
pub async fn history(
    State(state): State<AppState>,
    Path((learner_id, word_review_id)): Path<(Uuid, i64)>,
) -> Result<Json<ReviewHistoryResponse>> {
    state
        .db
        .get_word(learner_id, word_review_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Word not found".to_string()))?;

    let entries = state
        .db
        .get_review_history(learner_id, word_review_id)
        .await?;

    Ok(Json(ReviewHistoryResponse { entries }))
}
