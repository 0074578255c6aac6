//! Saved word endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::require_learner;
use crate::AppState;

/// POST /api/learners/{learner_id}/words
pub async fn save(
    State(state): State<AppState>,
    Path(learner_id): Path<Uuid>,
    Json(payload): Json<SaveWordRequest>,
) -> Result<Json<WordView>> {
    let request = SaveWordRequest {
        word: payload.word.trim().to_string(),
        translation: payload.translation.trim().to_string(),
        dialect: payload.dialect.trim().to_lowercase(),
    };
    if request.word.is_empty() {
        return Err(ApiError::BadRequest("word must not be empty".to_string()));
    }
    if request.dialect.is_empty() {
        return Err(ApiError::BadRequest("dialect must not be empty".to_string()));
    }

    require_learner(&state, learner_id).await?;
    let word = state.db.save_word(learner_id, &request).await?;

    tracing::info!(%learner_id, word_review_id = word.id, "saved word");

    Ok(Json(word.to_api_word()))
}

/// GET /api/learners/{learner_id}/words
pub async fn list(
    State(state): State<AppState>,
    Path(learner_id): Path<Uuid>,
) -> Result<Json<WordListResponse>> {
    require_learner(&state, learner_id).await?;
    let words = state.db.list_words(learner_id).await?;

    Ok(Json(WordListResponse {
        words: words.iter().map(DbWordReview::to_api_word).collect(),
    }))
}

/// DELETE /api/learners/{learner_id}/words/{word_review_id}
pub async fn delete(
    State(state): State<AppState>,
    Path((learner_id, word_review_id)): Path<(Uuid, i64)>,
) -> Result<Json<DeleteWordResponse>> {
    let deleted = state.db.delete_word(learner_id, word_review_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Word not found".to_string()));
    }

    tracing::info!(%learner_id, word_review_id, "deleted word");

    Ok(Json(DeleteWordResponse { deleted }))
}
