//! Learner endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::{CreateLearnerRequest, CreateLearnerResponse};
use crate::AppState;

/// POST /api/learners
/// Creates a learner and returns its id
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<Option<CreateLearnerRequest>>,
) -> Result<Json<CreateLearnerResponse>> {
    let name = payload.and_then(|p| p.name);
    let learner = state.db.create_learner(name.as_deref()).await?;

    tracing::info!("Created learner: {}", learner.id);

    Ok(Json(CreateLearnerResponse {
        learner_id: learner.id,
    }))
}
