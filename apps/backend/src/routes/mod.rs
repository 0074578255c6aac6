pub mod learners;
pub mod review;
pub mod words;

use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::Learner;
use crate::AppState;

/// Look up the learner addressed by the request path.
pub(crate) async fn require_learner(state: &AppState, learner_id: Uuid) -> Result<Learner> {
    state
        .db
        .get_learner(learner_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Learner not found".to_string()))
}
