use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::JobRepository,
    state::AppState,
};
use glimpse_types::EngagementJob;

/// GET /api/engagement-jobs/:post_id - Inspect the wave queue for a post
///
/// Returns every wave job for the post in wave order, including status,
/// targets, and the counts that actually landed once a wave has run.
pub async fn list_jobs(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<Vec<EngagementJob>>> {
    let post_id = Uuid::parse_str(post_id.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid post id: {}", post_id)))?;

    let jobs = JobRepository::new(state.db.pool.clone());
    let rows = jobs
        .list_for_post(&post_id)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(rows))
}
