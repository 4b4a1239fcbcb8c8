use axum::{extract::State, Json};
use uuid::Uuid;

use crate::{
    api::{ApiError, ApiResult},
    engagement::EngagementGenerator,
    state::AppState,
};
use glimpse_types::{
    PostEngagementRequest, PostEngagementResponse, ReelEngagementRequest, ReelEngagementResponse,
};

/// Pull a required UUID field out of a request body
///
/// Validation happens before anything touches the database.
fn require_uuid(value: &Option<String>, field: &str) -> Result<Uuid, ApiError> {
    let raw = value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {}", field)))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", field, raw)))
}

/// POST /api/bot-engagement - Generate engagement for a photo post
///
/// Runs the immediate wave inline and queues the two delayed waves as
/// jobs; the reported likes/comments are the planned immediate-wave
/// totals, the apply block says what actually landed.
pub async fn bot_engagement(
    State(state): State<AppState>,
    Json(payload): Json<PostEngagementRequest>,
) -> ApiResult<Json<PostEngagementResponse>> {
    let post_id = require_uuid(&payload.post_id, "postId")?;
    let user_id = require_uuid(&payload.user_id, "userId")?;

    tracing::info!("Bot engagement requested for post {} by {}", post_id, user_id);

    let generator = EngagementGenerator::new(state.db.clone());
    let mut rng = state.rng.fork();
    let outcome = generator.generate_for_post(&post_id, &user_id, &mut rng)?;

    Ok(Json(PostEngagementResponse {
        success: true,
        likes: outcome.immediate_likes,
        comments: outcome.immediate_comments,
        views: outcome.views,
        apply: outcome.apply,
        scheduled_waves: outcome.scheduled_waves,
    }))
}

/// POST /api/reel-engagement - Generate engagement for a reel
///
/// Single wave, views first, shares included.
pub async fn reel_engagement(
    State(state): State<AppState>,
    Json(payload): Json<ReelEngagementRequest>,
) -> ApiResult<Json<ReelEngagementResponse>> {
    let reel_id = require_uuid(&payload.reel_id, "reelId")?;
    let user_id = require_uuid(&payload.user_id, "userId")?;

    tracing::info!("Reel engagement requested for reel {} by {}", reel_id, user_id);

    let generator = EngagementGenerator::new(state.db.clone());
    let mut rng = state.rng.fork();
    let outcome = generator.generate_for_reel(&reel_id, &user_id, &mut rng)?;

    Ok(Json(ReelEngagementResponse {
        success: true,
        views: outcome.views,
        likes: outcome.likes_assigned,
        comments: outcome.comments_assigned,
        shares: outcome.shares_assigned,
        comment_likes: outcome.comment_likes_applied,
        apply: outcome.apply,
    }))
}
