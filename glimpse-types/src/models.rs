use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{ApplyStatus, JobStatus};

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

// Same as datetime_format but for optional timestamps
mod datetime_format_opt {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => s
                .parse::<DateTime<Utc>>()
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    /// None means the count was never backfilled; an explicit 0 is a real
    /// zero-follower account and the two are treated differently when
    /// sizing engagement.
    pub followers_count: Option<i64>,
    pub following_count: i64,
    pub is_bot: bool,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub views_count: i64,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_url: String,
    pub caption: Option<String>,
    pub views_count: i64,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelComment {
    pub id: Uuid,
    pub reel_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

/// A deferred engagement wave persisted for the background scheduler.
///
/// Jobs survive a process restart: anything still `pending` (or left
/// `running` by a crash) is picked up again when the scheduler starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementJob {
    pub id: Uuid,
    pub post_id: Uuid,
    /// 1-based wave number; wave 0 is the immediate wave and never queued.
    pub wave: u32,
    pub likes_target: u64,
    pub comments_target: u64,
    /// Seed for the wave's own RNG, captured at enqueue time so a wave
    /// produces the same rows no matter when (or after how many restarts)
    /// it actually runs.
    pub rng_seed: u64,
    #[serde(with = "datetime_format")]
    pub run_at: DateTime<Utc>,
    pub status: JobStatus,
    pub error: Option<String>,
    pub applied_likes: Option<u64>,
    pub applied_comments: Option<u64>,
    pub applied_comment_likes: Option<u64>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "datetime_format_opt")]
    pub completed_at: Option<DateTime<Utc>>,
}

// Request/Response types for API
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEngagementRequest {
    pub post_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelEngagementRequest {
    pub reel_id: Option<String>,
    pub user_id: Option<String>,
}

/// How one category of writes (reactions, comments, ...) actually landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOutcome {
    pub status: ApplyStatus,
    pub requested: u64,
    pub applied: u64,
}

impl CategoryOutcome {
    pub fn from_counts(requested: u64, applied: u64) -> Self {
        let status = if applied >= requested {
            ApplyStatus::Applied
        } else if applied > 0 {
            ApplyStatus::Partial
        } else {
            ApplyStatus::Failed
        };
        Self {
            status,
            requested,
            applied,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementApplyReport {
    pub reactions: CategoryOutcome,
    pub comments: CategoryOutcome,
    pub comment_reactions: CategoryOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<CategoryOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledWave {
    pub wave: u32,
    pub job_id: Uuid,
    #[serde(with = "datetime_format")]
    pub run_at: DateTime<Utc>,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEngagementResponse {
    pub success: bool,
    /// Planned immediate-wave totals, not rows written; the pool can be
    /// smaller than the plan.
    pub likes: u64,
    pub comments: u64,
    pub views: u64,
    pub apply: EngagementApplyReport,
    pub scheduled_waves: Vec<ScheduledWave>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelEngagementResponse {
    pub success: bool,
    pub views: u64,
    /// Assigned counts, already bounded by the actor pool.
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub comment_likes: u64,
    pub apply: EngagementApplyReport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
