use anyhow::Result;
use chrono::{Duration, Utc};
use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use glimpse_types::{
    CategoryOutcome, Comment, EngagementApplyReport, EngagementJob, JobStatus, ReelComment,
    ScheduledWave,
};

use crate::db::repositories::{JobRepository, PostRepository, ProfileRepository, ReelRepository};
use crate::db::Database;

use super::sampler::assign_actors;
use super::templates;
use super::tiers::{
    plan_post_engagement, plan_reel_engagement, wave_split, POST_COMMENT_LIKE_RANGE,
    REEL_COMMENT_LIKE_RANGE, WAVE_DELAYS_MS,
};

/// Failures that abort an engagement operation
///
/// Anything not covered here (a single batch insert going wrong) is
/// logged, folded into the apply report, and does not abort.
#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("author profile {0} not found")]
    AuthorNotFound(Uuid),
    #[error("no synthetic actors available")]
    NoActors,
    #[error("view count update failed: {0}")]
    ViewCountUpdate(#[source] anyhow::Error),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// What one executed post wave actually wrote
#[derive(Debug)]
pub struct WaveOutcome {
    pub likes: CategoryOutcome,
    pub comments: CategoryOutcome,
    pub comment_likes: CategoryOutcome,
}

/// Result of the full post operation: immediate wave plus queued waves
#[derive(Debug)]
pub struct PostEngagementOutcome {
    pub total_likes: u64,
    pub total_comments: u64,
    /// Planned immediate-wave counts; these go on the wire and may exceed
    /// the actor pool.
    pub immediate_likes: u64,
    pub immediate_comments: u64,
    pub views: u64,
    pub apply: EngagementApplyReport,
    pub scheduled_waves: Vec<ScheduledWave>,
}

/// Result of the single-wave reel operation
#[derive(Debug)]
pub struct ReelEngagementOutcome {
    pub views: u64,
    /// Assigned counts, already bounded by the pool
    pub likes_assigned: u64,
    pub comments_assigned: u64,
    pub shares_assigned: u64,
    pub comment_likes_applied: u64,
    pub apply: EngagementApplyReport,
}

/// Synthesizes engagement for freshly published content
///
/// Every random decision flows through the caller-supplied generator, so
/// an operation is fully determined by the seed that generator started
/// from. Database writes go through the repositories; reaction tables
/// absorb repeat (actor, content) pairs via their composite keys.
pub struct EngagementGenerator {
    db: Database,
}

impl EngagementGenerator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Generate the full engagement burst for a photo post
    ///
    /// Runs the immediate wave (60% of the planned totals), overwrites the
    /// view counter, and queues the +2s and +5s waves as durable jobs.
    pub fn generate_for_post<R: Rng>(
        &self,
        post_id: &Uuid,
        author_id: &Uuid,
        rng: &mut R,
    ) -> Result<PostEngagementOutcome, EngagementError> {
        let profiles = ProfileRepository::new(self.db.pool.clone());
        let author = profiles
            .get_by_id(author_id)?
            .ok_or(EngagementError::AuthorNotFound(*author_id))?;

        let plan = plan_post_engagement(author.followers_count, rng);
        tracing::info!(
            "Planned post engagement for {}: {} likes, {} comments, {} views",
            post_id,
            plan.likes,
            plan.comments,
            plan.views
        );

        let pool = profiles.bot_ids()?;
        if pool.is_empty() {
            return Err(EngagementError::NoActors);
        }

        let like_waves = wave_split(plan.likes);
        let comment_waves = wave_split(plan.comments);

        // Wave 0 runs inline with the request
        let wave = self.run_post_wave(post_id, &pool, like_waves[0], comment_waves[0], rng);

        // The view counter is the one write the operation cannot proceed without
        let posts = PostRepository::new(self.db.pool.clone());
        posts
            .set_view_count(post_id, plan.views)
            .map_err(EngagementError::ViewCountUpdate)?;

        // Queue the delayed waves; each carries its own seed so it replays
        // identically whenever the scheduler gets to it
        let jobs = JobRepository::new(self.db.pool.clone());
        let now = Utc::now();
        let mut scheduled_waves = Vec::new();
        for (i, delay_ms) in WAVE_DELAYS_MS.iter().enumerate() {
            let wave_no = (i + 1) as u32;
            let job = EngagementJob {
                id: Uuid::new_v4(),
                post_id: *post_id,
                wave: wave_no,
                likes_target: like_waves[wave_no as usize],
                comments_target: comment_waves[wave_no as usize],
                rng_seed: rng.gen::<u64>(),
                run_at: now + Duration::milliseconds(*delay_ms as i64),
                status: JobStatus::Pending,
                error: None,
                applied_likes: None,
                applied_comments: None,
                applied_comment_likes: None,
                created_at: now,
                completed_at: None,
            };
            match jobs.enqueue(&job) {
                Ok(()) => scheduled_waves.push(ScheduledWave {
                    wave: job.wave,
                    job_id: job.id,
                    run_at: job.run_at,
                    likes: job.likes_target,
                    comments: job.comments_target,
                }),
                Err(e) => {
                    // The response only lists waves that were actually persisted
                    tracing::error!(
                        "Failed to enqueue wave {} for post {}: {:#}",
                        wave_no,
                        post_id,
                        e
                    );
                }
            }
        }

        Ok(PostEngagementOutcome {
            total_likes: plan.likes,
            total_comments: plan.comments,
            immediate_likes: like_waves[0],
            immediate_comments: comment_waves[0],
            views: plan.views,
            apply: EngagementApplyReport {
                reactions: wave.likes,
                comments: wave.comments,
                comment_reactions: wave.comment_likes,
                shares: None,
            },
            scheduled_waves,
        })
    }

    /// Execute one post wave: reactions, comments, reactions-on-comments
    ///
    /// Batch failures are logged and reported, never propagated; the wave
    /// always produces an outcome.
    pub fn run_post_wave<R: Rng>(
        &self,
        post_id: &Uuid,
        pool: &[Uuid],
        likes_target: u64,
        comments_target: u64,
        rng: &mut R,
    ) -> WaveOutcome {
        let posts = PostRepository::new(self.db.pool.clone());

        // Reactions
        let like_actors = assign_actors(pool, likes_target, rng);
        let likes = if like_actors.is_empty() {
            CategoryOutcome::from_counts(0, 0)
        } else {
            match posts.insert_likes(post_id, &like_actors) {
                Ok(applied) => CategoryOutcome::from_counts(like_actors.len() as u64, applied),
                Err(e) => {
                    tracing::error!("Reaction batch failed for post {}: {:#}", post_id, e);
                    CategoryOutcome::from_counts(like_actors.len() as u64, 0)
                }
            }
        };

        // Comments
        let comment_actors = assign_actors(pool, comments_target, rng);
        let comment_rows: Vec<Comment> = comment_actors
            .iter()
            .map(|actor| Comment {
                id: Uuid::new_v4(),
                post_id: *post_id,
                user_id: *actor,
                content: templates::pick(&templates::POST_COMMENTS, rng).to_string(),
                created_at: Utc::now(),
            })
            .collect();

        let (comments, inserted_comments) = if comment_rows.is_empty() {
            (CategoryOutcome::from_counts(0, 0), Vec::new())
        } else {
            match posts.insert_comments(&comment_rows) {
                Ok(applied) => (
                    CategoryOutcome::from_counts(comment_rows.len() as u64, applied),
                    comment_rows,
                ),
                Err(e) => {
                    tracing::error!("Comment batch failed for post {}: {:#}", post_id, e);
                    (
                        CategoryOutcome::from_counts(comment_rows.len() as u64, 0),
                        Vec::new(),
                    )
                }
            }
        };

        // Reactions on the fresh comments
        let mut pairs: Vec<(Uuid, Uuid)> = Vec::new();
        for comment in &inserted_comments {
            let count = rng.gen_range(POST_COMMENT_LIKE_RANGE);
            for actor in assign_actors(pool, count, rng) {
                pairs.push((actor, comment.id));
            }
        }
        let comment_likes = if pairs.is_empty() {
            CategoryOutcome::from_counts(0, 0)
        } else {
            match posts.insert_comment_likes(&pairs) {
                Ok(applied) => CategoryOutcome::from_counts(pairs.len() as u64, applied),
                Err(e) => {
                    tracing::error!("Comment reaction batch failed for post {}: {:#}", post_id, e);
                    CategoryOutcome::from_counts(pairs.len() as u64, 0)
                }
            }
        };

        WaveOutcome {
            likes,
            comments,
            comment_likes,
        }
    }

    /// Generate the single engagement wave for a reel
    ///
    /// Reels write their view counter first, then reactions, comments,
    /// reactions-on-comments, and shares.
    pub fn generate_for_reel<R: Rng>(
        &self,
        reel_id: &Uuid,
        author_id: &Uuid,
        rng: &mut R,
    ) -> Result<ReelEngagementOutcome, EngagementError> {
        let profiles = ProfileRepository::new(self.db.pool.clone());
        let author = profiles
            .get_by_id(author_id)?
            .ok_or(EngagementError::AuthorNotFound(*author_id))?;

        let plan = plan_reel_engagement(author.followers_count, rng);
        tracing::info!(
            "Planned reel engagement for {}: {} views, {} likes, {} comments, {} shares",
            reel_id,
            plan.views,
            plan.likes,
            plan.comments,
            plan.shares
        );

        let pool = profiles.bot_ids()?;
        if pool.is_empty() {
            return Err(EngagementError::NoActors);
        }

        let reels = ReelRepository::new(self.db.pool.clone());
        reels
            .set_view_count(reel_id, plan.views)
            .map_err(EngagementError::ViewCountUpdate)?;

        // Reactions
        let like_actors = assign_actors(&pool, plan.likes, rng);
        let likes_assigned = like_actors.len() as u64;
        let likes = if like_actors.is_empty() {
            CategoryOutcome::from_counts(0, 0)
        } else {
            match reels.insert_likes(reel_id, &like_actors) {
                Ok(applied) => CategoryOutcome::from_counts(likes_assigned, applied),
                Err(e) => {
                    tracing::error!("Reaction batch failed for reel {}: {:#}", reel_id, e);
                    CategoryOutcome::from_counts(likes_assigned, 0)
                }
            }
        };

        // Comments
        let comment_actors = assign_actors(&pool, plan.comments, rng);
        let comment_rows: Vec<ReelComment> = comment_actors
            .iter()
            .map(|actor| ReelComment {
                id: Uuid::new_v4(),
                reel_id: *reel_id,
                user_id: *actor,
                content: templates::pick(&templates::REEL_COMMENTS, rng).to_string(),
                created_at: Utc::now(),
            })
            .collect();
        let comments_assigned = comment_rows.len() as u64;

        let (comments, inserted_comments) = if comment_rows.is_empty() {
            (CategoryOutcome::from_counts(0, 0), Vec::new())
        } else {
            match reels.insert_comments(&comment_rows) {
                Ok(applied) => (
                    CategoryOutcome::from_counts(comments_assigned, applied),
                    comment_rows,
                ),
                Err(e) => {
                    tracing::error!("Comment batch failed for reel {}: {:#}", reel_id, e);
                    (CategoryOutcome::from_counts(comments_assigned, 0), Vec::new())
                }
            }
        };

        // Reactions on the fresh comments
        let mut pairs: Vec<(Uuid, Uuid)> = Vec::new();
        for comment in &inserted_comments {
            let count = rng.gen_range(REEL_COMMENT_LIKE_RANGE);
            for actor in assign_actors(&pool, count, rng) {
                pairs.push((actor, comment.id));
            }
        }
        let comment_likes = if pairs.is_empty() {
            CategoryOutcome::from_counts(0, 0)
        } else {
            match reels.insert_comment_likes(&pairs) {
                Ok(applied) => CategoryOutcome::from_counts(pairs.len() as u64, applied),
                Err(e) => {
                    tracing::error!("Comment reaction batch failed for reel {}: {:#}", reel_id, e);
                    CategoryOutcome::from_counts(pairs.len() as u64, 0)
                }
            }
        };

        // Shares
        let share_actors = assign_actors(&pool, plan.shares, rng);
        let shares_assigned = share_actors.len() as u64;
        let shares = if share_actors.is_empty() {
            CategoryOutcome::from_counts(0, 0)
        } else {
            match reels.insert_shares(reel_id, &share_actors) {
                Ok(applied) => CategoryOutcome::from_counts(shares_assigned, applied),
                Err(e) => {
                    tracing::error!("Share batch failed for reel {}: {:#}", reel_id, e);
                    CategoryOutcome::from_counts(shares_assigned, 0)
                }
            }
        };

        Ok(ReelEngagementOutcome {
            views: plan.views,
            likes_assigned,
            comments_assigned,
            shares_assigned,
            comment_likes_applied: comment_likes.applied,
            apply: EngagementApplyReport {
                reactions: likes,
                comments,
                comment_reactions: comment_likes,
                shares: Some(shares),
            },
        })
    }
}
