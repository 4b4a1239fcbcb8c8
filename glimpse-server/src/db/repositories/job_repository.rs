use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use glimpse_types::{EngagementJob, JobStatus};

use crate::db::DbPool;

pub struct JobRepository {
    pool: DbPool,
}

impl JobRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persist a freshly planned wave job (status starts at pending)
    ///
    /// The u64 seed is stored through an i64 cast; the bit pattern round
    /// trips, SQLite has no unsigned column type.
    pub fn enqueue(&self, job: &EngagementJob) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO engagement_jobs (id, post_id, wave, likes_target, comments_target, rng_seed, run_at, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                job.id.to_string(),
                job.post_id.to_string(),
                job.wave as i64,
                job.likes_target as i64,
                job.comments_target as i64,
                job.rng_seed as i64,
                job.run_at.to_rfc3339(),
                job.status.as_str(),
                job.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to enqueue engagement job")?;
        Ok(())
    }

    /// Pending jobs whose run_at has passed, oldest first
    pub fn due_jobs(&self, now: DateTime<Utc>) -> Result<Vec<EngagementJob>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, post_id, wave, likes_target, comments_target, rng_seed, run_at, status, error, applied_likes, applied_comments, applied_comment_likes, created_at, completed_at
             FROM engagement_jobs
             WHERE status = 'pending' AND run_at <= ?
             ORDER BY run_at ASC",
        )?;

        let jobs = stmt
            .query_map([now.to_rfc3339()], |row| {
                let status_str: String = row.get(7)?;
                Ok(EngagementJob {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    post_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
                    wave: row.get::<_, i64>(2)? as u32,
                    likes_target: row.get::<_, i64>(3)? as u64,
                    comments_target: row.get::<_, i64>(4)? as u64,
                    rng_seed: row.get::<_, i64>(5)? as u64,
                    run_at: row.get::<_, String>(6)?.parse::<DateTime<Utc>>().unwrap(),
                    status: JobStatus::parse(&status_str).unwrap(),
                    error: row.get(8)?,
                    applied_likes: row.get::<_, Option<i64>>(9)?.map(|n| n as u64),
                    applied_comments: row.get::<_, Option<i64>>(10)?.map(|n| n as u64),
                    applied_comment_likes: row.get::<_, Option<i64>>(11)?.map(|n| n as u64),
                    created_at: row.get::<_, String>(12)?.parse::<DateTime<Utc>>().unwrap(),
                    completed_at: row
                        .get::<_, Option<String>>(13)?
                        .map(|s| s.parse::<DateTime<Utc>>().unwrap()),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(jobs)
    }

    /// All wave jobs for a content item, in wave order
    pub fn list_for_post(&self, post_id: &Uuid) -> Result<Vec<EngagementJob>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, post_id, wave, likes_target, comments_target, rng_seed, run_at, status, error, applied_likes, applied_comments, applied_comment_likes, created_at, completed_at
             FROM engagement_jobs
             WHERE post_id = ?
             ORDER BY wave ASC",
        )?;

        let jobs = stmt
            .query_map([post_id.to_string()], |row| {
                let status_str: String = row.get(7)?;
                Ok(EngagementJob {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    post_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
                    wave: row.get::<_, i64>(2)? as u32,
                    likes_target: row.get::<_, i64>(3)? as u64,
                    comments_target: row.get::<_, i64>(4)? as u64,
                    rng_seed: row.get::<_, i64>(5)? as u64,
                    run_at: row.get::<_, String>(6)?.parse::<DateTime<Utc>>().unwrap(),
                    status: JobStatus::parse(&status_str).unwrap(),
                    error: row.get(8)?,
                    applied_likes: row.get::<_, Option<i64>>(9)?.map(|n| n as u64),
                    applied_comments: row.get::<_, Option<i64>>(10)?.map(|n| n as u64),
                    applied_comment_likes: row.get::<_, Option<i64>>(11)?.map(|n| n as u64),
                    created_at: row.get::<_, String>(12)?.parse::<DateTime<Utc>>().unwrap(),
                    completed_at: row
                        .get::<_, Option<String>>(13)?
                        .map(|s| s.parse::<DateTime<Utc>>().unwrap()),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(jobs)
    }

    /// Get a single job by ID
    #[allow(dead_code)]
    pub fn get_by_id(&self, job_id: &Uuid) -> Result<Option<EngagementJob>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, post_id, wave, likes_target, comments_target, rng_seed, run_at, status, error, applied_likes, applied_comments, applied_comment_likes, created_at, completed_at
             FROM engagement_jobs
             WHERE id = ?",
        )?;

        let job = stmt
            .query_row([job_id.to_string()], |row| {
                let status_str: String = row.get(7)?;
                Ok(EngagementJob {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    post_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
                    wave: row.get::<_, i64>(2)? as u32,
                    likes_target: row.get::<_, i64>(3)? as u64,
                    comments_target: row.get::<_, i64>(4)? as u64,
                    rng_seed: row.get::<_, i64>(5)? as u64,
                    run_at: row.get::<_, String>(6)?.parse::<DateTime<Utc>>().unwrap(),
                    status: JobStatus::parse(&status_str).unwrap(),
                    error: row.get(8)?,
                    applied_likes: row.get::<_, Option<i64>>(9)?.map(|n| n as u64),
                    applied_comments: row.get::<_, Option<i64>>(10)?.map(|n| n as u64),
                    applied_comment_likes: row.get::<_, Option<i64>>(11)?.map(|n| n as u64),
                    created_at: row.get::<_, String>(12)?.parse::<DateTime<Utc>>().unwrap(),
                    completed_at: row
                        .get::<_, Option<String>>(13)?
                        .map(|s| s.parse::<DateTime<Utc>>().unwrap()),
                })
            })
            .optional()?;

        Ok(job)
    }

    /// Claim a pending job for execution (pending -> running)
    ///
    /// Guarded on the current status so two pollers can never both win;
    /// returns false when someone else already has it.
    pub fn claim(&self, job_id: &Uuid) -> Result<bool> {
        let conn = self.pool.get()?;
        let changed = conn
            .execute(
                "UPDATE engagement_jobs SET status = 'running' WHERE id = ? AND status = 'pending'",
                [job_id.to_string()],
            )
            .context("Failed to claim engagement job")?;
        Ok(changed == 1)
    }

    /// Record a successful wave run with the counts that actually landed
    pub fn mark_completed(
        &self,
        job_id: &Uuid,
        applied_likes: u64,
        applied_comments: u64,
        applied_comment_likes: u64,
    ) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE engagement_jobs
             SET status = 'completed', applied_likes = ?, applied_comments = ?, applied_comment_likes = ?, completed_at = ?
             WHERE id = ?",
            (
                applied_likes as i64,
                applied_comments as i64,
                applied_comment_likes as i64,
                Utc::now().to_rfc3339(),
                job_id.to_string(),
            ),
        )
        .context("Failed to mark engagement job completed")?;
        Ok(())
    }

    /// Record a failed wave run; failed jobs are not retried
    pub fn mark_failed(&self, job_id: &Uuid, error: &str) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE engagement_jobs
             SET status = 'failed', error = ?, completed_at = ?
             WHERE id = ?",
            (error, Utc::now().to_rfc3339(), job_id.to_string()),
        )
        .context("Failed to mark engagement job failed")?;
        Ok(())
    }

    /// Put jobs a dead process left mid-run back in the queue
    ///
    /// Called once at startup, before the scheduler starts polling.
    pub fn reset_stale_running(&self) -> Result<u64> {
        let conn = self.pool.get()?;
        let changed = conn
            .execute(
                "UPDATE engagement_jobs SET status = 'pending' WHERE status = 'running'",
                [],
            )
            .context("Failed to reset stale running jobs")?;
        Ok(changed as u64)
    }
}
