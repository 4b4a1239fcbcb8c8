use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use glimpse_types::EngagementJob;

use crate::db::repositories::{JobRepository, ProfileRepository};
use crate::db::Database;
use crate::engagement::EngagementGenerator;

/// How often the scheduler checks for due wave jobs
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Background executor for the delayed engagement waves
///
/// Waves live in the engagement_jobs table, so a restart loses nothing:
/// whatever is still pending when the process comes back up runs on the
/// next poll. The stored per-job seed makes a late wave produce exactly
/// the rows it would have produced on time.
pub struct WaveScheduler {
    db: Database,
}

impl WaveScheduler {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Poll for due jobs until the process exits
    pub async fn run(self) {
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = self.tick() {
                tracing::error!("Scheduler tick failed: {}", e);
            }
        }
    }

    /// Execute every job whose run_at has passed, returning how many ran
    ///
    /// Each job is claimed (pending -> running) before it executes, so a
    /// second poller racing on the same table skips it.
    pub fn tick(&self) -> anyhow::Result<usize> {
        let jobs = JobRepository::new(self.db.pool.clone());
        let due = jobs.due_jobs(chrono::Utc::now())?;

        let mut executed = 0;
        for job in due {
            if !jobs.claim(&job.id)? {
                continue;
            }
            self.execute(&jobs, &job);
            executed += 1;
        }
        Ok(executed)
    }

    /// Run one claimed job to completion or failure
    fn execute(&self, jobs: &JobRepository, job: &EngagementJob) {
        tracing::info!(
            "Running wave {} for post {} ({} likes, {} comments)",
            job.wave,
            job.post_id,
            job.likes_target,
            job.comments_target
        );

        let profiles = ProfileRepository::new(self.db.pool.clone());
        let pool = match profiles.bot_ids() {
            Ok(pool) => pool,
            Err(e) => {
                tracing::error!(
                    "Wave {} for post {} could not load the actor pool: {}",
                    job.wave,
                    job.post_id,
                    e
                );
                self.record_failure(jobs, job, &e.to_string());
                return;
            }
        };
        if pool.is_empty() {
            tracing::error!(
                "Wave {} for post {} has no synthetic actors to draw from",
                job.wave,
                job.post_id
            );
            self.record_failure(jobs, job, "no synthetic actors available");
            return;
        }

        // Replay the wave from the seed captured when it was planned
        let mut rng = SmallRng::seed_from_u64(job.rng_seed);
        let generator = EngagementGenerator::new(self.db.clone());
        let outcome = generator.run_post_wave(
            &job.post_id,
            &pool,
            job.likes_target,
            job.comments_target,
            &mut rng,
        );

        if let Err(e) = jobs.mark_completed(
            &job.id,
            outcome.likes.applied,
            outcome.comments.applied,
            outcome.comment_likes.applied,
        ) {
            tracing::error!("Failed to record completion of job {}: {}", job.id, e);
        }
    }

    fn record_failure(&self, jobs: &JobRepository, job: &EngagementJob, reason: &str) {
        if let Err(e) = jobs.mark_failed(&job.id, reason) {
            tracing::error!("Failed to record failure of job {}: {}", job.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use glimpse_types::JobStatus;
    use uuid::Uuid;

    const DEMO_POST: &str = "c50e8400-e29b-41d4-a716-446655440001";
    const BOT_POOL_SIZE: i64 = 12;

    fn demo_db() -> Database {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        db.seed_demo_data().expect("Failed to seed demo data");
        db
    }

    fn make_job(post_id: Uuid, run_at: DateTime<Utc>, seed: u64) -> EngagementJob {
        EngagementJob {
            id: Uuid::new_v4(),
            post_id,
            wave: 1,
            likes_target: 4,
            comments_target: 2,
            rng_seed: seed,
            run_at,
            status: JobStatus::Pending,
            error: None,
            applied_likes: None,
            applied_comments: None,
            applied_comment_likes: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn like_count(db: &Database, post_id: &Uuid) -> i64 {
        let conn = db.connection().expect("Failed to get connection");
        conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE post_id = ?",
            [post_id.to_string()],
            |row| row.get(0),
        )
        .expect("Failed to count likes")
    }

    #[test]
    fn test_tick_executes_due_jobs() {
        let db = demo_db();
        let post_id = Uuid::parse_str(DEMO_POST).expect("bad test uuid");
        let jobs = JobRepository::new(db.pool.clone());

        let job = make_job(post_id, Utc::now() - chrono::Duration::seconds(1), 42);
        jobs.enqueue(&job).expect("Failed to enqueue job");

        let scheduler = WaveScheduler::new(db.clone());
        let executed = scheduler.tick().expect("tick failed");
        assert_eq!(executed, 1);

        let stored = jobs
            .get_by_id(&job.id)
            .expect("Failed to load job")
            .expect("job vanished");
        assert_eq!(stored.status, JobStatus::Completed);
        assert_eq!(stored.applied_likes, Some(4));
        assert_eq!(stored.applied_comments, Some(2));
        assert!(stored.completed_at.is_some());
        // Each comment draws 3..=12 reactors from a 12-bot pool
        let comment_likes = stored.applied_comment_likes.expect("no comment like count");
        assert!((6..=24).contains(&comment_likes));

        assert_eq!(like_count(&db, &post_id), 4);
    }

    #[test]
    fn test_tick_skips_future_jobs() {
        let db = demo_db();
        let post_id = Uuid::parse_str(DEMO_POST).expect("bad test uuid");
        let jobs = JobRepository::new(db.pool.clone());

        let job = make_job(post_id, Utc::now() + chrono::Duration::hours(1), 42);
        jobs.enqueue(&job).expect("Failed to enqueue job");

        let scheduler = WaveScheduler::new(db.clone());
        let executed = scheduler.tick().expect("tick failed");
        assert_eq!(executed, 0);

        let stored = jobs
            .get_by_id(&job.id)
            .expect("Failed to load job")
            .expect("job vanished");
        assert_eq!(stored.status, JobStatus::Pending);
        assert_eq!(like_count(&db, &post_id), 0);
    }

    #[test]
    fn test_completed_jobs_do_not_rerun() {
        let db = demo_db();
        let post_id = Uuid::parse_str(DEMO_POST).expect("bad test uuid");
        let jobs = JobRepository::new(db.pool.clone());

        let job = make_job(post_id, Utc::now() - chrono::Duration::seconds(1), 7);
        jobs.enqueue(&job).expect("Failed to enqueue job");

        let scheduler = WaveScheduler::new(db.clone());
        assert_eq!(scheduler.tick().expect("tick failed"), 1);
        assert_eq!(scheduler.tick().expect("tick failed"), 0);
        assert_eq!(like_count(&db, &post_id), 4);
    }

    #[test]
    fn test_job_without_actors_is_marked_failed() {
        // Schema only, no bot profiles
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");

        let post_id = Uuid::new_v4();
        let jobs = JobRepository::new(db.pool.clone());
        let job = make_job(post_id, Utc::now() - chrono::Duration::seconds(1), 9);
        jobs.enqueue(&job).expect("Failed to enqueue job");

        let scheduler = WaveScheduler::new(db.clone());
        assert_eq!(scheduler.tick().expect("tick failed"), 1);

        let stored = jobs
            .get_by_id(&job.id)
            .expect("Failed to load job")
            .expect("job vanished");
        assert_eq!(stored.status, JobStatus::Failed);
        assert_eq!(
            stored.error.as_deref(),
            Some("no synthetic actors available")
        );
    }

    #[test]
    fn test_stale_running_jobs_requeue_after_restart() {
        let db = demo_db();
        let post_id = Uuid::parse_str(DEMO_POST).expect("bad test uuid");
        let jobs = JobRepository::new(db.pool.clone());

        let job = make_job(post_id, Utc::now() - chrono::Duration::seconds(1), 11);
        jobs.enqueue(&job).expect("Failed to enqueue job");
        // Simulate a crash mid-run: claimed but never finished
        assert!(jobs.claim(&job.id).expect("claim failed"));

        // A claimed job is invisible to the scheduler
        let scheduler = WaveScheduler::new(db.clone());
        assert_eq!(scheduler.tick().expect("tick failed"), 0);

        // Startup recovery puts it back, and the next tick runs it
        assert_eq!(jobs.reset_stale_running().expect("reset failed"), 1);
        assert_eq!(scheduler.tick().expect("tick failed"), 1);

        let stored = jobs
            .get_by_id(&job.id)
            .expect("Failed to load job")
            .expect("job vanished");
        assert_eq!(stored.status, JobStatus::Completed);
    }

    #[test]
    fn test_same_seed_replays_identical_rows() {
        let run = |db: &Database| -> Vec<String> {
            let post_id = Uuid::parse_str(DEMO_POST).expect("bad test uuid");
            let jobs = JobRepository::new(db.pool.clone());
            let mut job = make_job(post_id, Utc::now() - chrono::Duration::seconds(1), 1234);
            job.likes_target = BOT_POOL_SIZE as u64 / 2;
            jobs.enqueue(&job).expect("Failed to enqueue job");

            let scheduler = WaveScheduler::new(db.clone());
            assert_eq!(scheduler.tick().expect("tick failed"), 1);

            let conn = db.connection().expect("Failed to get connection");
            let mut stmt = conn
                .prepare("SELECT user_id FROM likes WHERE post_id = ? ORDER BY user_id")
                .expect("prepare failed");
            stmt.query_map([post_id.to_string()], |row| row.get(0))
                .expect("query failed")
                .collect::<Result<Vec<String>, _>>()
                .expect("collect failed")
        };

        let first = run(&demo_db());
        let second = run(&demo_db());
        assert_eq!(first, second);
        assert_eq!(first.len(), (BOT_POOL_SIZE / 2) as usize);
    }
}
