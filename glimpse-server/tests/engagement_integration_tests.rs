use anyhow::Result;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use glimpse_server::api::engagement::{bot_engagement, reel_engagement};
use glimpse_server::api::jobs::list_jobs;
use glimpse_server::api::ApiError;
use glimpse_server::db::repositories::{PostRepository, ProfileRepository};
use glimpse_server::db::Database;
use glimpse_server::rng::SharedRng;
use glimpse_server::scheduler::WaveScheduler;
use glimpse_server::state::AppState;
use glimpse_types::{
    ApplyStatus, JobStatus, Post, PostEngagementRequest, Profile, ReelEngagementRequest,
};

// Fixed IDs from the demo data set
const AUTHOR_NULL_FOLLOWERS: &str = "a50e8400-e29b-41d4-a716-446655440001"; // maya.captures
const AUTHOR_ZERO_FOLLOWERS: &str = "a50e8400-e29b-41d4-a716-446655440002"; // fresh.account
const AUTHOR_MID_TIER: &str = "a50e8400-e29b-41d4-a716-446655440003"; // wanderlens, 15k
const DEMO_POST: &str = "c50e8400-e29b-41d4-a716-446655440001";
const DEMO_REEL: &str = "d50e8400-e29b-41d4-a716-446655440001";
const BOT_POOL_SIZE: u64 = 12;

fn demo_state() -> Result<AppState> {
    let db = Database::in_memory()?;
    db.initialize()?;
    db.seed_demo_data()?;
    Ok(AppState::new(db, SharedRng::seeded(1234)))
}

fn count(state: &AppState, sql: &str, id: &str) -> Result<i64> {
    let conn = state.db.connection()?;
    let n = conn.query_row(sql, [id], |row| row.get(0))?;
    Ok(n)
}

fn post_request(post_id: &str, user_id: &str) -> PostEngagementRequest {
    PostEngagementRequest {
        post_id: Some(post_id.to_string()),
        user_id: Some(user_id.to_string()),
    }
}

fn reel_request(reel_id: &str, user_id: &str) -> ReelEngagementRequest {
    ReelEngagementRequest {
        reel_id: Some(reel_id.to_string()),
        user_id: Some(user_id.to_string()),
    }
}

/// Full photo-post flow: immediate wave lands, delayed waves are queued
#[tokio::test]
async fn test_post_engagement_full_flow() -> Result<()> {
    let state = demo_state()?;

    let Json(response) = bot_engagement(
        State(state.clone()),
        Json(post_request(DEMO_POST, AUTHOR_NULL_FOLLOWERS)),
    )
    .await
    .expect("engagement request failed");

    assert!(response.success);

    // A never-backfilled follower count is treated as a 1000-follower
    // baseline: total likes land in [245, 454], and the response reports
    // the immediate 60% share of that
    assert!(
        (147..=272).contains(&response.likes),
        "immediate likes out of range: {}",
        response.likes
    );
    assert!(
        (36..=93).contains(&response.comments),
        "immediate comments out of range: {}",
        response.comments
    );
    // Views scale off total likes at 3x-8x
    assert!(response.views >= 735 && response.views < 3632);

    // The actor pool is smaller than the plan, so rows are pool-bounded
    assert_eq!(response.apply.reactions.requested, BOT_POOL_SIZE);
    assert_eq!(response.apply.reactions.applied, BOT_POOL_SIZE);
    assert_eq!(response.apply.reactions.status, ApplyStatus::Applied);
    assert!(response.apply.shares.is_none());

    let likes = count(
        &state,
        "SELECT COUNT(*) FROM likes WHERE post_id = ?",
        DEMO_POST,
    )?;
    assert_eq!(likes as u64, BOT_POOL_SIZE);

    // Two delayed waves queued, +2s before +5s
    assert_eq!(response.scheduled_waves.len(), 2);
    assert_eq!(response.scheduled_waves[0].wave, 1);
    assert_eq!(response.scheduled_waves[1].wave, 2);
    assert!(response.scheduled_waves[0].run_at < response.scheduled_waves[1].run_at);

    let jobs = count(
        &state,
        "SELECT COUNT(*) FROM engagement_jobs WHERE post_id = ?",
        DEMO_POST,
    )?;
    assert_eq!(jobs, 2);

    println!("✅ Immediate wave applied and view counter written");
    println!("✅ Delayed waves queued as durable jobs");

    Ok(())
}

/// Missing or malformed fields are rejected before any database write
#[tokio::test]
async fn test_validation_rejects_bad_requests() -> Result<()> {
    let state = demo_state()?;

    let missing_post = PostEngagementRequest {
        post_id: None,
        user_id: Some(AUTHOR_NULL_FOLLOWERS.to_string()),
    };
    let err = bot_engagement(State(state.clone()), Json(missing_post))
        .await
        .err()
        .expect("expected missing postId to fail");
    assert!(matches!(err, ApiError::BadRequest(_)));

    let blank_user = PostEngagementRequest {
        post_id: Some(DEMO_POST.to_string()),
        user_id: Some("   ".to_string()),
    };
    let err = bot_engagement(State(state.clone()), Json(blank_user))
        .await
        .err()
        .expect("expected blank userId to fail");
    assert!(matches!(err, ApiError::BadRequest(_)));

    let err = bot_engagement(
        State(state.clone()),
        Json(post_request("not-a-uuid", AUTHOR_NULL_FOLLOWERS)),
    )
    .await
    .err()
    .expect("expected malformed postId to fail");
    assert!(matches!(err, ApiError::BadRequest(_)));

    let missing_reel = ReelEngagementRequest {
        reel_id: None,
        user_id: None,
    };
    let err = reel_engagement(State(state.clone()), Json(missing_reel))
        .await
        .err()
        .expect("expected missing reelId to fail");
    assert!(matches!(err, ApiError::BadRequest(_)));

    // Nothing was written on any of the rejected requests
    let likes = count(
        &state,
        "SELECT COUNT(*) FROM likes WHERE post_id = ?",
        DEMO_POST,
    )?;
    assert_eq!(likes, 0);
    let jobs = count(
        &state,
        "SELECT COUNT(*) FROM engagement_jobs WHERE post_id = ?",
        DEMO_POST,
    )?;
    assert_eq!(jobs, 0);

    println!("✅ Validation failures produce 400 with no writes");

    Ok(())
}

/// Unknown author profile yields a 404-style error
#[tokio::test]
async fn test_unknown_author_is_not_found() -> Result<()> {
    let state = demo_state()?;
    let stranger = Uuid::new_v4().to_string();

    let err = bot_engagement(State(state.clone()), Json(post_request(DEMO_POST, &stranger)))
        .await
        .err()
        .expect("expected unknown author to fail");
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = reel_engagement(State(state.clone()), Json(reel_request(DEMO_REEL, &stranger)))
        .await
        .err()
        .expect("expected unknown author to fail");
    assert!(matches!(err, ApiError::NotFound(_)));

    println!("✅ Unknown author rejected with NotFound");

    Ok(())
}

/// With no synthetic actors the request fails and leaves no trace
#[tokio::test]
async fn test_empty_actor_pool_is_unavailable() -> Result<()> {
    let db = Database::in_memory()?;
    db.initialize()?;

    // One real author and one post, but no bot profiles at all
    let profiles = ProfileRepository::new(db.pool.clone());
    let author = Profile {
        id: Uuid::new_v4(),
        username: "loner".to_string(),
        full_name: None,
        avatar_url: None,
        bio: None,
        followers_count: Some(2500),
        following_count: 10,
        is_bot: false,
        created_at: Utc::now(),
    };
    profiles.create(&author)?;

    let posts = PostRepository::new(db.pool.clone());
    let post = Post {
        id: Uuid::new_v4(),
        user_id: author.id,
        image_url: "https://images.glimpse.app/test.jpg".to_string(),
        caption: None,
        views_count: 0,
        created_at: Utc::now(),
    };
    posts.create(&post)?;

    let state = AppState::new(db, SharedRng::seeded(5));

    let err = bot_engagement(
        State(state.clone()),
        Json(post_request(&post.id.to_string(), &author.id.to_string())),
    )
    .await
    .err()
    .expect("expected empty pool to fail");
    assert!(matches!(err, ApiError::Unavailable(_)));

    // No likes, no jobs, view counter untouched
    let likes = count(
        &state,
        "SELECT COUNT(*) FROM likes WHERE post_id = ?",
        &post.id.to_string(),
    )?;
    assert_eq!(likes, 0);
    let jobs = count(
        &state,
        "SELECT COUNT(*) FROM engagement_jobs WHERE post_id = ?",
        &post.id.to_string(),
    )?;
    assert_eq!(jobs, 0);
    let views = count(
        &state,
        "SELECT views_count FROM posts WHERE id = ?",
        &post.id.to_string(),
    )?;
    assert_eq!(views, 0);

    println!("✅ Empty actor pool rejected with no row mutations");

    Ok(())
}

/// Full reel flow for a mid-tier creator: one wave, shares included
#[tokio::test]
async fn test_reel_engagement_full_flow() -> Result<()> {
    let state = demo_state()?;

    let Json(response) = reel_engagement(
        State(state.clone()),
        Json(reel_request(DEMO_REEL, AUTHOR_MID_TIER)),
    )
    .await
    .expect("engagement request failed");

    assert!(response.success);

    // 15k followers sits in the >10k band: views = 15000 * 0.60 * [0.8, 1.2)
    assert!(
        response.views >= 7200 && response.views < 10800,
        "views out of range: {}",
        response.views
    );

    // Reaction, comment, and share plans all exceed the 12-actor pool
    assert_eq!(response.likes, BOT_POOL_SIZE);
    assert_eq!(response.comments, BOT_POOL_SIZE);
    assert_eq!(response.shares, BOT_POOL_SIZE);

    let shares = response
        .apply
        .shares
        .expect("reel apply report carries shares");
    assert_eq!(shares.status, ApplyStatus::Applied);

    let reel_likes = count(
        &state,
        "SELECT COUNT(*) FROM reel_likes WHERE reel_id = ?",
        DEMO_REEL,
    )?;
    assert_eq!(reel_likes as u64, BOT_POOL_SIZE);
    let reel_shares = count(
        &state,
        "SELECT COUNT(*) FROM reel_shares WHERE reel_id = ?",
        DEMO_REEL,
    )?;
    assert_eq!(reel_shares as u64, BOT_POOL_SIZE);

    // Each of the 12 comments drew 10..=100 reactors, pool-bounded to 10..=12
    let comment_likes: i64 = {
        let conn = state.db.connection()?;
        conn.query_row(
            "SELECT COUNT(*) FROM reel_comment_likes rcl
             JOIN reel_comments rc ON rcl.comment_id = rc.id
             WHERE rc.reel_id = ?",
            [DEMO_REEL],
            |row| row.get(0),
        )?
    };
    assert!((120..=144).contains(&comment_likes));
    assert_eq!(response.comment_likes, comment_likes as u64);

    // The view counter was written
    let views = count(
        &state,
        "SELECT views_count FROM reels WHERE id = ?",
        DEMO_REEL,
    )?;
    assert_eq!(views as u64, response.views);

    println!("✅ Reel engagement applied across all four categories");

    Ok(())
}

/// Delayed waves execute through the scheduler and record honest counts
#[tokio::test]
async fn test_delayed_waves_execute_and_report() -> Result<()> {
    let state = demo_state()?;

    // Zero-follower author pins the plan to the floors (25 likes, 8
    // comments), which makes the wave targets exact: [15, 6, 3] and
    // [4, 2, 1]
    let Json(response) = bot_engagement(
        State(state.clone()),
        Json(post_request(DEMO_POST, AUTHOR_ZERO_FOLLOWERS)),
    )
    .await
    .expect("engagement request failed");

    assert_eq!(response.likes, 15);
    assert_eq!(response.comments, 4);
    assert_eq!(response.scheduled_waves[0].likes, 6);
    assert_eq!(response.scheduled_waves[1].likes, 3);

    // Pull the wave jobs into the past and run the scheduler
    {
        let conn = state.db.connection()?;
        conn.execute(
            "UPDATE engagement_jobs SET run_at = ?",
            [(Utc::now() - chrono::Duration::seconds(10)).to_rfc3339()],
        )?;
    }
    let scheduler = WaveScheduler::new(state.db.clone());
    let executed = scheduler.tick()?;
    assert_eq!(executed, 2);

    // The immediate wave already used the whole 12-actor pool, so the
    // delayed waves' reactions all dedup to zero; comments still land
    let Json(jobs) = list_jobs(State(state.clone()), Path(DEMO_POST.to_string()))
        .await
        .expect("job listing failed");
    assert_eq!(jobs.len(), 2);
    for job in &jobs {
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.applied_likes, Some(0));
        assert!(job.completed_at.is_some());
    }
    assert_eq!(jobs[0].applied_comments, Some(2));
    assert_eq!(jobs[1].applied_comments, Some(1));

    // Reactions never exceed one per actor across all waves
    let likes = count(
        &state,
        "SELECT COUNT(*) FROM likes WHERE post_id = ?",
        DEMO_POST,
    )?;
    assert_eq!(likes as u64, BOT_POOL_SIZE);

    // All three waves of comments exist: 4 + 2 + 1
    let comments = count(
        &state,
        "SELECT COUNT(*) FROM comments WHERE post_id = ?",
        DEMO_POST,
    )?;
    assert_eq!(comments, 7);

    println!("✅ Scheduler executed both delayed waves exactly once");
    println!("✅ Job rows expose per-wave applied counts over HTTP");

    Ok(())
}

/// The job listing endpoint rejects malformed IDs
#[tokio::test]
async fn test_job_listing_rejects_bad_id() -> Result<()> {
    let state = demo_state()?;

    let err = list_jobs(State(state.clone()), Path("not-a-uuid".to_string()))
        .await
        .err()
        .expect("expected malformed id to fail");
    assert!(matches!(err, ApiError::BadRequest(_)));

    // An unknown but well-formed ID is just an empty listing
    let Json(jobs) = list_jobs(State(state), Path(Uuid::new_v4().to_string()))
        .await
        .expect("job listing failed");
    assert!(jobs.is_empty());

    println!("✅ Job listing validates its path parameter");

    Ok(())
}
