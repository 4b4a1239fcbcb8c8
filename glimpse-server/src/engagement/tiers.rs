use rand::Rng;

/// Follower count assumed for a post author whose count was never backfilled.
/// An explicit zero is NOT defaulted; zero-follower accounts land on the floors.
pub const POST_DEFAULT_FOLLOWERS: i64 = 1000;

/// Minimum engagement every post receives, whatever the audience size
pub const POST_LIKE_FLOOR: u64 = 25;
pub const POST_COMMENT_FLOOR: u64 = 8;
pub const POST_VIEW_FLOOR: u64 = 100;

/// Minimum engagement every reel receives
pub const REEL_VIEW_FLOOR: u64 = 100;
pub const REEL_LIKE_FLOOR: u64 = 20;
pub const REEL_COMMENT_FLOOR: u64 = 5;
pub const REEL_SHARE_FLOOR: u64 = 2;

/// Immediate / +2s / +5s split of the planned post totals
pub const WAVE_FRACTIONS: [f64; 3] = [0.60, 0.25, 0.15];

/// Delays for waves 1 and 2 (wave 0 runs inline with the request)
pub const WAVE_DELAYS_MS: [u64; 2] = [2000, 5000];

/// Reactions given to each generated post comment
pub const POST_COMMENT_LIKE_RANGE: std::ops::RangeInclusive<u64> = 3..=12;
/// Reactions given to each generated reel comment
pub const REEL_COMMENT_LIKE_RANGE: std::ops::RangeInclusive<u64> = 10..=100;

/// Like/comment rates for a post author at a given audience size
pub fn post_rates(followers: i64) -> (f64, f64) {
    if followers > 100_000 {
        (0.55, 0.18)
    } else if followers > 50_000 {
        (0.45, 0.15)
    } else if followers > 10_000 {
        (0.40, 0.13)
    } else {
        (0.35, 0.12)
    }
}

/// Per-category rates for a reel author at a given audience size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReelRates {
    pub views: f64,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
}

pub fn reel_rates(followers: i64) -> ReelRates {
    if followers > 100_000 {
        ReelRates {
            views: 0.80,
            likes: 0.40,
            comments: 0.15,
            shares: 0.08,
        }
    } else if followers > 50_000 {
        ReelRates {
            views: 0.70,
            likes: 0.35,
            comments: 0.12,
            shares: 0.06,
        }
    } else if followers > 10_000 {
        ReelRates {
            views: 0.60,
            likes: 0.25,
            comments: 0.10,
            shares: 0.04,
        }
    } else {
        ReelRates {
            views: 0.40,
            likes: 0.20,
            comments: 0.08,
            shares: 0.03,
        }
    }
}

/// `max(floor_min, floor(followers * rate * jitter))`
fn scaled_count(followers: i64, rate: f64, jitter: f64, floor_min: u64) -> u64 {
    let audience = followers.max(0) as f64;
    let raw = (audience * rate * jitter).floor() as u64;
    raw.max(floor_min)
}

/// Planned totals for one post, before the wave split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostPlan {
    pub likes: u64,
    pub comments: u64,
    pub views: u64,
}

/// Size a post's engagement from the author's audience
///
/// Draw order: like jitter, comment jitter, view multiplier.
pub fn plan_post_engagement<R: Rng>(followers_count: Option<i64>, rng: &mut R) -> PostPlan {
    let followers = followers_count.unwrap_or(POST_DEFAULT_FOLLOWERS);
    let (like_rate, comment_rate) = post_rates(followers);

    let like_jitter = rng.gen_range(0.7..1.3);
    let likes = scaled_count(followers, like_rate, like_jitter, POST_LIKE_FLOOR);

    let comment_jitter = rng.gen_range(0.5..1.3);
    let comments = scaled_count(followers, comment_rate, comment_jitter, POST_COMMENT_FLOOR);

    // Views scale off the reaction count, not the audience
    let view_multiplier = rng.gen_range(3.0..8.0);
    let views = ((likes as f64 * view_multiplier).floor() as u64).max(POST_VIEW_FLOOR);

    PostPlan {
        likes,
        comments,
        views,
    }
}

/// Planned totals for one reel (single wave)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReelPlan {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

/// Size a reel's engagement from the author's audience
///
/// Draw order: view jitter, like jitter, comment jitter, share jitter.
pub fn plan_reel_engagement<R: Rng>(followers_count: Option<i64>, rng: &mut R) -> ReelPlan {
    let followers = followers_count.unwrap_or(0);
    let rates = reel_rates(followers);

    let view_jitter = rng.gen_range(0.8..1.2);
    let views = scaled_count(followers, rates.views, view_jitter, REEL_VIEW_FLOOR);

    let like_jitter = rng.gen_range(0.6..1.4);
    let likes = scaled_count(followers, rates.likes, like_jitter, REEL_LIKE_FLOOR);

    let comment_jitter = rng.gen_range(0.4..1.6);
    let comments = scaled_count(followers, rates.comments, comment_jitter, REEL_COMMENT_FLOOR);

    let share_jitter = rng.gen_range(0.3..1.7);
    let shares = scaled_count(followers, rates.shares, share_jitter, REEL_SHARE_FLOOR);

    ReelPlan {
        views,
        likes,
        comments,
        shares,
    }
}

/// Split a planned total into the three wave targets, each floored
///
/// Flooring per phase means the three targets can sum to slightly less
/// than the total; the remainder is simply never assigned.
pub fn wave_split(total: u64) -> [u64; 3] {
    [
        (total as f64 * WAVE_FRACTIONS[0]).floor() as u64,
        (total as f64 * WAVE_FRACTIONS[1]).floor() as u64,
        (total as f64 * WAVE_FRACTIONS[2]).floor() as u64,
    ]
}
