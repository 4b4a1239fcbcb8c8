/// SQL schema for the Glimpse database
/// Creates all tables with proper constraints, foreign keys, and indexes
pub const SCHEMA: &str = r#"
-- Profiles table (real creators and the synthetic actor pool)
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    username TEXT UNIQUE NOT NULL,
    full_name TEXT,
    avatar_url TEXT,
    bio TEXT,
    followers_count INTEGER,
    following_count INTEGER NOT NULL DEFAULT 0,
    is_bot INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Index for fetching the synthetic actor pool
CREATE INDEX IF NOT EXISTS idx_profiles_is_bot ON profiles(is_bot);

-- Posts table (photo content)
CREATE TABLE IF NOT EXISTS posts (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    image_url TEXT NOT NULL,
    caption TEXT,
    views_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_posts_user_id ON posts(user_id);
CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at DESC);

-- Reels table (short video content)
CREATE TABLE IF NOT EXISTS reels (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    video_url TEXT NOT NULL,
    caption TEXT,
    views_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_reels_user_id ON reels(user_id);
CREATE INDEX IF NOT EXISTS idx_reels_created_at ON reels(created_at DESC);

-- Post reactions; the composite key makes one reaction per user per post
CREATE TABLE IF NOT EXISTS likes (
    user_id TEXT NOT NULL,
    post_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, post_id),
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE,
    FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_likes_post_id ON likes(post_id);

-- Post comments
CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    post_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments(post_id);

-- Reactions on post comments
CREATE TABLE IF NOT EXISTS comment_likes (
    user_id TEXT NOT NULL,
    comment_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, comment_id),
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE,
    FOREIGN KEY (comment_id) REFERENCES comments(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_comment_likes_comment_id ON comment_likes(comment_id);

-- Reel reactions
CREATE TABLE IF NOT EXISTS reel_likes (
    user_id TEXT NOT NULL,
    reel_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, reel_id),
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE,
    FOREIGN KEY (reel_id) REFERENCES reels(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_reel_likes_reel_id ON reel_likes(reel_id);

-- Reel comments
CREATE TABLE IF NOT EXISTS reel_comments (
    id TEXT PRIMARY KEY,
    reel_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (reel_id) REFERENCES reels(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_reel_comments_reel_id ON reel_comments(reel_id);

-- Reactions on reel comments
CREATE TABLE IF NOT EXISTS reel_comment_likes (
    user_id TEXT NOT NULL,
    comment_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, comment_id),
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE,
    FOREIGN KEY (comment_id) REFERENCES reel_comments(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_reel_comment_likes_comment_id ON reel_comment_likes(comment_id);

-- Reel shares
CREATE TABLE IF NOT EXISTS reel_shares (
    user_id TEXT NOT NULL,
    reel_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, reel_id),
    FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE,
    FOREIGN KEY (reel_id) REFERENCES reels(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_reel_shares_reel_id ON reel_shares(reel_id);

-- Durable queue for delayed engagement waves
CREATE TABLE IF NOT EXISTS engagement_jobs (
    id TEXT PRIMARY KEY,
    post_id TEXT NOT NULL,
    wave INTEGER NOT NULL,
    likes_target INTEGER NOT NULL,
    comments_target INTEGER NOT NULL,
    rng_seed INTEGER NOT NULL,
    run_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending' CHECK(status IN ('pending', 'running', 'completed', 'failed')),
    error TEXT,
    applied_likes INTEGER,
    applied_comments INTEGER,
    applied_comment_likes INTEGER,
    created_at TEXT NOT NULL,
    completed_at TEXT,
    FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
);

-- The scheduler polls on (status, run_at)
CREATE INDEX IF NOT EXISTS idx_engagement_jobs_status_run_at ON engagement_jobs(status, run_at);
CREATE INDEX IF NOT EXISTS idx_engagement_jobs_post_id ON engagement_jobs(post_id);
"#;

/// Demo data for development and testing
/// Includes enough of the platform to exercise the engagement generator:
/// - 4 creator profiles spanning the follower tiers (unknown, zero, mid, large)
/// - 12 synthetic actor profiles (the bot pool)
/// - One post and one reel to point the generator at
pub const DEMO_DATA: &str = r#"
-- ============================================================================
-- CREATOR PROFILES
-- ============================================================================
-- followers_count NULL means the count was never backfilled; 0 is a real
-- zero-follower account. The two behave differently in engagement sizing.
INSERT OR IGNORE INTO profiles (id, username, full_name, bio, followers_count, following_count, is_bot, created_at) VALUES
    ('a50e8400-e29b-41d4-a716-446655440001', 'maya.captures', 'Maya Torres', 'Street photography and golden hours 📷', NULL, 182, 0, '2024-02-01T00:00:00Z'),
    ('a50e8400-e29b-41d4-a716-446655440002', 'fresh.account', 'Sam Iwu', 'Just got here 👋', 0, 12, 0, '2024-02-02T00:00:00Z'),
    ('a50e8400-e29b-41d4-a716-446655440003', 'wanderlens', 'Leah Kim', 'Travel reels from 43 countries ✈️', 15000, 890, 0, '2024-02-03T00:00:00Z'),
    ('a50e8400-e29b-41d4-a716-446655440004', 'citychaser', 'Dario Mancini', 'Rooftops, neon, motion 🌃', 150000, 301, 0, '2024-02-04T00:00:00Z');

-- ============================================================================
-- SYNTHETIC ACTOR POOL
-- ============================================================================
-- The accounts the generator assigns reactions, comments, and shares from
INSERT OR IGNORE INTO profiles (id, username, full_name, followers_count, following_count, is_bot, created_at) VALUES
    ('b50e8400-e29b-41d4-a716-446655440001', 'aesthetic.ava', 'Ava Brooks', 320, 410, 1, '2024-01-10T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440002', 'luna_vibes', 'Luna Park', 280, 390, 1, '2024-01-10T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440003', 'pixelpete', 'Pete Navarro', 150, 200, 1, '2024-01-10T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440004', 'goldenhourgal', 'Harper Quinn', 510, 620, 1, '2024-01-11T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440005', 'coffee.nomad', 'Theo Lang', 95, 340, 1, '2024-01-11T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440006', 'skyline.sage', 'Sage Okafor', 430, 510, 1, '2024-01-11T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440007', 'wavelengthwill', 'Will Sato', 220, 180, 1, '2024-01-12T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440008', 'neon.nights', 'Nina Volkov', 610, 700, 1, '2024-01-12T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440009', 'driftwood.dan', 'Dan Pires', 130, 250, 1, '2024-01-12T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440010', 'fernandflora', 'Fern Castillo', 340, 460, 1, '2024-01-13T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440011', 'midnight.mocha', 'Mo Haddad', 270, 300, 1, '2024-01-13T00:00:00Z'),
    ('b50e8400-e29b-41d4-a716-446655440012', 'prismpaths', 'Iris Wendel', 190, 230, 1, '2024-01-13T00:00:00Z');

-- ============================================================================
-- SAMPLE CONTENT
-- ============================================================================
INSERT OR IGNORE INTO posts (id, user_id, image_url, caption, views_count, created_at) VALUES
    ('c50e8400-e29b-41d4-a716-446655440001', 'a50e8400-e29b-41d4-a716-446655440001', 'https://images.glimpse.app/demo/pier-sunset.jpg', 'Golden hour at the pier 🌅', 0, '2024-02-10T18:20:00Z');

INSERT OR IGNORE INTO reels (id, user_id, video_url, caption, views_count, created_at) VALUES
    ('d50e8400-e29b-41d4-a716-446655440001', 'a50e8400-e29b-41d4-a716-446655440003', 'https://videos.glimpse.app/demo/market-walk.mp4', 'POV: morning market in Hoi An ☀️', 0, '2024-02-11T07:45:00Z');
"#;
