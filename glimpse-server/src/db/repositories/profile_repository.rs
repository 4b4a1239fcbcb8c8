use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use glimpse_types::Profile;

use crate::db::DbPool;

pub struct ProfileRepository {
    pool: DbPool,
}

impl ProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get profile by ID
    pub fn get_by_id(&self, profile_id: &Uuid) -> Result<Option<Profile>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, full_name, avatar_url, bio, followers_count, following_count, is_bot, created_at
             FROM profiles
             WHERE id = ?",
        )?;

        let profile = stmt
            .query_row([profile_id.to_string()], |row| {
                Ok(Profile {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    username: row.get(1)?,
                    full_name: row.get(2)?,
                    avatar_url: row.get(3)?,
                    bio: row.get(4)?,
                    followers_count: row.get(5)?,
                    following_count: row.get(6)?,
                    is_bot: row.get::<_, i32>(7)? == 1,
                    created_at: row.get::<_, String>(8)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })
            .optional()?;

        Ok(profile)
    }

    /// Get the synthetic actor pool, in stable username order
    ///
    /// The order matters: sampling indexes into this list, so a stable
    /// order keeps seeded runs reproducible.
    pub fn bot_ids(&self) -> Result<Vec<Uuid>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id FROM profiles WHERE is_bot = 1 ORDER BY username",
        )?;

        let ids = stmt
            .query_map([], |row| {
                Ok(Uuid::parse_str(&row.get::<_, String>(0)?).unwrap())
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    /// Count the synthetic actor pool
    pub fn count_bots(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM profiles WHERE is_bot = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Create a new profile
    #[allow(dead_code)]
    pub fn create(&self, profile: &Profile) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO profiles (id, username, full_name, avatar_url, bio, followers_count, following_count, is_bot, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                profile.id.to_string(),
                &profile.username,
                &profile.full_name,
                &profile.avatar_url,
                &profile.bio,
                profile.followers_count,
                profile.following_count,
                if profile.is_bot { 1 } else { 0 },
                profile.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to create profile")?;
        Ok(())
    }
}
