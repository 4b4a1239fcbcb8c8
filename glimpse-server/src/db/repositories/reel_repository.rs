use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use glimpse_types::{Reel, ReelComment};

use crate::db::DbPool;

pub struct ReelRepository {
    pool: DbPool,
}

impl ReelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get reel by ID
    #[allow(dead_code)]
    pub fn get_by_id(&self, reel_id: &Uuid) -> Result<Option<Reel>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, video_url, caption, views_count, created_at
             FROM reels
             WHERE id = ?",
        )?;

        let reel = stmt
            .query_row([reel_id.to_string()], |row| {
                Ok(Reel {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    user_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
                    video_url: row.get(2)?,
                    caption: row.get(3)?,
                    views_count: row.get(4)?,
                    created_at: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })
            .optional()?;

        Ok(reel)
    }

    /// Create a new reel
    #[allow(dead_code)]
    pub fn create(&self, reel: &Reel) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO reels (id, user_id, video_url, caption, views_count, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                reel.id.to_string(),
                reel.user_id.to_string(),
                &reel.video_url,
                &reel.caption,
                reel.views_count,
                reel.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to create reel")?;
        Ok(())
    }

    /// Insert a batch of reel reactions, returning how many rows landed
    pub fn insert_likes(&self, reel_id: &Uuid, user_ids: &[Uuid]) -> Result<u64> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction().context("Failed to start transaction")?;
        let now = Utc::now().to_rfc3339();

        let mut applied = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO reel_likes (user_id, reel_id, created_at) VALUES (?, ?, ?)",
            )?;
            for user_id in user_ids {
                applied += stmt.execute((user_id.to_string(), reel_id.to_string(), &now))? as u64;
            }
        }

        tx.commit().context("Failed to commit reel likes")?;
        Ok(applied)
    }

    /// Insert a batch of reel comments, returning how many rows landed
    pub fn insert_comments(&self, comments: &[ReelComment]) -> Result<u64> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction().context("Failed to start transaction")?;

        let mut applied = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO reel_comments (id, reel_id, user_id, content, created_at)
                 VALUES (?, ?, ?, ?, ?)",
            )?;
            for comment in comments {
                applied += stmt.execute((
                    comment.id.to_string(),
                    comment.reel_id.to_string(),
                    comment.user_id.to_string(),
                    &comment.content,
                    comment.created_at.to_rfc3339(),
                ))? as u64;
            }
        }

        tx.commit().context("Failed to commit reel comments")?;
        Ok(applied)
    }

    /// Insert a batch of (actor, comment) reaction pairs
    pub fn insert_comment_likes(&self, pairs: &[(Uuid, Uuid)]) -> Result<u64> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction().context("Failed to start transaction")?;
        let now = Utc::now().to_rfc3339();

        let mut applied = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO reel_comment_likes (user_id, comment_id, created_at)
                 VALUES (?, ?, ?)",
            )?;
            for (user_id, comment_id) in pairs {
                applied +=
                    stmt.execute((user_id.to_string(), comment_id.to_string(), &now))? as u64;
            }
        }

        tx.commit().context("Failed to commit reel comment likes")?;
        Ok(applied)
    }

    /// Insert a batch of shares, returning how many rows landed
    pub fn insert_shares(&self, reel_id: &Uuid, user_ids: &[Uuid]) -> Result<u64> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction().context("Failed to start transaction")?;
        let now = Utc::now().to_rfc3339();

        let mut applied = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO reel_shares (user_id, reel_id, created_at) VALUES (?, ?, ?)",
            )?;
            for user_id in user_ids {
                applied += stmt.execute((user_id.to_string(), reel_id.to_string(), &now))? as u64;
            }
        }

        tx.commit().context("Failed to commit reel shares")?;
        Ok(applied)
    }

    /// Overwrite the reel's view counter
    pub fn set_view_count(&self, reel_id: &Uuid, views: u64) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE reels SET views_count = ? WHERE id = ?",
            (views as i64, reel_id.to_string()),
        )
        .context("Failed to update reel view count")?;
        Ok(())
    }

    /// Count reactions on a reel
    #[allow(dead_code)]
    pub fn count_likes(&self, reel_id: &Uuid) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reel_likes WHERE reel_id = ?",
            [reel_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count shares on a reel
    #[allow(dead_code)]
    pub fn count_shares(&self, reel_id: &Uuid) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reel_shares WHERE reel_id = ?",
            [reel_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
