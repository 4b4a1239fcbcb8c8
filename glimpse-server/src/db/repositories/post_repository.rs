use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use glimpse_types::{Comment, Post};

use crate::db::DbPool;

pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get post by ID
    #[allow(dead_code)]
    pub fn get_by_id(&self, post_id: &Uuid) -> Result<Option<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, image_url, caption, views_count, created_at
             FROM posts
             WHERE id = ?",
        )?;

        let post = stmt
            .query_row([post_id.to_string()], |row| {
                Ok(Post {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    user_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
                    image_url: row.get(2)?,
                    caption: row.get(3)?,
                    views_count: row.get(4)?,
                    created_at: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })
            .optional()?;

        Ok(post)
    }

    /// Create a new post
    #[allow(dead_code)]
    pub fn create(&self, post: &Post) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (id, user_id, image_url, caption, views_count, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                post.id.to_string(),
                post.user_id.to_string(),
                &post.image_url,
                &post.caption,
                post.views_count,
                post.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to create post")?;
        Ok(())
    }

    /// Insert a batch of post reactions, returning how many rows landed
    ///
    /// Runs as one transaction of `INSERT OR IGNORE`, so an actor who
    /// already reacted to the post (e.g. in an earlier wave) is a no-op
    /// and simply not counted.
    pub fn insert_likes(&self, post_id: &Uuid, user_ids: &[Uuid]) -> Result<u64> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction().context("Failed to start transaction")?;
        let now = Utc::now().to_rfc3339();

        let mut applied = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO likes (user_id, post_id, created_at) VALUES (?, ?, ?)",
            )?;
            for user_id in user_ids {
                applied += stmt.execute((user_id.to_string(), post_id.to_string(), &now))? as u64;
            }
        }

        tx.commit().context("Failed to commit likes")?;
        Ok(applied)
    }

    /// Insert a batch of comments, returning how many rows landed
    pub fn insert_comments(&self, comments: &[Comment]) -> Result<u64> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction().context("Failed to start transaction")?;

        let mut applied = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO comments (id, post_id, user_id, content, created_at)
                 VALUES (?, ?, ?, ?, ?)",
            )?;
            for comment in comments {
                applied += stmt.execute((
                    comment.id.to_string(),
                    comment.post_id.to_string(),
                    comment.user_id.to_string(),
                    &comment.content,
                    comment.created_at.to_rfc3339(),
                ))? as u64;
            }
        }

        tx.commit().context("Failed to commit comments")?;
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
                "INSERT OR IGNORE INTO comment_likes (user_id, comment_id, created_at)
                 VALUES (?, ?, ?)",
            )?;
            for (user_id, comment_id) in pairs {
                applied +=
                    stmt.execute((user_id.to_string(), comment_id.to_string(), &now))? as u64;
            }
        }

        tx.commit().context("Failed to commit comment likes")?;
        Ok(applied)
    }

    /// Overwrite the post's view counter
    pub fn set_view_count(&self, post_id: &Uuid, views: u64) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE posts SET views_count = ? WHERE id = ?",
            (views as i64, post_id.to_string()),
        )
        .context("Failed to update post view count")?;
        Ok(())
    }

    /// Count reactions on a post
    #[allow(dead_code)]
    pub fn count_likes(&self, post_id: &Uuid) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE post_id = ?",
            [post_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count comments on a post
    #[allow(dead_code)]
    pub fn count_comments(&self, post_id: &Uuid) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE post_id = ?",
            [post_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
