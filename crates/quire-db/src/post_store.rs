//! Post persistence expressed through the read/write router.
//!
//! Every mutation goes through [`Database::execute_write`]. Lookups go
//! through [`Database::execute_read`]; only [`PostStore::find_by_id`] lets
//! the caller ask for a strong read; listings are always eventual.

use chrono::{DateTime, Utc};
use quire_types::{CreatePost, Post, PostId, UpdatePost};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ConnectionError;
use crate::router::{Consistency, Database};

/// Default row cap for [`PostStore::find_published`].
pub const DEFAULT_PUBLISHED_LIMIT: i64 = 50;

/// Default row cap for [`PostStore::find_all`].
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Column list shared by every query that returns whole posts.
const POST_COLUMNS: &str =
    "id, title, content, author_id, published, view_count, created_at, updated_at";

/// Operations on the `posts` table.
pub struct PostStore<'a> {
    db: &'a Database,
}

impl<'a> PostStore<'a> {
    /// Create a new post store bound to the router.
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new post on the primary.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the insert fails.
    pub async fn create(&self, data: &CreatePost) -> Result<Post, ConnectionError> {
        let id = PostId::new().into_inner();
        let sql = format!(
            "INSERT INTO posts (id, title, content, author_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {POST_COLUMNS}"
        );

        let row = self
            .db
            .execute_write(|pool: PgPool| {
                let sql = sql.as_str();
                async move {
                    sqlx::query_as::<_, PostRow>(sql)
                        .bind(id)
                        .bind(data.title.as_str())
                        .bind(data.content.as_str())
                        .bind(data.author_id.as_str())
                        .fetch_one(&pool)
                        .await
                }
            })
            .await?;

        tracing::debug!(post_id = %row.id, author_id = %row.author_id, "Created post");
        Ok(row.into())
    }

    /// Apply a partial update. Absent fields keep their stored value.
    ///
    /// Returns `None` if the post does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the update fails.
    pub async fn update(
        &self,
        id: PostId,
        data: &UpdatePost,
    ) -> Result<Option<Post>, ConnectionError> {
        let sql = format!(
            "UPDATE posts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                published = COALESCE($4, published),
                updated_at = now()
             WHERE id = $1
             RETURNING {POST_COLUMNS}"
        );

        let row = self
            .db
            .execute_write(|pool: PgPool| {
                let sql = sql.as_str();
                async move {
                    sqlx::query_as::<_, PostRow>(sql)
                        .bind(id.into_inner())
                        .bind(data.title.as_deref())
                        .bind(data.content.as_deref())
                        .bind(data.published)
                        .fetch_optional(&pool)
                        .await
                }
            })
            .await?;

        Ok(row.map(Post::from))
    }

    /// Delete a post, returning the deleted row.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the delete fails.
    pub async fn delete(&self, id: PostId) -> Result<Option<Post>, ConnectionError> {
        let sql = format!("DELETE FROM posts WHERE id = $1 RETURNING {POST_COLUMNS}");

        let row = self
            .db
            .execute_write(|pool: PgPool| {
                let sql = sql.as_str();
                async move {
                    sqlx::query_as::<_, PostRow>(sql)
                        .bind(id.into_inner())
                        .fetch_optional(&pool)
                        .await
                }
            })
            .await?;

        if row.is_some() {
            tracing::debug!(post_id = %id, "Deleted post");
        }
        Ok(row.map(Post::from))
    }

    /// Atomically add one to the view counter.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the update fails.
    pub async fn increment_view_count(&self, id: PostId) -> Result<Option<Post>, ConnectionError> {
        let sql = format!(
            "UPDATE posts SET view_count = view_count + 1, updated_at = now()
             WHERE id = $1
             RETURNING {POST_COLUMNS}"
        );

        let row = self
            .db
            .execute_write(|pool: PgPool| {
                let sql = sql.as_str();
                async move {
                    sqlx::query_as::<_, PostRow>(sql)
                        .bind(id.into_inner())
                        .fetch_optional(&pool)
                        .await
                }
            })
            .await?;

        Ok(row.map(Post::from))
    }

    /// Look up a single post.
    ///
    /// Pass [`Consistency::Strong`] to read from the primary, for example
    /// right after a write by the same caller.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the query fails on every handle tried.
    pub async fn find_by_id(
        &self,
        id: PostId,
        consistency: Consistency,
    ) -> Result<Option<Post>, ConnectionError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");

        let row = self
            .db
            .execute_read(
                |pool: PgPool| {
                    let sql = sql.as_str();
                    async move {
                        sqlx::query_as::<_, PostRow>(sql)
                            .bind(id.into_inner())
                            .fetch_optional(&pool)
                            .await
                    }
                },
                consistency,
            )
            .await?;

        Ok(row.map(Post::from))
    }

    /// All posts by one author, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the query fails on every handle tried.
    pub async fn find_by_author(&self, author_id: &str) -> Result<Vec<Post>, ConnectionError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = $1 ORDER BY created_at DESC"
        );

        let rows = self
            .db
            .execute_read(
                |pool: PgPool| {
                    let sql = sql.as_str();
                    async move {
                        sqlx::query_as::<_, PostRow>(sql)
                            .bind(author_id)
                            .fetch_all(&pool)
                            .await
                    }
                },
                Consistency::Eventual,
            )
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// Published posts, newest first, at most `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the query fails on every handle tried.
    pub async fn find_published(&self, limit: i64) -> Result<Vec<Post>, ConnectionError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE published ORDER BY created_at DESC LIMIT $1"
        );

        let rows = self
            .db
            .execute_read(
                |pool: PgPool| {
                    let sql = sql.as_str();
                    async move {
                        sqlx::query_as::<_, PostRow>(sql)
                            .bind(limit)
                            .fetch_all(&pool)
                            .await
                    }
                },
                Consistency::Eventual,
            )
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// Every post, newest first, at most `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the query fails on every handle tried.
    pub async fn find_all(&self, limit: i64) -> Result<Vec<Post>, ConnectionError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC LIMIT $1");

        let rows = self
            .db
            .execute_read(
                |pool: PgPool| {
                    let sql = sql.as_str();
                    async move {
                        sqlx::query_as::<_, PostRow>(sql)
                            .bind(limit)
                            .fetch_all(&pool)
                            .await
                    }
                },
                Consistency::Eventual,
            )
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }
}

/// A row from the `posts` table.
///
/// Uses runtime types rather than compile-time checked types to
/// avoid requiring a live database during builds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    /// Post ID.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Author identifier.
    pub author_id: String,
    /// Published flag.
    pub published: bool,
    /// View counter.
    pub view_count: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::from(row.id),
            title: row.title,
            content: row.content,
            author_id: row.author_id,
            published: row.published,
            view_count: row.view_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
