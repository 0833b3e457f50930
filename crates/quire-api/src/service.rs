//! Post use-cases composed from the post and analytics stores.
//!
//! The service decides which reads must be strong: after a caller's own
//! write (the view counter) the post is read back from the primary so the
//! caller always sees its increment.

use std::sync::Arc;

use quire_db::post_store::{DEFAULT_LIST_LIMIT, DEFAULT_PUBLISHED_LIMIT};
use quire_db::{AnalyticsStore, ConnectionError, Consistency, Database, PostStore};
use quire_types::{AnalyticsEventType, CreateAnalyticsEvent, CreatePost, Post, PostId, UpdatePost};

/// Message returned for every missing post.
pub const POST_NOT_FOUND: &str = "Post not found";

/// Errors surfaced by [`PostService`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The post does not exist (or is not yet visible on the replica).
    #[error("{0}")]
    NotFound(String),

    /// The data layer failed.
    #[error(transparent)]
    Database(#[from] ConnectionError),
}

/// Post operations exposed over HTTP.
#[derive(Debug, Clone)]
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    /// Create a service over a shared router.
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The router this service dispatches through.
    pub fn database(&self) -> &Database {
        &self.db
    }

    fn posts(&self) -> PostStore<'_> {
        PostStore::new(&self.db)
    }

    fn analytics(&self) -> AnalyticsStore<'_> {
        AnalyticsStore::new(&self.db)
    }

    /// Create a post and record a `post_created` event.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Database`] if either write fails. A failed
    /// analytics write is reported even though the post was stored.
    pub async fn create_post(&self, data: &CreatePost) -> Result<Post, ServiceError> {
        let post = self.posts().create(data).await?;

        self.analytics()
            .create(&CreateAnalyticsEvent {
                post_id: post.id,
                event_type: AnalyticsEventType::PostCreated,
                metadata: Some(serde_json::json!({ "authorId": data.author_id })),
            })
            .await?;

        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        Ok(post)
    }

    /// Apply a partial update.
    ///
    /// An update with no fields writes nothing (so `updated_at` is left
    /// alone) and returns the post as the primary has it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the post does not exist.
    pub async fn update_post(&self, id: PostId, data: &UpdatePost) -> Result<Post, ServiceError> {
        if data.is_empty() {
            return self.get_post_consistent(id).await;
        }
        self.posts().update(id, data).await?.ok_or_else(not_found)
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the post does not exist.
    pub async fn delete_post(&self, id: PostId) -> Result<(), ServiceError> {
        self.posts().delete(id).await?.ok_or_else(not_found)?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Fetch a post with an ordinary (possibly stale) read.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the serving handle has no such
    /// post.
    pub async fn get_post(&self, id: PostId) -> Result<Post, ServiceError> {
        self.posts()
            .find_by_id(id, Consistency::Eventual)
            .await?
            .ok_or_else(not_found)
    }

    /// Fetch a post from the primary.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the post does not exist.
    pub async fn get_post_consistent(&self, id: PostId) -> Result<Post, ServiceError> {
        self.posts()
            .find_by_id(id, Consistency::Strong)
            .await?
            .ok_or_else(not_found)
    }

    /// Count a view, record a `post_viewed` event, and return the post as
    /// the primary now has it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the post does not exist; in
    /// that case no analytics event is recorded.
    pub async fn view_post(&self, id: PostId) -> Result<Post, ServiceError> {
        self.posts()
            .increment_view_count(id)
            .await?
            .ok_or_else(not_found)?;

        self.analytics()
            .create(&CreateAnalyticsEvent {
                post_id: id,
                event_type: AnalyticsEventType::PostViewed,
                metadata: None,
            })
            .await?;

        self.get_post_consistent(id).await
    }

    /// Published posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Database`] if the read fails.
    pub async fn list_published_posts(&self) -> Result<Vec<Post>, ServiceError> {
        Ok(self.posts().find_published(DEFAULT_PUBLISHED_LIMIT).await?)
    }

    /// Posts by one author, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Database`] if the read fails.
    pub async fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>, ServiceError> {
        Ok(self.posts().find_by_author(author_id).await?)
    }

    /// All posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Database`] if the read fails.
    pub async fn list_all_posts(&self) -> Result<Vec<Post>, ServiceError> {
        Ok(self.posts().find_all(DEFAULT_LIST_LIMIT).await?)
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound(POST_NOT_FOUND.to_owned())
}
