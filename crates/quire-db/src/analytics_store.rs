//! Analytics event persistence.
//!
//! Events are append-only: recorded on the primary, queried through
//! ordinary (eventually consistent) reads.

use chrono::{DateTime, Utc};
use quire_types::{AnalyticsEvent, AnalyticsEventType, AnalyticsId, CreateAnalyticsEvent, PostId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ConnectionError;
use crate::router::{Consistency, Database};

/// Default row cap for [`AnalyticsStore::find_recent`].
pub const DEFAULT_RECENT_LIMIT: i64 = 100;

/// Operations on the `analytics` table.
pub struct AnalyticsStore<'a> {
    db: &'a Database,
}

impl<'a> AnalyticsStore<'a> {
    /// Create a new analytics store bound to the router.
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Record an event.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the insert fails or the stored row
    /// cannot be read back.
    pub async fn create(
        &self,
        data: &CreateAnalyticsEvent,
    ) -> Result<AnalyticsEvent, ConnectionError> {
        let id = AnalyticsId::new().into_inner();

        let row = self
            .db
            .execute_write(|pool: PgPool| async move {
                sqlx::query_as::<_, AnalyticsRow>(
                    r"INSERT INTO analytics (id, post_id, event_type, metadata)
                      VALUES ($1, $2, $3, $4)
                      RETURNING id, post_id, event_type, metadata, created_at",
                )
                .bind(id)
                .bind(data.post_id.into_inner())
                .bind(data.event_type.as_str())
                .bind(data.metadata.as_ref())
                .fetch_one(&pool)
                .await
            })
            .await?;

        tracing::debug!(
            post_id = %data.post_id,
            event_type = %data.event_type,
            "Recorded analytics event"
        );
        AnalyticsEvent::try_from(row)
    }

    /// All events for one post, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the query fails on every handle tried.
    pub async fn find_by_post(&self, post_id: PostId) -> Result<Vec<AnalyticsEvent>, ConnectionError> {
        let rows = self
            .db
            .execute_read(
                |pool: PgPool| async move {
                    sqlx::query_as::<_, AnalyticsRow>(
                        r"SELECT id, post_id, event_type, metadata, created_at
                          FROM analytics
                          WHERE post_id = $1
                          ORDER BY created_at DESC",
                    )
                    .bind(post_id.into_inner())
                    .fetch_all(&pool)
                    .await
                },
                Consistency::Eventual,
            )
            .await?;

        rows.into_iter().map(AnalyticsEvent::try_from).collect()
    }

    /// Number of events of one kind for one post.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the query fails on every handle tried.
    pub async fn count_by_post_and_type(
        &self,
        post_id: PostId,
        event_type: AnalyticsEventType,
    ) -> Result<i64, ConnectionError> {
        self.db
            .execute_read(
                |pool: PgPool| async move {
                    sqlx::query_scalar::<_, i64>(
                        r"SELECT COUNT(*) FROM analytics WHERE post_id = $1 AND event_type = $2",
                    )
                    .bind(post_id.into_inner())
                    .bind(event_type.as_str())
                    .fetch_one(&pool)
                    .await
                },
                Consistency::Eventual,
            )
            .await
    }

    /// The most recent events across all posts.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the query fails on every handle tried.
    pub async fn find_recent(&self, limit: i64) -> Result<Vec<AnalyticsEvent>, ConnectionError> {
        let rows = self
            .db
            .execute_read(
                |pool: PgPool| async move {
                    sqlx::query_as::<_, AnalyticsRow>(
                        r"SELECT id, post_id, event_type, metadata, created_at
                          FROM analytics
                          ORDER BY created_at DESC
                          LIMIT $1",
                    )
                    .bind(limit)
                    .fetch_all(&pool)
                    .await
                },
                Consistency::Eventual,
            )
            .await?;

        rows.into_iter().map(AnalyticsEvent::try_from).collect()
    }
}

/// A row from the `analytics` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalyticsRow {
    /// Event ID.
    pub id: Uuid,
    /// Post the event refers to.
    pub post_id: Uuid,
    /// Event kind as stored.
    pub event_type: String,
    /// Optional JSON payload.
    pub metadata: Option<serde_json::Value>,
    /// Timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AnalyticsRow> for AnalyticsEvent {
    type Error = ConnectionError;

    fn try_from(row: AnalyticsRow) -> Result<Self, Self::Error> {
        let event_type = AnalyticsEventType::from_db(&row.event_type).ok_or_else(|| {
            ConnectionError::CorruptRow(format!(
                "unknown analytics event type {:?} on row {}",
                row.event_type, row.id
            ))
        })?;

        Ok(Self {
            id: AnalyticsId::from(row.id),
            post_id: PostId::from(row.post_id),
            event_type,
            metadata: row.metadata,
            created_at: row.created_at,
        })
    }
}
