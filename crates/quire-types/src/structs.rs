//! Record and payload structs for posts and analytics events.
//!
//! Records are what the data layer returns; payloads are the
//! already-validated inputs the data layer accepts. Field names are
//! camelCase on the wire to match existing API clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::AnalyticsEventType;
use crate::ids::{AnalyticsId, PostId};

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Post {
    /// Unique post identifier.
    pub id: PostId,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Opaque identifier of the author.
    pub author_id: String,
    /// Whether the post is visible in the published listing.
    pub published: bool,
    /// Number of times the view endpoint was hit for this post.
    pub view_count: i32,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CreatePost {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Opaque identifier of the author.
    pub author_id: String,
}

/// Partial update for a post. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UpdatePost {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New published flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl UpdatePost {
    /// True when the update would not change any column.
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.published.is_none()
    }
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// A recorded analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AnalyticsEvent {
    /// Unique event identifier.
    pub id: AnalyticsId,
    /// The post the event refers to.
    pub post_id: PostId,
    /// What happened.
    pub event_type: AnalyticsEventType,
    /// Free-form JSON payload.
    pub metadata: Option<serde_json::Value>,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

/// Input for recording an analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CreateAnalyticsEvent {
    /// The post the event refers to.
    pub post_id: PostId,
    /// What happened.
    pub event_type: AnalyticsEventType,
    /// Free-form JSON payload.
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_serializes_camel_case() {
        let now = Utc::now();
        let post = Post {
            id: PostId::new(),
            title: "Hello".to_owned(),
            content: "World".to_owned(),
            author_id: "author-123".to_owned(),
            published: false,
            view_count: 3,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&post).unwrap_or_default();
        assert_eq!(json.get("authorId"), Some(&serde_json::json!("author-123")));
        assert_eq!(json.get("viewCount"), Some(&serde_json::json!(3)));
        assert!(json.get("createdAt").is_some());
        assert!(json.get("author_id").is_none());
    }

    #[test]
    fn update_accepts_partial_body() {
        let update: UpdatePost =
            serde_json::from_str(r#"{"title":"Updated"}"#).unwrap_or_default();
        assert_eq!(update.title.as_deref(), Some("Updated"));
        assert!(update.content.is_none());
        assert!(!update.is_empty());
        assert!(UpdatePost::default().is_empty());
    }
}
