//! REST endpoint handlers for the post API.
//!
//! Handlers parse and validate input, then delegate to
//! [`PostService`](crate::service::PostService). They never pick a
//! database endpoint themselves; the only routing input they pass on is
//! whether a read must be strong.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/posts` | Create a post |
//! | `GET` | `/posts` | List posts (`authorId`, `published=true`) |
//! | `GET` | `/posts/{id}` | Get one post (`consistent=true` reads the primary) |
//! | `PUT` | `/posts/{id}` | Partially update a post |
//! | `DELETE` | `/posts/{id}` | Delete a post |
//! | `POST` | `/posts/{id}/view` | Count a view and return the fresh post |
//! | `GET` | `/health` | Handle states and routing flags |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use quire_db::{ConnectionHandle, Consistency, HandleState};
use quire_types::{CreatePost, Post, PostId, UpdatePost};
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies and query parameters
// ---------------------------------------------------------------------------

/// Body of `POST /posts`.
#[derive(Debug, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Post title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Post body.
    #[validate(length(min = 1))]
    pub content: String,
    /// Author identifier.
    #[validate(length(min = 1, max = 100))]
    pub author_id: String,
}

impl From<CreatePostRequest> for CreatePost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            author_id: req.author_id,
        }
    }
}

/// Body of `PUT /posts/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    /// New title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// New body.
    #[validate(length(min = 1))]
    pub content: Option<String>,
    /// New publication flag.
    pub published: Option<bool>,
}

impl From<UpdatePostRequest> for UpdatePost {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            published: req.published,
        }
    }
}

/// Query parameters for `GET /posts/{id}`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct GetPostQuery {
    /// `true` forces a read from the primary.
    pub consistent: Option<String>,
}

/// Query parameters for `GET /posts`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ListPostsQuery {
    /// Only posts by this author. Takes precedence over `published`.
    #[serde(rename = "authorId")]
    pub author_id: Option<String>,
    /// `true` lists published posts only.
    pub published: Option<String>,
}

fn is_true(flag: Option<&str>) -> bool {
    flag == Some("true")
}

fn parse_post_id(raw: &str) -> Result<PostId, ApiError> {
    raw.parse()
        .map_err(|e| ApiError::InvalidUuid(format!("{raw}: {e}")))
}

// ---------------------------------------------------------------------------
// Post handlers
// ---------------------------------------------------------------------------

/// Create a post.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let post = state.posts.create_post(&req.into()).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Partially update a post.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_post_id(&id)?;
    let Json(req) = payload?;
    req.validate()?;

    let post = state.posts.update_post(id, &req.into()).await?;
    Ok(Json(post))
}

/// Delete a post.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_post_id(&id)?;
    state.posts.delete_post(id).await?;
    Ok(Json(serde_json::json!({ "message": "Post deleted" })))
}

/// Get one post.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<GetPostQuery>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_post_id(&id)?;

    let post = match Consistency::strong_if(is_true(query.consistent.as_deref())) {
        Consistency::Strong => state.posts.get_post_consistent(id).await?,
        Consistency::Eventual => state.posts.get_post(id).await?,
    };
    Ok(Json(post))
}

/// Count a view and return the post as the primary now has it.
pub async fn view_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let id = parse_post_id(&id)?;
    let post = state.posts.view_post(id).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// List posts.
///
/// A non-empty `authorId` wins; otherwise `published=true` lists published
/// posts; otherwise everything is listed.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let author = query.author_id.as_deref().filter(|a| !a.is_empty());

    let posts = match author {
        Some(author_id) => state.posts.list_posts_by_author(author_id).await?,
        None if is_true(query.published.as_deref()) => {
            state.posts.list_published_posts().await?
        }
        None => state.posts.list_all_posts().await?,
    };
    Ok(Json(posts))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Response body of `GET /health`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` when the primary is connected, `degraded` otherwise.
    pub status: &'static str,
    /// Primary handle state.
    pub primary: HandleState,
    /// Replica handle state, absent when reads share the primary.
    pub replica: Option<HandleState>,
    /// Whether failed replica reads are retried on the primary.
    pub fallback_to_primary: bool,
}

/// Report handle states. Answers 503 while the primary is not connected.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let db = state.database();
    let primary = db.write_handle().state();
    let replica = db.has_replica().then(|| db.read_handle().state());

    let healthy = primary == HandleState::Connected;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        primary,
        replica,
        fallback_to_primary: db.fallback_to_primary(),
    };
    (status, Json(body))
}
