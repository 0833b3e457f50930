//! Axum router construction for the post API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- handle states
/// - `GET /posts`, `POST /posts` -- list and create
/// - `GET /posts/{id}`, `PUT /posts/{id}`, `DELETE /posts/{id}`
/// - `POST /posts/{id}/view` -- count a view
///
/// CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/posts/{id}/view", post(handlers::view_post))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
