//! Shared application state for the post API.

use std::sync::Arc;

use quire_db::Database;

use crate::service::PostService;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Post use-cases.
    pub posts: PostService,
}

impl AppState {
    /// Build state over a (possibly not yet connected) router.
    pub const fn new(db: Arc<Database>) -> Self {
        Self {
            posts: PostService::new(db),
        }
    }

    /// The router behind the service.
    pub fn database(&self) -> &Database {
        self.posts.database()
    }
}
