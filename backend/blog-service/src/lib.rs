/// Blog Service Library
///
/// Posts, comments, hashtags and likes over HTTP, with ownership-based
/// permissions.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `models`: Row types, serializations and request payloads
/// - `services`: Business logic, tag extraction
/// - `db`: Repository traits and the PostgreSQL store
/// - `middleware`: Optional JWT auth, ownership policy, request metrics
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use db::BlogStore;
use services::{CommentService, PostService};
use std::sync::Arc;

/// Shared per-application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
    pub best_posts_limit: i64,
}

impl AppState {
    pub fn new(store: Arc<dyn BlogStore>, best_posts_limit: i64) -> Self {
        Self {
            store,
            best_posts_limit,
        }
    }

    pub fn post_service(&self) -> PostService {
        PostService::new(self.store.clone())
    }

    pub fn comment_service(&self) -> CommentService {
        CommentService::new(self.store.clone())
    }
}
