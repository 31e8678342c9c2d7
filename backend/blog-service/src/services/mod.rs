/// Business logic layer for blog-service
///
/// - Post service: CRUD, tag re-synchronization, likes, best posts
/// - Comment service: CRUD on comments under a post
/// - Tags: hashtag extraction from post text
///
/// Every mutation goes through the ownership policy before it reaches the
/// store.
pub mod comments;
pub mod posts;
pub mod tags;

// Re-export commonly used services
pub use comments::CommentService;
pub use posts::PostService;
pub use tags::{distinct_tag_names, extract_tags};
