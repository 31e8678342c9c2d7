/// Database access layer
///
/// Handlers never touch a global query set. They receive a `BlogStore`
/// through application state and go through the repository traits below.
/// `PgStore` is the PostgreSQL implementation; the free functions in the
/// `*_repo` modules hold its SQL.
use crate::error::{AppError, Result};
use crate::models::{Comment, Pagination, Post, Tag};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub mod comment_repo;
pub mod post_repo;
pub mod tag_repo;

/// Post persistence. Writes that change content also re-link tags, in the
/// same transaction.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list_posts(&self, page: Pagination) -> Result<Vec<Post>>;

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// Insert a post and link it to `tag_names` (get-or-create each tag).
    async fn create_post(&self, author_id: Uuid, content: &str, tag_names: &[String])
        -> Result<Post>;

    /// Replace a post's content and its tag links. `None` if the post is gone.
    async fn update_post(
        &self,
        post_id: Uuid,
        content: &str,
        tag_names: &[String],
    ) -> Result<Option<Post>>;

    /// Delete a post and, by cascade, its comments and tag links.
    async fn delete_post(&self, post_id: Uuid) -> Result<bool>;

    /// Atomically add one like; returns the new count, `None` if no such post.
    async fn increment_like_count(&self, post_id: Uuid) -> Result<Option<i64>>;

    /// Posts by like count descending, ties by creation time then id.
    async fn top_liked_posts(&self, limit: i64) -> Result<Vec<Post>>;

    async fn post_tags(&self, post_id: Uuid) -> Result<Vec<Tag>>;

    async fn post_likers(&self, post_id: Uuid) -> Result<Vec<Uuid>>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments of a post, oldest first.
    async fn list_comments(&self, post_id: Uuid, page: Pagination) -> Result<Vec<Comment>>;

    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<Comment>>;

    /// Fails with `NotFound` if the parent post no longer exists.
    async fn create_comment(&self, post_id: Uuid, author_id: Uuid, content: &str)
        -> Result<Comment>;

    async fn update_comment(&self, comment_id: Uuid, content: &str) -> Result<Option<Comment>>;

    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_tag(&self, name: &str) -> Result<Option<Tag>>;

    /// Posts linked to a tag, newest first.
    async fn posts_with_tag(&self, tag_id: Uuid) -> Result<Vec<Post>>;
}

/// Everything the HTTP layer needs from storage.
pub trait BlogStore: PostRepository + CommentRepository + TagRepository {}

impl<T> BlogStore for T where T: PostRepository + CommentRepository + TagRepository {}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}

#[async_trait]
impl PostRepository for PgStore {
    async fn list_posts(&self, page: Pagination) -> Result<Vec<Post>> {
        Ok(post_repo::list_posts(&self.pool, page.limit, page.offset).await?)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(post_repo::find_post_by_id(&self.pool, post_id).await?)
    }

    async fn create_post(
        &self,
        author_id: Uuid,
        content: &str,
        tag_names: &[String],
    ) -> Result<Post> {
        Ok(post_repo::create_post(&self.pool, author_id, content, tag_names).await?)
    }

    async fn update_post(
        &self,
        post_id: Uuid,
        content: &str,
        tag_names: &[String],
    ) -> Result<Option<Post>> {
        Ok(post_repo::update_post_content(&self.pool, post_id, content, tag_names).await?)
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        Ok(post_repo::delete_post(&self.pool, post_id).await?)
    }

    async fn increment_like_count(&self, post_id: Uuid) -> Result<Option<i64>> {
        Ok(post_repo::increment_like_count(&self.pool, post_id).await?)
    }

    async fn top_liked_posts(&self, limit: i64) -> Result<Vec<Post>> {
        Ok(post_repo::top_liked_posts(&self.pool, limit).await?)
    }

    async fn post_tags(&self, post_id: Uuid) -> Result<Vec<Tag>> {
        Ok(tag_repo::find_tags_by_post(&self.pool, post_id).await?)
    }

    async fn post_likers(&self, post_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(post_repo::find_post_likers(&self.pool, post_id).await?)
    }
}

#[async_trait]
impl CommentRepository for PgStore {
    async fn list_comments(&self, post_id: Uuid, page: Pagination) -> Result<Vec<Comment>> {
        Ok(comment_repo::get_comments_by_post(&self.pool, post_id, page.limit, page.offset).await?)
    }

    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        Ok(comment_repo::get_comment_by_id(&self.pool, comment_id).await?)
    }

    async fn create_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        comment_repo::create_comment(&self.pool, post_id, author_id, content)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    AppError::NotFound(format!("Post {}", post_id))
                } else {
                    err.into()
                }
            })
    }

    async fn update_comment(&self, comment_id: Uuid, content: &str) -> Result<Option<Comment>> {
        Ok(comment_repo::update_comment(&self.pool, comment_id, content).await?)
    }

    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool> {
        Ok(comment_repo::delete_comment(&self.pool, comment_id).await?)
    }
}

#[async_trait]
impl TagRepository for PgStore {
    async fn find_tag(&self, name: &str) -> Result<Option<Tag>> {
        Ok(tag_repo::find_tag_by_name(&self.pool, name).await?)
    }

    async fn posts_with_tag(&self, tag_id: Uuid) -> Result<Vec<Post>> {
        Ok(tag_repo::find_posts_by_tag(&self.pool, tag_id).await?)
    }
}

/// SQLSTATE 23503: the referenced row disappeared under us.
fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}
