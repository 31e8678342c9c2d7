/// Post service - handles post creation, retrieval, ranking and likes
use crate::db::BlogStore;
use crate::error::{AppError, Result};
use crate::metrics::blog::{POSTS_CREATED_TOTAL, POST_LIKES_TOTAL, TAGS_SYNCED_TOTAL};
use crate::middleware::permissions::{authorize, Operation};
use crate::models::{
    LikeResponse, Pagination, PatchPostRequest, Post, PostContentRequest, PostDetail, PostSummary,
};
use crate::services::tags::distinct_tag_names;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct PostService {
    store: Arc<dyn BlogStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// List posts, newest first
    pub async fn list_posts(
        &self,
        actor: Option<Uuid>,
        page: Pagination,
    ) -> Result<Vec<PostSummary>> {
        authorize(Operation::List, actor, None, "post")?;

        let posts = self.store.list_posts(page).await?;
        Ok(posts.into_iter().map(PostSummary::from).collect())
    }

    /// Get a post with its tags, likers and comments
    pub async fn get_post(&self, actor: Option<Uuid>, post_id: Uuid) -> Result<PostDetail> {
        let post = self.require_post(post_id).await?;
        authorize(Operation::Read, actor, Some(post.author_id), "post")?;

        self.detail(post).await
    }

    /// Create a post owned by `actor` and link its hashtags
    pub async fn create_post(
        &self,
        actor: Option<Uuid>,
        req: PostContentRequest,
    ) -> Result<PostDetail> {
        authorize(Operation::Create, actor, None, "post")?;
        let author_id =
            actor.ok_or_else(|| AppError::Unauthorized("sign in to create a post".into()))?;
        req.validate()?;

        let tag_names = distinct_tag_names(&req.content);
        let post = self
            .store
            .create_post(author_id, &req.content, &tag_names)
            .await?;

        POSTS_CREATED_TOTAL.inc();
        TAGS_SYNCED_TOTAL.inc_by(tag_names.len() as u64);
        tracing::info!(
            post_id = %post.id,
            author_id = %author_id,
            tags = tag_names.len(),
            "post created"
        );

        self.detail(post).await
    }

    /// Replace (or keep) the content of a post and re-sync its tags
    ///
    /// `content: None` leaves the text as it is; the tag set is still
    /// re-derived from it.
    pub async fn update_post(
        &self,
        actor: Option<Uuid>,
        post_id: Uuid,
        req: PatchPostRequest,
    ) -> Result<PostDetail> {
        let current = self.require_post(post_id).await?;
        authorize(Operation::Update, actor, Some(current.author_id), "post")?;
        req.validate()?;

        let content = req.content.unwrap_or(current.content);
        let tag_names = distinct_tag_names(&content);

        let post = self
            .store
            .update_post(post_id, &content, &tag_names)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {}", post_id)))?;

        TAGS_SYNCED_TOTAL.inc_by(tag_names.len() as u64);
        tracing::info!(post_id = %post.id, tags = tag_names.len(), "post updated");

        self.detail(post).await
    }

    /// Delete a post together with its comments
    pub async fn delete_post(&self, actor: Option<Uuid>, post_id: Uuid) -> Result<()> {
        let current = self.require_post(post_id).await?;
        authorize(Operation::Delete, actor, Some(current.author_id), "post")?;

        if !self.store.delete_post(post_id).await? {
            return Err(AppError::NotFound(format!("Post {}", post_id)));
        }

        tracing::info!(%post_id, "post deleted");
        Ok(())
    }

    /// Add one like. Repeat likes from the same caller all count.
    pub async fn like_post(&self, post_id: Uuid) -> Result<LikeResponse> {
        let like_count = self
            .store
            .increment_like_count(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {}", post_id)))?;

        POST_LIKES_TOTAL.inc();
        tracing::debug!(%post_id, like_count, "post liked");

        Ok(LikeResponse {
            id: post_id,
            like_count,
        })
    }

    /// Top `limit` posts by like count
    pub async fn best_posts(&self, limit: i64) -> Result<Vec<PostSummary>> {
        let posts = self.store.top_liked_posts(limit.max(0)).await?;
        Ok(posts.into_iter().map(PostSummary::from).collect())
    }

    /// Every post carrying the tag `name`, newest first
    pub async fn posts_by_tag(&self, name: &str) -> Result<Vec<PostDetail>> {
        let tag = self
            .store
            .find_tag(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag {}", name)))?;

        let posts = self.store.posts_with_tag(tag.id).await?;

        let mut details = Vec::with_capacity(posts.len());
        for post in posts {
            details.push(self.detail(post).await?);
        }
        Ok(details)
    }

    async fn require_post(&self, post_id: Uuid) -> Result<Post> {
        self.store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {}", post_id)))
    }

    async fn detail(&self, post: Post) -> Result<PostDetail> {
        let tags = self.store.post_tags(post.id).await?;
        let liked_by = self.store.post_likers(post.id).await?;
        let comments = self.store.list_comments(post.id, Pagination::all()).await?;

        Ok(PostDetail::assemble(post, tags, liked_by, comments))
    }
}
