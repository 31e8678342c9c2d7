/// Comment service - handles comment creation, retrieval, and management
use crate::db::BlogStore;
use crate::error::{AppError, Result};
use crate::middleware::permissions::{authorize, Operation};
use crate::models::{Comment, CommentContentRequest, Pagination};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct CommentService {
    store: Arc<dyn BlogStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// Comments on a post, oldest first. 404 if the post is gone.
    pub async fn list_post_comments(
        &self,
        actor: Option<Uuid>,
        post_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<Comment>> {
        self.require_post(post_id).await?;
        authorize(Operation::List, actor, None, "comment")?;

        self.store.list_comments(post_id, page).await
    }

    pub async fn get_comment(&self, actor: Option<Uuid>, comment_id: Uuid) -> Result<Comment> {
        let comment = self.require_comment(comment_id).await?;
        authorize(Operation::Read, actor, Some(comment.author_id), "comment")?;

        Ok(comment)
    }

    /// Add a comment by `actor` under `post_id`
    pub async fn create_comment(
        &self,
        actor: Option<Uuid>,
        post_id: Uuid,
        req: CommentContentRequest,
    ) -> Result<Comment> {
        authorize(Operation::Create, actor, None, "comment")?;
        let author_id =
            actor.ok_or_else(|| AppError::Unauthorized("sign in to create a comment".into()))?;
        self.require_post(post_id).await?;
        req.validate()?;

        let comment = self
            .store
            .create_comment(post_id, author_id, &req.content)
            .await?;

        tracing::info!(
            comment_id = %comment.id,
            %post_id,
            author_id = %author_id,
            "comment created"
        );
        Ok(comment)
    }

    /// Replace a comment's text. The parent post never changes.
    pub async fn update_comment(
        &self,
        actor: Option<Uuid>,
        comment_id: Uuid,
        req: CommentContentRequest,
    ) -> Result<Comment> {
        let current = self.require_comment(comment_id).await?;
        authorize(Operation::Update, actor, Some(current.author_id), "comment")?;
        req.validate()?;

        let comment = self
            .store
            .update_comment(comment_id, &req.content)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {}", comment_id)))?;

        tracing::info!(%comment_id, "comment updated");
        Ok(comment)
    }

    pub async fn delete_comment(&self, actor: Option<Uuid>, comment_id: Uuid) -> Result<()> {
        let current = self.require_comment(comment_id).await?;
        authorize(Operation::Delete, actor, Some(current.author_id), "comment")?;

        if !self.store.delete_comment(comment_id).await? {
            return Err(AppError::NotFound(format!("Comment {}", comment_id)));
        }

        tracing::info!(%comment_id, "comment deleted");
        Ok(())
    }

    async fn require_post(&self, post_id: Uuid) -> Result<()> {
        match self.store.find_post(post_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Post {}", post_id))),
        }
    }

    async fn require_comment(&self, comment_id: Uuid) -> Result<Comment> {
        self.store
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {}", comment_id)))
    }
}
