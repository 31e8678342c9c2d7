/// Comment handlers - HTTP endpoints for comment operations
use crate::error::Result;
use crate::handlers::PaginationParams;
use crate::middleware::{actor, UserId};
use crate::models::{Comment, CommentContentRequest};
use crate::AppState;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// Get comments for a post, oldest first
#[utoipa::path(
    get,
    path = "/posts/{post_id}/comments",
    params(("post_id" = Uuid, Path, description = "Post ID"), PaginationParams),
    responses(
        (status = 200, description = "Comments", body = Vec<Comment>),
        (status = 404, description = "Post not found"),
    ),
    tag = "comments"
)]
pub async fn list_post_comments(
    state: web::Data<AppState>,
    user: Option<UserId>,
    post_id: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let comments = state
        .comment_service()
        .list_post_comments(actor(user), post_id.into_inner(), query.pagination())
        .await?;

    Ok(HttpResponse::Ok().json(comments))
}

/// Create a new comment
#[utoipa::path(
    post,
    path = "/posts/{post_id}/comments",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    request_body = CommentContentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Invalid content"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Post not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn create_comment(
    state: web::Data<AppState>,
    user: Option<UserId>,
    post_id: web::Path<Uuid>,
    req: web::Json<CommentContentRequest>,
) -> Result<HttpResponse> {
    let comment = state
        .comment_service()
        .create_comment(actor(user), post_id.into_inner(), req.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Get a single comment
#[utoipa::path(
    get,
    path = "/comments/{comment_id}",
    params(("comment_id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment", body = Comment),
        (status = 404, description = "Comment not found"),
    ),
    tag = "comments"
)]
pub async fn get_comment(
    state: web::Data<AppState>,
    user: Option<UserId>,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment = state
        .comment_service()
        .get_comment(actor(user), comment_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// Update a comment's content (PUT and PATCH)
#[utoipa::path(
    put,
    path = "/comments/{comment_id}",
    params(("comment_id" = Uuid, Path, description = "Comment ID")),
    request_body = CommentContentRequest,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn update_comment(
    state: web::Data<AppState>,
    user: Option<UserId>,
    comment_id: web::Path<Uuid>,
    req: web::Json<CommentContentRequest>,
) -> Result<HttpResponse> {
    let comment = state
        .comment_service()
        .update_comment(actor(user), comment_id.into_inner(), req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment
#[utoipa::path(
    delete,
    path = "/comments/{comment_id}",
    params(("comment_id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn delete_comment(
    state: web::Data<AppState>,
    user: Option<UserId>,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state
        .comment_service()
        .delete_comment(actor(user), comment_id.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
