/// Post handlers - HTTP endpoints for post operations
use crate::error::Result;
use crate::handlers::PaginationParams;
use crate::middleware::{actor, UserId};
use crate::models::{
    LikeResponse, PatchPostRequest, PostContentRequest, PostDetail, PostSummary,
};
use crate::AppState;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/posts",
    params(PaginationParams),
    responses(
        (status = 200, description = "Posts", body = Vec<PostSummary>),
    ),
    tag = "posts"
)]
pub async fn list_posts(
    state: web::Data<AppState>,
    user: Option<UserId>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let posts = state
        .post_service()
        .list_posts(actor(user), query.pagination())
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Create a new post; hashtags in the content become tags
#[utoipa::path(
    post,
    path = "/posts",
    request_body = PostContentRequest,
    responses(
        (status = 201, description = "Post created", body = PostDetail),
        (status = 400, description = "Invalid content"),
        (status = 401, description = "Authentication required"),
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn create_post(
    state: web::Data<AppState>,
    user: Option<UserId>,
    req: web::Json<PostContentRequest>,
) -> Result<HttpResponse> {
    let post = state
        .post_service()
        .create_post(actor(user), req.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Most liked posts
#[utoipa::path(
    get,
    path = "/posts/best",
    responses(
        (status = 200, description = "Top posts by like count", body = Vec<PostSummary>),
    ),
    tag = "posts"
)]
pub async fn best_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state
        .post_service()
        .best_posts(state.best_posts_limit)
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Get a post by ID
#[utoipa::path(
    get,
    path = "/posts/{post_id}",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post with tags, likers and comments", body = PostDetail),
        (status = 404, description = "Post not found"),
    ),
    tag = "posts"
)]
pub async fn get_post(
    state: web::Data<AppState>,
    user: Option<UserId>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = state
        .post_service()
        .get_post(actor(user), post_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Replace a post's content
#[utoipa::path(
    put,
    path = "/posts/{post_id}",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    request_body = PostContentRequest,
    responses(
        (status = 200, description = "Post updated", body = PostDetail),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn replace_post(
    state: web::Data<AppState>,
    user: Option<UserId>,
    post_id: web::Path<Uuid>,
    req: web::Json<PostContentRequest>,
) -> Result<HttpResponse> {
    let patch = PatchPostRequest {
        content: Some(req.into_inner().content),
    };
    let post = state
        .post_service()
        .update_post(actor(user), post_id.into_inner(), patch)
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Partially update a post; omitted content is left as is
#[utoipa::path(
    patch,
    path = "/posts/{post_id}",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    request_body = PatchPostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostDetail),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn patch_post(
    state: web::Data<AppState>,
    user: Option<UserId>,
    post_id: web::Path<Uuid>,
    req: web::Json<PatchPostRequest>,
) -> Result<HttpResponse> {
    let post = state
        .post_service()
        .update_post(actor(user), post_id.into_inner(), req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post and its comments
#[utoipa::path(
    delete,
    path = "/posts/{post_id}",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn delete_post(
    state: web::Data<AppState>,
    user: Option<UserId>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state
        .post_service()
        .delete_post(actor(user), post_id.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Add one like to a post
#[utoipa::path(
    get,
    path = "/posts/{post_id}/like",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "New like count", body = LikeResponse),
        (status = 404, description = "Post not found"),
    ),
    tag = "posts"
)]
pub async fn like_post(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let like = state.post_service().like_post(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(like))
}
