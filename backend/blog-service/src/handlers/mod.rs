/// HTTP handlers for blog endpoints
///
/// - Posts: CRUD, likes, best-of ranking
/// - Comments: CRUD under a post
/// - Tags: posts by hashtag
///
/// `configure` registers every route along with extractor configs that turn
/// body, path and query failures into the service's JSON error shape.
pub mod comments;
pub mod posts;
pub mod tags;

use crate::error::AppError;
use crate::models::Pagination;
use actix_web::web;
use serde::Deserialize;
use utoipa::IntoParams;

pub use comments::{create_comment, delete_comment, get_comment, list_post_comments, update_comment};
pub use posts::{
    best_posts, create_post, delete_post, get_post, like_post, list_posts, patch_post,
    replace_post,
};
pub use tags::posts_by_tag;

/// Optional `?limit=&offset=` window
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page size, 1-100 (default 50)
    pub limit: Option<i64>,
    /// Rows to skip (default 0)
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.limit, self.offset)
    }
}

/// Request body limits and error mapping for JSON payloads
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

/// Unparseable identifiers in the path are treated as missing resources
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| AppError::NotFound(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

/// Register blog routes. `/posts/best` precedes `/posts/{post_id}`; the
/// collection answers with or without a trailing slash.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .service(
            web::scope("/posts")
                .service(
                    web::resource(["", "/"])
                        .route(web::get().to(list_posts))
                        .route(web::post().to(create_post)),
                )
                .service(web::resource("/best").route(web::get().to(best_posts)))
                .service(
                    web::resource("/{post_id}")
                        .route(web::get().to(get_post))
                        .route(web::put().to(replace_post))
                        .route(web::patch().to(patch_post))
                        .route(web::delete().to(delete_post)),
                )
                .service(web::resource("/{post_id}/like").route(web::get().to(like_post)))
                .service(
                    web::resource("/{post_id}/comments")
                        .route(web::get().to(list_post_comments))
                        .route(web::post().to(create_comment)),
                ),
        )
        .service(
            web::scope("/comments").service(
                web::resource("/{comment_id}")
                    .route(web::get().to(get_comment))
                    .route(web::put().to(update_comment))
                    .route(web::patch().to(update_comment))
                    .route(web::delete().to(delete_comment)),
            ),
        )
        .service(
            web::scope("/tags")
                .service(web::resource("/{name}").route(web::get().to(posts_by_tag))),
        );
}
