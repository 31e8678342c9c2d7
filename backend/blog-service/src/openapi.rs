/// OpenAPI documentation for Blog Service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models::{
    Comment, CommentContentRequest, LikeResponse, PatchPostRequest, PostContentRequest,
    PostDetail, PostSummary,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog Service API",
        version = "1.0.0",
        description = "Posts, comments, hashtags and likes. Anyone may read; signed-in users may write; only the author may change or delete what they wrote.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    paths(
        handlers::posts::list_posts,
        handlers::posts::create_post,
        handlers::posts::best_posts,
        handlers::posts::get_post,
        handlers::posts::replace_post,
        handlers::posts::patch_post,
        handlers::posts::delete_post,
        handlers::posts::like_post,
        handlers::comments::list_post_comments,
        handlers::comments::create_comment,
        handlers::comments::get_comment,
        handlers::comments::update_comment,
        handlers::comments::delete_comment,
        handlers::tags::posts_by_tag,
    ),
    components(schemas(
        PostSummary,
        PostDetail,
        Comment,
        LikeResponse,
        PostContentRequest,
        PatchPostRequest,
        CommentContentRequest,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "posts", description = "Post creation, retrieval, updates, deletion, likes and ranking"),
        (name = "comments", description = "Comment management on posts"),
        (name = "tags", description = "Hashtag lookups"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("RS256 JWT; subject is the user UUID"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/openapi.json"
    }
}
