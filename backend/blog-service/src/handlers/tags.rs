/// Tag handlers
use crate::error::Result;
use crate::models::PostDetail;
use crate::AppState;
use actix_web::{web, HttpResponse};

/// Every post carrying a tag
#[utoipa::path(
    get,
    path = "/tags/{name}",
    params(("name" = String, Path, description = "Tag name without the leading #")),
    responses(
        (status = 200, description = "Tagged posts, newest first", body = Vec<PostDetail>),
        (status = 404, description = "Unknown tag"),
    ),
    tag = "tags"
)]
pub async fn posts_by_tag(
    state: web::Data<AppState>,
    name: web::Path<String>,
) -> Result<HttpResponse> {
    let posts = state.post_service().posts_by_tag(&name).await?;
    Ok(HttpResponse::Ok().json(posts))
}
