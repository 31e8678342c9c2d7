/// Data models for blog-service
///
/// Row types (`Post`, `Comment`, `Tag`) map directly onto the PostgreSQL
/// tables. `PostSummary` and `PostDetail` are the two post serializations:
/// the lightweight one for listings and rankings, the full one for single
/// post reads.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Upper bound on post and comment bodies, in characters.
pub const MAX_CONTENT_LENGTH: u64 = 10_000;

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Tag {
    pub id: Uuid,
    /// Hashtag text without the leading `#`
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Listing / ranking view of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PostSummary {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            content: post.content,
            like_count: post.like_count,
            created_at: post.created_at,
        }
    }
}

/// Full view of a post with its tags, likers and comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PostDetail {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Tag names, sorted
    pub tags: Vec<String>,
    pub liked_by: Vec<Uuid>,
    pub comments: Vec<Comment>,
}

impl PostDetail {
    pub fn assemble(
        post: Post,
        tags: Vec<Tag>,
        liked_by: Vec<Uuid>,
        comments: Vec<Comment>,
    ) -> Self {
        let mut tags: Vec<String> = tags.into_iter().map(|t| t.name).collect();
        tags.sort();

        Self {
            id: post.id,
            author_id: post.author_id,
            content: post.content,
            like_count: post.like_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
            tags,
            liked_by,
            comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    pub id: Uuid,
    pub like_count: i64,
}

/// Body of `POST /posts` and `PUT /posts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PostContentRequest {
    #[validate(length(
        min = 1,
        max = MAX_CONTENT_LENGTH,
        message = "content must be 1-10000 characters"
    ))]
    pub content: String,
}

/// Body of `PATCH /posts/{id}`; absent content keeps the current text
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PatchPostRequest {
    #[validate(length(
        min = 1,
        max = MAX_CONTENT_LENGTH,
        message = "content must be 1-10000 characters"
    ))]
    pub content: Option<String>,
}

/// Body of comment create and update requests
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CommentContentRequest {
    #[validate(length(
        min = 1,
        max = MAX_CONTENT_LENGTH,
        message = "content must be 1-10000 characters"
    ))]
    pub content: String,
}

/// Normalized limit/offset window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Clamp caller-supplied values into the allowed window.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    /// Every row, used when a post is rendered with all its comments.
    pub fn all() -> Self {
        Self {
            limit: i64::MAX,
            offset: 0,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            content: "hello #rust".to_string(),
            like_count: 7,
            created_at: now,
            updated_at: now,
        }
    }

    fn tag(name: &str) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn pagination_clamps_limits() {
        assert_eq!(Pagination::new(None, None).limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(Pagination::new(Some(0), None).limit, 1);
        assert_eq!(Pagination::new(Some(10_000), None).limit, MAX_PAGE_LIMIT);
        assert_eq!(Pagination::new(None, Some(-5)).offset, 0);
    }

    #[test]
    fn detail_sorts_tag_names() {
        let post = post();
        let detail =
            PostDetail::assemble(post.clone(), vec![tag("zig"), tag("ada")], vec![], vec![]);

        assert_eq!(detail.id, post.id);
        assert_eq!(detail.tags, vec!["ada", "zig"]);
    }

    #[test]
    fn summary_drops_relations() {
        let post = post();
        let value = serde_json::to_value(PostSummary::from(post.clone())).unwrap();

        assert_eq!(value["like_count"], 7);
        assert!(value.get("tags").is_none());
        assert!(value.get("updated_at").is_none());
    }

    #[test]
    fn content_validation_bounds() {
        let empty = PostContentRequest { content: String::new() };
        assert!(empty.validate().is_err());

        let long = PostContentRequest {
            content: "x".repeat(MAX_CONTENT_LENGTH as usize + 1),
        };
        assert!(long.validate().is_err());

        let patch = PatchPostRequest { content: None };
        assert!(patch.validate().is_ok());
    }
}
