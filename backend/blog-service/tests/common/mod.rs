//! Shared test fixtures
//!
//! `MemoryStore` implements the repository traits over plain collections so
//! the HTTP surface can be exercised without PostgreSQL. It mirrors the SQL
//! store: posts newest first, comments oldest first, tags never deleted,
//! deleting a post drops its comments and tag links.

#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use async_trait::async_trait;
use blog_service::db::{CommentRepository, PostRepository, TagRepository};
use blog_service::error::{AppError, Result};
use blog_service::middleware::{JwtAuthMiddleware, MetricsMiddleware};
use blog_service::models::{Comment, Pagination, Post, Tag};
use blog_service::{handlers, AppState};
use chrono::{DateTime, Duration, Utc};
use crypto_core::jwt;
use std::sync::{Arc, Mutex, Once};
use uuid::Uuid;

const TEST_PRIVATE_KEY: &str =
    include_str!("../../../libs/crypto-core/testdata/test_private_key.pem");
const TEST_PUBLIC_KEY: &str =
    include_str!("../../../libs/crypto-core/testdata/test_public_key.pem");

static JWT_INIT: Once = Once::new();

/// Install the test key pair once per test binary
pub fn init_jwt() {
    JWT_INIT.call_once(|| {
        jwt::initialize_jwt_keys(TEST_PRIVATE_KEY, TEST_PUBLIC_KEY)
            .expect("test JWT keys should load");
    });
}

/// `Authorization` header value for `user_id`
pub fn bearer(user_id: Uuid) -> (&'static str, String) {
    init_jwt();
    let token = jwt::generate_access_token(user_id, "tester").expect("token");
    ("Authorization", format!("Bearer {}", token))
}

/// Test service wired the way the binary wires the blog routes
pub async fn init_app(
    store: Arc<MemoryStore>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    init_app_with_limit(store, 3).await
}

pub async fn init_app_with_limit(
    store: Arc<MemoryStore>,
    best_posts_limit: i64,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    init_jwt();
    let state = AppState::new(store, best_posts_limit);

    test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::scope("")
                .wrap(JwtAuthMiddleware)
                .wrap(MetricsMiddleware)
                .configure(handlers::configure),
        ),
    )
    .await
}

#[derive(Default)]
struct Tables {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    tags: Vec<Tag>,
    post_tags: Vec<(Uuid, Uuid)>,
    post_likers: Vec<(Uuid, Uuid)>,
    ticks: i64,
}

impl Tables {
    /// Strictly increasing timestamps so ordering never depends on clock
    /// resolution.
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000) + Duration::milliseconds(self.ticks)
    }

    fn link_tags(&mut self, post_id: Uuid, names: &[String]) {
        let mut ordered: Vec<&String> = names.iter().collect();
        ordered.sort();
        ordered.dedup();

        for name in ordered {
            let tag_id = match self.tags.iter().find(|t| &t.name == name) {
                Some(tag) => tag.id,
                None => {
                    let tag = Tag {
                        id: Uuid::new_v4(),
                        name: name.clone(),
                        created_at: self.now(),
                    };
                    let id = tag.id;
                    self.tags.push(tag);
                    id
                }
            };

            if !self.post_tags.contains(&(post_id, tag_id)) {
                self.post_tags.push((post_id, tag_id));
            }
        }
    }
}

/// In-memory `BlogStore`
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of distinct tag rows ever created
    pub fn tag_count(&self) -> usize {
        self.tables.lock().unwrap().tags.len()
    }

    pub fn comment_count(&self) -> usize {
        self.tables.lock().unwrap().comments.len()
    }

    pub fn set_like_count(&self, post_id: Uuid, like_count: i64) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(post) = tables.posts.iter_mut().find(|p| p.id == post_id) {
            post.like_count = like_count;
        }
    }

    pub fn add_liker(&self, post_id: Uuid, user_id: Uuid) {
        self.tables.lock().unwrap().post_likers.push((post_id, user_id));
    }
}

fn page<T: Clone>(rows: Vec<T>, page: Pagination) -> Vec<T> {
    rows.into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn list_posts(&self, pagination: Pagination) -> Result<Vec<Post>> {
        let tables = self.tables.lock().unwrap();
        let mut posts = tables.posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page(posts, pagination))
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn create_post(
        &self,
        author_id: Uuid,
        content: &str,
        tag_names: &[String],
    ) -> Result<Post> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            content: content.to_string(),
            like_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(post.clone());
        tables.link_tags(post.id, tag_names);
        Ok(post)
    }

    async fn update_post(
        &self,
        post_id: Uuid,
        content: &str,
        tag_names: &[String],
    ) -> Result<Option<Post>> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(None);
        };
        post.content = content.to_string();
        post.updated_at = now;
        let post = post.clone();

        tables.post_tags.retain(|(p, _)| *p != post_id);
        tables.link_tags(post_id, tag_names);
        Ok(Some(post))
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != post_id);
        if tables.posts.len() == before {
            return Ok(false);
        }
        tables.comments.retain(|c| c.post_id != post_id);
        tables.post_tags.retain(|(p, _)| *p != post_id);
        tables.post_likers.retain(|(p, _)| *p != post_id);
        Ok(true)
    }

    async fn increment_like_count(&self, post_id: Uuid) -> Result<Option<i64>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .map(|post| {
                post.like_count += 1;
                post.like_count
            }))
    }

    async fn top_liked_posts(&self, limit: i64) -> Result<Vec<Post>> {
        let tables = self.tables.lock().unwrap();
        let mut posts = tables.posts.clone();
        posts.sort_by(|a, b| {
            b.like_count
                .cmp(&a.like_count)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        posts.truncate(limit.max(0) as usize);
        Ok(posts)
    }

    async fn post_tags(&self, post_id: Uuid) -> Result<Vec<Tag>> {
        let tables = self.tables.lock().unwrap();
        let mut tags: Vec<Tag> = tables
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, t)| tables.tags.iter().find(|tag| tag.id == *t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn post_likers(&self, post_id: Uuid) -> Result<Vec<Uuid>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .post_likers
            .iter()
            .filter(|(p, _)| *p == post_id)
            .map(|(_, u)| *u)
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn list_comments(&self, post_id: Uuid, pagination: Pagination) -> Result<Vec<Comment>> {
        let tables = self.tables.lock().unwrap();
        let comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        Ok(page(comments, pagination))
    }

    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.comments.iter().find(|c| c.id == comment_id).cloned())
    }

    async fn create_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.posts.iter().any(|p| p.id == post_id) {
            return Err(AppError::NotFound(format!("Post {}", post_id)));
        }
        let now = tables.now();
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, comment_id: Uuid, content: &str) -> Result<Option<Comment>> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.now();
        Ok(tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .map(|comment| {
                comment.content = content.to_string();
                comment.updated_at = now;
                comment.clone()
            }))
    }

    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != comment_id);
        Ok(tables.comments.len() < before)
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn find_tag(&self, name: &str) -> Result<Option<Tag>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.tags.iter().find(|t| t.name == name).cloned())
    }

    async fn posts_with_tag(&self, tag_id: Uuid) -> Result<Vec<Post>> {
        let tables = self.tables.lock().unwrap();
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| tables.post_tags.contains(&(p.id, tag_id)))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }
}
