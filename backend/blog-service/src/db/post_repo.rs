use crate::db::tag_repo;
use crate::models::Post;
use sqlx::PgPool;
use uuid::Uuid;

/// List posts, newest first
pub async fn list_posts(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, author_id, content, like_count, created_at, updated_at
        FROM posts
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, author_id, content, like_count, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Insert a post and link its tags in one transaction
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    content: &str,
    tag_names: &[String],
) -> Result<Post, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, content)
        VALUES ($1, $2)
        RETURNING id, author_id, content, like_count, created_at, updated_at
        "#,
    )
    .bind(author_id)
    .bind(content)
    .fetch_one(&mut *tx)
    .await?;

    tag_repo::link_tags(&mut *tx, post.id, tag_names).await?;

    tx.commit().await?;

    Ok(post)
}

/// Replace content and re-derive tag links from scratch
///
/// Old links are cleared before relinking so hashtags removed from the text
/// drop off the post. Tag rows themselves are kept.
pub async fn update_post_content(
    pool: &PgPool,
    post_id: Uuid,
    content: &str,
    tag_names: &[String],
) -> Result<Option<Post>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET content = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING id, author_id, content, like_count, created_at, updated_at
        "#,
    )
    .bind(content)
    .bind(post_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(post) = post else {
        tx.rollback().await?;
        return Ok(None);
    };

    tag_repo::clear_post_tags(&mut *tx, post.id).await?;
    tag_repo::link_tags(&mut *tx, post.id, tag_names).await?;

    tx.commit().await?;

    Ok(Some(post))
}

/// Hard delete; comments and tag links go with it via ON DELETE CASCADE
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Add one like with a single UPDATE so concurrent likes never overwrite
/// each other
pub async fn increment_like_count(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<i64>, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE posts
        SET like_count = like_count + 1
        WHERE id = $1
        RETURNING like_count
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(count)
}

/// Most liked posts; ties resolved oldest first, then by id
pub async fn top_liked_posts(pool: &PgPool, limit: i64) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, author_id, content, like_count, created_at, updated_at
        FROM posts
        ORDER BY like_count DESC, created_at ASC, id ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Identities recorded in the informational likers relation
pub async fn find_post_likers(pool: &PgPool, post_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let likers = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT user_id
        FROM post_likers
        WHERE post_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(likers)
}
