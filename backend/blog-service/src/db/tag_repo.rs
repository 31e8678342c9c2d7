//! Tag store and post-tag linker.
//!
//! Get-or-create is a single `INSERT ... ON CONFLICT (name)` statement so two
//! writers racing on a new name both end up with the same row; the unique
//! constraint on `tags.name` does the arbitration.

use crate::models::{Post, Tag};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Fetch the tag called `name`, creating it if needed
///
/// `DO UPDATE` (rather than `DO NOTHING`) makes `RETURNING` yield the
/// existing row on conflict.
pub async fn get_or_create_tag(conn: &mut PgConnection, name: &str) -> Result<Tag, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (name)
        VALUES ($1)
        ON CONFLICT (name) DO UPDATE
        SET name = EXCLUDED.name
        RETURNING id, name, created_at
        "#,
    )
    .bind(name)
    .fetch_one(conn)
    .await
}

/// Link `post_id` to every tag in `names`, creating missing tags
///
/// Names are processed in sorted order so concurrent transactions take the
/// tag row locks in the same order.
pub async fn link_tags(
    conn: &mut PgConnection,
    post_id: Uuid,
    names: &[String],
) -> Result<Vec<Tag>, sqlx::Error> {
    let mut ordered: Vec<&str> = names.iter().map(String::as_str).collect();
    ordered.sort_unstable();
    ordered.dedup();

    let mut tags = Vec::with_capacity(ordered.len());
    for name in ordered {
        let tag = get_or_create_tag(&mut *conn, name).await?;

        sqlx::query(
            r#"
            INSERT INTO post_tags (post_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, tag_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(tag.id)
        .execute(&mut *conn)
        .await?;

        tags.push(tag);
    }

    tracing::debug!(%post_id, count = tags.len(), "linked post tags");
    Ok(tags)
}

/// Drop every tag link of a post. Tag rows are never deleted.
pub async fn clear_post_tags(conn: &mut PgConnection, post_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn find_tag_by_name(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, name, created_at FROM tags WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

/// Tags linked to a post, by name
pub async fn find_tags_by_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name, t.created_at
        FROM tags t
        JOIN post_tags pt ON pt.tag_id = t.id
        WHERE pt.post_id = $1
        ORDER BY t.name ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

/// Posts carrying a tag, newest first
pub async fn find_posts_by_tag(pool: &PgPool, tag_id: Uuid) -> Result<Vec<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT p.id, p.author_id, p.content, p.like_count, p.created_at, p.updated_at
        FROM posts p
        JOIN post_tags pt ON pt.post_id = p.id
        WHERE pt.tag_id = $1
        ORDER BY p.created_at DESC, p.id DESC
        "#,
    )
    .bind(tag_id)
    .fetch_all(pool)
    .await
}
