use sqlx::PgPool;

use crate::clothes::repo_types::{ClothesItem, Color, Size};

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<ClothesItem>> {
    let rows = sqlx::query_as::<_, ClothesItem>(
        r#"
        SELECT id, name, color, size, photo_url, created_at, last_modified_at
        FROM clothes
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(
    db: &PgPool,
    name: &str,
    color: Color,
    size: Size,
    photo_url: Option<&str>,
) -> anyhow::Result<ClothesItem> {
    let item = sqlx::query_as::<_, ClothesItem>(
        r#"
        INSERT INTO clothes (name, color, size, photo_url)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, color, size, photo_url, created_at, last_modified_at
        "#,
    )
    .bind(name)
    .bind(color)
    .bind(size)
    .bind(photo_url)
    .fetch_one(db)
    .await?;
    Ok(item)
}
