//! Database operations for the `categories` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use woosync_core::NormalizedCategory;

use crate::DbError;

/// A row from the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub remote_id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upserts the full category set in one transaction.
///
/// Conflicts on `remote_id` update `name`, `slug`, `description`,
/// `image_url`, and `updated_at` in place. Categories are a hard
/// prerequisite for product sync, so any failure rolls the whole write back
/// and surfaces to the caller.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails.
pub async fn upsert_categories(
    pool: &PgPool,
    categories: &[NormalizedCategory],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    for category in categories {
        sqlx::query(
            "INSERT INTO categories (remote_id, name, slug, description, image_url) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (remote_id) DO UPDATE SET \
                 name        = EXCLUDED.name, \
                 slug        = EXCLUDED.slug, \
                 description = EXCLUDED.description, \
                 image_url   = EXCLUDED.image_url, \
                 updated_at  = NOW()",
        )
        .bind(category.remote_id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&category.image_url)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(categories.len())
}

/// Loads `(remote_id, local_id)` pairs for every stored category.
///
/// Read once per run after category sync; the orchestrator turns the pairs
/// into its read-only reference map.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn load_category_ids(pool: &PgPool) -> Result<Vec<(i64, i64)>, DbError> {
    let pairs = sqlx::query_as::<_, (i64, i64)>("SELECT remote_id, id FROM categories")
        .fetch_all(pool)
        .await?;
    Ok(pairs)
}
