//! Database operations for `products`, `product_images`, and
//! `product_categories_map`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use woosync_core::NormalizedProduct;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub remote_id: i64,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub product_type: String,
    pub is_active: bool,
    pub description: String,
    pub short_description: String,
    pub price: Decimal,
    pub regular_price: Decimal,
    pub sale_price: Decimal,
    pub on_sale: bool,
    /// `NULL` when the remote does not track stock for this product.
    pub stock_quantity: Option<i64>,
    pub stock_status: String,
    pub manage_stock: bool,
    pub remote_modified_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Remote-to-local identifier pair returned by a product batch upsert.
#[derive(Debug, Clone, Copy)]
pub struct ProductIdPair {
    pub remote_id: i64,
    pub local_id: i64,
}

/// One image row ready for insertion, already stitched to its owning
/// product's local id.
#[derive(Debug, Clone)]
pub struct ImageInsert {
    pub product_id: i64,
    pub remote_id: i64,
    pub src: String,
    pub alt: String,
    pub position: i32,
}

// ---------------------------------------------------------------------------
// products operations
// ---------------------------------------------------------------------------

/// Upserts one page of admitted products in a single transaction.
///
/// Conflicts on `remote_id` update every mutable column in place. Returns
/// the remote/local id pair for every row written, in input order; the
/// caller uses these to attach images and category links for the same page
/// before the next page is fetched.
///
/// Price fields are bound as `f64` and cast to fixed-scale `NUMERIC(12,2)`
/// columns by the database engine. This is a documented precision boundary
/// where normalization-time floating values are rounded on persistence.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails; the
/// transaction rolls back and no row from the batch is kept.
pub async fn upsert_products(
    pool: &PgPool,
    products: &[NormalizedProduct],
) -> Result<Vec<ProductIdPair>, DbError> {
    let mut tx = pool.begin().await?;
    let mut pairs = Vec::with_capacity(products.len());

    for product in products {
        let local_id: i64 = sqlx::query_scalar::<_, i64>(
            "INSERT INTO products \
                 (remote_id, name, slug, sku, product_type, is_active, \
                  description, short_description, price, regular_price, sale_price, \
                  on_sale, stock_quantity, stock_status, manage_stock, remote_modified_at) \
             VALUES ($1, $2, $3, $4, $5, $6, \
                     $7, $8, $9::numeric(12,2), $10::numeric(12,2), $11::numeric(12,2), \
                     $12, $13, $14, $15, $16) \
             ON CONFLICT (remote_id) DO UPDATE SET \
                 name               = EXCLUDED.name, \
                 slug               = EXCLUDED.slug, \
                 sku                = EXCLUDED.sku, \
                 product_type       = EXCLUDED.product_type, \
                 is_active          = EXCLUDED.is_active, \
                 description        = EXCLUDED.description, \
                 short_description  = EXCLUDED.short_description, \
                 price              = EXCLUDED.price, \
                 regular_price      = EXCLUDED.regular_price, \
                 sale_price         = EXCLUDED.sale_price, \
                 on_sale            = EXCLUDED.on_sale, \
                 stock_quantity     = EXCLUDED.stock_quantity, \
                 stock_status       = EXCLUDED.stock_status, \
                 manage_stock       = EXCLUDED.manage_stock, \
                 remote_modified_at = EXCLUDED.remote_modified_at, \
                 updated_at         = NOW() \
             RETURNING id",
        )
        .bind(product.remote_id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.sku)
        .bind(product.kind.as_str())
        .bind(product.is_active)
        .bind(&product.description)
        .bind(&product.short_description)
        .bind(product.price)
        .bind(product.regular_price)
        .bind(product.sale_price)
        .bind(product.on_sale)
        .bind(product.stock_quantity)
        .bind(product.stock_status.as_str())
        .bind(product.manage_stock)
        .bind(product.date_modified)
        .fetch_one(&mut *tx)
        .await?;

        pairs.push(ProductIdPair {
            remote_id: product.remote_id,
            local_id,
        });
    }

    tx.commit().await?;
    Ok(pairs)
}

// ---------------------------------------------------------------------------
// product_images operations
// ---------------------------------------------------------------------------

/// Upserts one page's image rows in a single transaction.
///
/// Conflicts on `remote_id` update `product_id`, `src`, `alt`, `position`,
/// and `updated_at` in place, so a re-synced gallery never duplicates rows.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails.
pub async fn upsert_product_images(
    pool: &PgPool,
    images: &[ImageInsert],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    for image in images {
        sqlx::query(
            "INSERT INTO product_images (remote_id, product_id, src, alt, position) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (remote_id) DO UPDATE SET \
                 product_id = EXCLUDED.product_id, \
                 src        = EXCLUDED.src, \
                 alt        = EXCLUDED.alt, \
                 position   = EXCLUDED.position, \
                 updated_at = NOW()",
        )
        .bind(image.remote_id)
        .bind(image.product_id)
        .bind(&image.src)
        .bind(&image.alt)
        .bind(image.position)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(images.len())
}

// ---------------------------------------------------------------------------
// product_categories_map operations
// ---------------------------------------------------------------------------

/// Inserts one page's product-to-category links in a single transaction.
///
/// Each link is a `(product local id, category local id)` pair. Existing
/// pairs are left untouched via `ON CONFLICT DO NOTHING`, keeping the join
/// table free of duplicates under repeated syncs.
///
/// Returns the number of links newly inserted (pre-existing pairs are not
/// counted).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails.
pub async fn link_product_categories(
    pool: &PgPool,
    links: &[(i64, i64)],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    for (product_id, category_id) in links {
        let result = sqlx::query(
            "INSERT INTO product_categories_map (product_id, category_id) \
             VALUES ($1, $2) \
             ON CONFLICT (product_id, category_id) DO NOTHING",
        )
        .bind(product_id)
        .bind(category_id)
        .execute(&mut *tx)
        .await?;
        inserted += usize::try_from(result.rows_affected()).unwrap_or(0);
    }

    tx.commit().await?;
    Ok(inserted)
}
