//! Per-page processing: sanitize, partition, and persist one fetched page.

use anyhow::Context;
use sqlx::PgPool;

use woosync_core::NormalizedProduct;
use woosync_db::{DbError, ImageInsert};
use woosync_woocommerce::{normalize_product, ProductPage};

use super::resolve::{self, CategoryMap};

/// Counters for a single processed page.
#[derive(Debug, Default)]
pub(super) struct PageOutcome {
    pub products_seen: usize,
    pub admitted: usize,
    pub rejected: usize,
    pub products_written: usize,
    pub images_written: usize,
    pub links_written: usize,
    /// True when the products batch write failed and the page was skipped.
    pub batch_failed: bool,
}

/// Processes one fetched product page end to end.
///
/// The product batch is written first; images and category links follow,
/// stitched to the local ids the product upsert returned. A failed products
/// batch skips the page (pages already committed stay committed); failed
/// image or link batches are logged independently and never roll back the
/// product write.
///
/// # Errors
///
/// Returns an error only for store connectivity loss, which aborts the run.
/// Statement-level batch failures are absorbed into the outcome.
pub(super) async fn process_page(
    pool: &PgPool,
    category_map: &CategoryMap,
    page: ProductPage,
) -> anyhow::Result<PageOutcome> {
    let page_number = page.number;
    let mut outcome = PageOutcome {
        products_seen: page.products.len(),
        ..PageOutcome::default()
    };

    // Partition into admitted and rejected. Each rejection is expected
    // control flow: one attributable warning, then on with the batch.
    let mut admitted: Vec<NormalizedProduct> = Vec::with_capacity(page.products.len());
    for raw in page.products {
        match normalize_product(raw) {
            Ok(product) => admitted.push(product),
            Err(rejection) => {
                outcome.rejected += 1;
                tracing::warn!(
                    remote_id = rejection.remote_id,
                    name = %rejection.name,
                    reason = rejection.reason.tag(),
                    field = rejection.reason.field(),
                    detail = %rejection.reason,
                    "skipping product"
                );
            }
        }
    }
    outcome.admitted = admitted.len();

    // A page with zero admitted products still advances pagination.
    if admitted.is_empty() {
        return Ok(outcome);
    }

    let pairs = match woosync_db::upsert_products(pool, &admitted).await {
        Ok(pairs) => pairs,
        Err(e) => {
            return if e.is_connectivity() {
                Err(e).context("store connection lost during product batch")
            } else {
                tracing::error!(
                    page = page_number,
                    error = %e,
                    "product batch write failed; continuing with next page"
                );
                outcome.batch_failed = true;
                Ok(outcome)
            };
        }
    };
    outcome.products_written = pairs.len();

    // Local ids exist only now. The map is page-local by design and is
    // dropped with this function's frame, never reused across pages.
    let local_ids = resolve::product_local_ids(&pairs);

    let mut images: Vec<ImageInsert> = Vec::new();
    let mut links: Vec<(i64, i64)> = Vec::new();
    for product in &admitted {
        let Some(&product_id) = local_ids.get(&product.remote_id) else {
            continue;
        };
        for image in &product.images {
            images.push(ImageInsert {
                product_id,
                remote_id: image.remote_id,
                src: image.src.clone(),
                alt: image.alt.clone(),
                position: image.position,
            });
        }
        for category_id in category_map.resolve(&product.category_ids) {
            links.push((product_id, category_id));
        }
    }

    // Image and link batches fail independently of each other and of the
    // already-committed product batch; there is no cross-entity transaction.
    if !images.is_empty() {
        match woosync_db::upsert_product_images(pool, &images).await {
            Ok(written) => outcome.images_written = written,
            Err(e) => absorb_batch_error(e, page_number, "image batch")?,
        }
    }
    if !links.is_empty() {
        match woosync_db::link_product_categories(pool, &links).await {
            Ok(written) => outcome.links_written = written,
            Err(e) => absorb_batch_error(e, page_number, "category link batch")?,
        }
    }

    Ok(outcome)
}

/// Escalates connectivity faults; logs and absorbs statement-level batch
/// faults so the run can continue.
fn absorb_batch_error(error: DbError, page: u32, what: &str) -> anyhow::Result<()> {
    if error.is_connectivity() {
        return Err(error).context(format!("store connection lost during {what}"));
    }
    tracing::error!(page, error = %error, "{what} write failed; continuing");
    Ok(())
}
