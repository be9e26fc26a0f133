//! Full catalog synchronization: categories first, then the paginated
//! product pipeline.
//!
//! Error taxonomy: a category listing failure, a category-map load failure,
//! or store connectivity loss aborts the run; a failed batch write is
//! logged and the run continues with the next page; a rejected record costs
//! one warning line and nothing else.

mod pipeline;
mod resolve;

use anyhow::Context;
use sqlx::PgPool;

use woosync_core::AppConfig;
use woosync_woocommerce::{normalize_category, WooClient};

use self::resolve::CategoryMap;

/// Cumulative counters for one sync run. Owned exclusively by the
/// orchestrator; nothing else mutates them.
#[derive(Debug, Default)]
struct SyncSummary {
    pages: u32,
    products_seen: u64,
    admitted: u64,
    rejected: u64,
    products_written: u64,
    images_written: u64,
    links_written: u64,
    failed_batches: u32,
    total_hint: Option<u64>,
}

/// Runs one full catalog sync to completion or failure, recording the run
/// in `sync_runs`.
///
/// # Errors
///
/// Returns an error on any run-aborting failure (category phase, category
/// map load, product page fetch, store connectivity loss, or run
/// bookkeeping). The error propagates to `main` for a non-zero exit status.
pub(crate) async fn run_sync(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let client = WooClient::new(
        &config.woo_base_url,
        &config.woo_consumer_key,
        &config.woo_consumer_secret,
        config.request_timeout_secs,
    )
    .context("failed to construct WooCommerce client")?;

    let run = woosync_db::create_sync_run(pool, "cli").await?;
    if let Err(e) = woosync_db::start_sync_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, format!("{e:#}")).await;
        return Err(e.into());
    }
    tracing::info!(run_id = run.id, public_id = %run.public_id, "sync run started");

    match sync_catalog(pool, &client, config).await {
        Ok(summary) => {
            let processed = i32::try_from(summary.products_written).unwrap_or(i32::MAX);
            if let Err(e) = woosync_db::complete_sync_run(pool, run.id, processed).await {
                fail_run_best_effort(pool, run.id, format!("{e:#}")).await;
                return Err(e.into());
            }
            tracing::info!(
                run_id = run.id,
                pages = summary.pages,
                products_seen = summary.products_seen,
                admitted = summary.admitted,
                rejected = summary.rejected,
                products_written = summary.products_written,
                images_written = summary.images_written,
                links_written = summary.links_written,
                failed_batches = summary.failed_batches,
                total_hint = summary.total_hint,
                "catalog sync completed"
            );
            println!(
                "synced {} of {} products across {} pages ({} rejected, {} failed batches)",
                summary.products_written,
                summary
                    .total_hint
                    .map_or_else(|| "?".to_string(), |t| t.to_string()),
                summary.pages,
                summary.rejected,
                summary.failed_batches,
            );
            Ok(())
        }
        Err(e) => {
            let err_string = format!("{e:#}");
            tracing::error!(run_id = run.id, error = %err_string, "catalog sync failed");
            fail_run_best_effort(pool, run.id, err_string).await;
            Err(e)
        }
    }
}

/// The sync state machine body: category phase, reference map load, then
/// the sequential product page loop.
async fn sync_catalog(
    pool: &PgPool,
    client: &WooClient,
    config: &AppConfig,
) -> anyhow::Result<SyncSummary> {
    // Categories are a hard prerequisite: products reference them by local
    // id, so any failure in this phase aborts the run.
    let raw_categories = client
        .fetch_all_categories(config.category_page_size)
        .await
        .context("category listing failed")?;
    let categories: Vec<_> = raw_categories.into_iter().map(normalize_category).collect();
    let written = woosync_db::upsert_categories(pool, &categories)
        .await
        .context("category upsert failed")?;
    tracing::info!(categories = written, "category sync complete");

    let category_map = CategoryMap::load(pool)
        .await
        .context("category map load failed")?;
    tracing::debug!(known_categories = category_map.len(), "category map loaded");

    let mut summary = SyncSummary::default();
    let mut pages = client.product_pages(config.product_page_size);

    // Loop invariant: continue while the last fetched page was non-empty
    // and no run-aborting error occurred.
    loop {
        let Some(page) = pages
            .next_page()
            .await
            .context("product page fetch failed")?
        else {
            break;
        };

        summary.pages += 1;
        if summary.total_hint.is_none() {
            summary.total_hint = page.total;
        }
        let page_number = page.number;

        let outcome = pipeline::process_page(pool, &category_map, page).await?;
        summary.products_seen += outcome.products_seen as u64;
        summary.admitted += outcome.admitted as u64;
        summary.rejected += outcome.rejected as u64;
        summary.products_written += outcome.products_written as u64;
        summary.images_written += outcome.images_written as u64;
        summary.links_written += outcome.links_written as u64;
        if outcome.batch_failed {
            summary.failed_batches += 1;
        }

        tracing::info!(
            page = page_number,
            seen = outcome.products_seen,
            admitted = outcome.admitted,
            rejected = outcome.rejected,
            written = outcome.products_written,
            cumulative = summary.products_written,
            total_hint = summary.total_hint,
            "page processed"
        );
    }

    Ok(summary)
}

/// Record a `"failed"` status on a best-effort basis; failures here are
/// logged and swallowed so the original error is the one that propagates.
async fn fail_run_best_effort(pool: &PgPool, run_id: i64, message: String) {
    if let Err(mark_err) = woosync_db::fail_sync_run(pool, run_id, &message).await {
        tracing::error!(run_id, error = %mark_err, "failed to record sync run failure");
    }
}
