//! Remote-to-local identifier resolution.
//!
//! Two maps with deliberately different lifetimes: the category map is
//! loaded once per run and read-only afterwards; the product id map is
//! rebuilt for every page from the batch upsert result and discarded with
//! the page.

use std::collections::HashMap;

use sqlx::PgPool;

use woosync_db::{DbError, ProductIdPair};

/// Mapping from remote category ids to local primary keys.
#[derive(Debug)]
pub(super) struct CategoryMap {
    by_remote: HashMap<i64, i64>,
}

impl CategoryMap {
    /// Loads the map from the store. Called once per run, after category
    /// sync completes; a failure here is fatal to the run.
    pub(super) async fn load(pool: &PgPool) -> Result<Self, DbError> {
        Ok(Self::from_pairs(
            woosync_db::load_category_ids(pool).await?,
        ))
    }

    pub(super) fn from_pairs(pairs: Vec<(i64, i64)>) -> Self {
        Self {
            by_remote: pairs.into_iter().collect(),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.by_remote.len()
    }

    /// Resolves remote category references to local ids, dropping unknown
    /// ones. Unknowns are routine (a category deleted remotely between
    /// syncs), so they log at debug rather than warn.
    pub(super) fn resolve(&self, remote_ids: &[i64]) -> Vec<i64> {
        remote_ids
            .iter()
            .filter_map(|remote_id| match self.by_remote.get(remote_id) {
                Some(&local_id) => Some(local_id),
                None => {
                    tracing::debug!(
                        remote_category_id = remote_id,
                        "dropping reference to unknown category"
                    );
                    None
                }
            })
            .collect()
    }
}

/// Builds the page-local remote-to-local product id map from a batch upsert
/// result.
pub(super) fn product_local_ids(pairs: &[ProductIdPair]) -> HashMap<i64, i64> {
    pairs
        .iter()
        .map(|pair| (pair.remote_id, pair.local_id))
        .collect()
}
