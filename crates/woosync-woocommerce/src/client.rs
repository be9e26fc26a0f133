//! HTTP client for the WooCommerce REST API catalog listings.
//!
//! Wraps `reqwest` with typed errors, query-string credential handling, and
//! page-numbered pagination. Pagination terminates on the first zero-record
//! page; the `X-WP-Total` header is surfaced as a progress hint only. The
//! client performs no internal retries; retry policy belongs to the caller.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::WooError;
use crate::types::{WooCategory, WooProduct};

const PRODUCTS_PATH: &str = "wp-json/wc/v3/products";
const CATEGORIES_PATH: &str = "wp-json/wc/v3/products/categories";

/// Response header carrying the total item count of a listing.
const TOTAL_COUNT_HEADER: &str = "x-wp-total";

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops on a remote that never returns an empty page.
const MAX_PAGES: usize = 500;

/// Longest response-body excerpt carried in an error.
const MAX_ERROR_BODY_LEN: usize = 512;

/// Client for the WooCommerce REST API.
///
/// Manages the HTTP client, credentials, and endpoint URLs. Construct with
/// [`WooClient::new`]; point `base_url` at a mock server in tests.
pub struct WooClient {
    client: Client,
    consumer_key: String,
    consumer_secret: String,
    products_url: Url,
    categories_url: Url,
}

/// One fetched page of the product listing.
#[derive(Debug)]
pub struct ProductPage {
    /// 1-based page number that was requested.
    pub number: u32,
    pub products: Vec<WooProduct>,
    /// Total item count from the `X-WP-Total` header, when the remote sends
    /// one. Progress reporting only; it may be absent or wrong.
    pub total: Option<u64>,
}

impl WooClient {
    /// Creates a new client for the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`WooError::InvalidBaseUrl`] if `base_url` cannot be parsed,
    /// or [`WooError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        consumer_key: &str,
        consumer_secret: &str,
        timeout_secs: u64,
    ) -> Result<Self, WooError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("woosync/0.1 (catalog-sync)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // joining the REST path appends rather than replacing the last path
        // segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| WooError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        let products_url = base.join(PRODUCTS_PATH).map_err(|e| invalid(e.to_string()))?;
        let categories_url = base
            .join(CATEGORIES_PATH)
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            consumer_key: consumer_key.to_owned(),
            consumer_secret: consumer_secret.to_owned(),
            products_url,
            categories_url,
        })
    }

    /// Fetches one page of the category listing.
    ///
    /// # Errors
    ///
    /// - [`WooError::UnexpectedStatus`] on a non-2xx response.
    /// - [`WooError::Http`] on network failure.
    /// - [`WooError::Deserialize`] if the body is not a category array.
    pub async fn fetch_categories_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<WooCategory>, WooError> {
        let url = self.listing_url(&self.categories_url, page, per_page);
        let (body, _) = self.request_page(&url).await?;
        serde_json::from_str(&body).map_err(|e| WooError::Deserialize {
            context: format!("categories page {page}"),
            source: e,
        })
    }

    /// Fetches the complete category listing by draining pages until the
    /// remote returns an empty one. Categories are low-cardinality, so the
    /// whole set is collected before any write happens.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_categories_page`]. Returns
    /// [`WooError::PaginationLimit`] if the listing exceeds [`MAX_PAGES`].
    pub async fn fetch_all_categories(&self, per_page: u32) -> Result<Vec<WooCategory>, WooError> {
        let mut all = Vec::new();
        let mut page = 1u32;
        loop {
            if page as usize > MAX_PAGES {
                return Err(WooError::PaginationLimit {
                    entity: "categories",
                    max_pages: MAX_PAGES,
                });
            }
            let batch = self.fetch_categories_page(page, per_page).await?;
            if batch.is_empty() {
                break;
            }
            all.extend(batch);
            page += 1;
        }
        Ok(all)
    }

    /// Fetches one page of the product listing, along with the total-count
    /// hint from the `X-WP-Total` header when present.
    ///
    /// # Errors
    ///
    /// - [`WooError::UnexpectedStatus`] on a non-2xx response.
    /// - [`WooError::Http`] on network failure.
    /// - [`WooError::Deserialize`] if the body is not a product array.
    pub async fn fetch_products_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<ProductPage, WooError> {
        let url = self.listing_url(&self.products_url, page, per_page);
        let (body, total) = self.request_page(&url).await?;
        let products = serde_json::from_str(&body).map_err(|e| WooError::Deserialize {
            context: format!("products page {page}"),
            source: e,
        })?;
        Ok(ProductPage {
            number: page,
            products,
            total,
        })
    }

    /// Returns a fresh page producer over the product listing.
    ///
    /// Each call restarts from page 1; the producer yields pages until the
    /// remote returns a zero-record page, the authoritative end-of-data
    /// signal.
    #[must_use]
    pub fn product_pages(&self, per_page: u32) -> ProductPages<'_> {
        ProductPages {
            client: self,
            per_page,
            next_page: 1,
            done: false,
            total: None,
        }
    }

    /// Builds the listing URL with page parameters and query-string
    /// credentials appended via [`Url::query_pairs_mut`], ensuring all
    /// values are safely encoded.
    fn listing_url(&self, endpoint: &Url, page: u32, per_page: u32) -> Url {
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("consumer_key", &self.consumer_key);
            pairs.append_pair("consumer_secret", &self.consumer_secret);
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("per_page", &per_page.to_string());
        }
        url
    }

    /// Sends a GET request, asserts a 2xx status, and returns the body text
    /// plus the parsed total-count header.
    ///
    /// # Errors
    ///
    /// Returns [`WooError::Http`] on network failure and
    /// [`WooError::UnexpectedStatus`] (with a truncated body excerpt and a
    /// credential-stripped URL) on a non-2xx status.
    async fn request_page(&self, url: &Url) -> Result<(String, Option<u64>), WooError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let total = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WooError::UnexpectedStatus {
                status: status.as_u16(),
                url: display_url(url),
                body: truncate_body(&body),
            });
        }

        let body = response.text().await?;
        Ok((body, total))
    }
}

/// Lazy page producer for the product listing.
///
/// Loop invariant: pages keep coming while the last fetched page was
/// non-empty and no error occurred. The zero-record page terminates the
/// sequence; the total-count hint never does.
pub struct ProductPages<'a> {
    client: &'a WooClient,
    per_page: u32,
    next_page: u32,
    done: bool,
    total: Option<u64>,
}

impl ProductPages<'_> {
    /// Total item count hint captured from the first fetched page, if the
    /// remote sent one.
    #[must_use]
    pub fn total_hint(&self) -> Option<u64> {
        self.total
    }

    /// Fetches the next page, or `None` once the listing is exhausted.
    ///
    /// The empty page that terminates the sequence still costs one request;
    /// it is the remote's only authoritative end-of-data signal.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`WooClient::fetch_products_page`]. Returns
    /// [`WooError::PaginationLimit`] if the listing exceeds [`MAX_PAGES`].
    pub async fn next_page(&mut self) -> Result<Option<ProductPage>, WooError> {
        if self.done {
            return Ok(None);
        }
        if self.next_page as usize > MAX_PAGES {
            self.done = true;
            return Err(WooError::PaginationLimit {
                entity: "products",
                max_pages: MAX_PAGES,
            });
        }

        let page = self
            .client
            .fetch_products_page(self.next_page, self.per_page)
            .await?;
        self.next_page += 1;
        if self.total.is_none() {
            self.total = page.total;
        }
        if page.products.is_empty() {
            self.done = true;
            return Ok(None);
        }
        Ok(Some(page))
    }
}

/// Renders a request URL for error messages with the query string removed.
/// The consumer key and secret travel as query parameters and must never be
/// echoed into errors or logs.
fn display_url(url: &Url) -> String {
    let mut stripped = url.clone();
    stripped.set_query(None);
    stripped.to_string()
}

/// Truncates a response body excerpt for inclusion in an error, marking the
/// cut when it happens. Cuts on a char boundary.
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body.to_owned();
    }
    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}… ({} bytes total)", &body[..end], body.len())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
