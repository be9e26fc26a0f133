/// Runtime configuration for the sync process, loaded from the environment
/// at startup and passed explicitly to every component that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection URL (`DATABASE_URL`).
    pub database_url: String,
    /// Base URL of the WooCommerce store, e.g. `https://shop.example.com`.
    pub woo_base_url: String,
    /// WooCommerce REST consumer key.
    pub woo_consumer_key: String,
    /// WooCommerce REST consumer secret.
    pub woo_consumer_secret: String,
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Per-request timeout for remote API calls.
    pub request_timeout_secs: u64,
    /// Page size for the product listing.
    pub product_page_size: u32,
    /// Page size for the category listing. Category payloads are much
    /// smaller than product payloads, so this runs larger.
    pub category_page_size: u32,
}
