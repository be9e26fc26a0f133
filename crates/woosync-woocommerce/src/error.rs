use thiserror::Error;

/// Errors returned by the WooCommerce REST client.
#[derive(Debug, Error)]
pub enum WooError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote returned a non-2xx status. `body` carries a truncated
    /// response body for diagnosis; `url` is stripped of query parameters
    /// because credentials travel in the query string.
    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The listing never returned an empty page within the page cap.
    #[error("pagination limit reached listing {entity}: exceeded {max_pages} pages")]
    PaginationLimit {
        entity: &'static str,
        max_pages: usize,
    },
}
