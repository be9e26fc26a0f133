pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{ProductPage, ProductPages, WooClient};
pub use error::WooError;
pub use normalize::{normalize_category, normalize_product, Rejection, RejectionReason};
pub use types::{WooCategory, WooImage, WooProduct};
