//! Raw WooCommerce REST API shapes for `GET /products` and
//! `GET /products/categories`.
//!
//! ## Observed quirks from live stores
//!
//! ### Price fields
//! Transmitted as decimal strings (`"9.99"`), but plugin-modified stores
//! have been seen emitting bare numbers. [`lenient_decimal_string`] accepts
//! both and hands a string to normalization; anything else becomes absent.
//!
//! ### `stock_quantity`
//! `null` when stock is not tracked for the product. Tracked products send
//! an integer, though some inventory plugins write numeric strings.
//! [`lenient_stock_quantity`] coerces both; unusable values collapse to
//! `None` (untracked).
//!
//! ### `categories` / `images`
//! JSON arrays of objects. Malformed exports occasionally replace the array
//! with `false` or an object; [`lenient_list`] collapses a non-array field
//! to `[]` and drops individual entries that fail to parse, so one broken
//! gallery entry never poisons the record.
//!
//! ### `date_modified_gmt`
//! A zone-less `YYYY-MM-DDTHH:MM:SS` string that is UTC by contract.
//! Parsed during normalization, not here, because an unparseable value
//! rejects the whole record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single product from `GET /wp-json/wc/v3/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct WooProduct {
    /// Remote numeric product ID, stable across syncs.
    pub id: i64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub slug: String,

    /// Product type string; absent on some plugin-generated records.
    #[serde(rename = "type", default)]
    pub product_type: Option<String>,

    /// Publication status, e.g. `"publish"`, `"draft"`, `"private"`.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub short_description: Option<String>,

    /// Stock-keeping unit. May be absent or blank; blank SKUs are an
    /// admission failure during normalization.
    #[serde(default)]
    pub sku: Option<String>,

    /// Current effective price as a decimal string.
    #[serde(default, deserialize_with = "lenient_decimal_string")]
    pub price: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal_string")]
    pub regular_price: Option<String>,

    #[serde(default, deserialize_with = "lenient_decimal_string")]
    pub sale_price: Option<String>,

    #[serde(default)]
    pub on_sale: bool,

    /// `None` when stock is untracked or the value is unusable.
    #[serde(default, deserialize_with = "lenient_stock_quantity")]
    pub stock_quantity: Option<i64>,

    /// `"instock"`, `"outofstock"`, or `"onbackorder"` when present.
    #[serde(default)]
    pub stock_status: Option<String>,

    #[serde(default)]
    pub manage_stock: bool,

    /// Last-modified instant in GMT.
    #[serde(default)]
    pub date_modified_gmt: Option<String>,

    /// Category references, in listing order.
    #[serde(default, deserialize_with = "lenient_list")]
    pub categories: Vec<WooCategoryRef>,

    /// Gallery images, in listing order.
    #[serde(default, deserialize_with = "lenient_list")]
    pub images: Vec<WooImage>,
}

/// A category reference embedded in a product record.
#[derive(Debug, Clone, Deserialize)]
pub struct WooCategoryRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// A gallery image embedded in a product record.
#[derive(Debug, Clone, Deserialize)]
pub struct WooImage {
    /// Remote numeric image ID. Entries without one are structurally
    /// malformed and dropped during normalization.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub alt: String,
    /// 0-based gallery position.
    #[serde(default)]
    pub position: Option<i32>,
}

/// A full category record from `GET /wp-json/wc/v3/products/categories`.
#[derive(Debug, Clone, Deserialize)]
pub struct WooCategory {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Category image object, or `null` when none is set.
    #[serde(default)]
    pub image: Option<WooCategoryImage>,
}

/// The image object attached to a category record.
#[derive(Debug, Clone, Deserialize)]
pub struct WooCategoryImage {
    #[serde(default)]
    pub src: String,
}

/// Accepts a decimal string or a bare JSON number; anything else is absent.
fn lenient_decimal_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts an integer, a float (truncated), or a numeric string; `null` and
/// anything unusable map to `None` (stock untracked).
fn lenient_stock_quantity<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Coerces a field to a list: a non-array value collapses to `[]`, and
/// entries that fail to parse are dropped individually.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
