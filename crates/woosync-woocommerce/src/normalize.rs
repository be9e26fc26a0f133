//! Normalization of raw WooCommerce records into [`woosync_core`] catalog
//! types, with per-record admission checks.
//!
//! [`normalize_product`] is a total function: every input maps to either an
//! admitted [`NormalizedProduct`] or a [`Rejection`] carrying the remote id,
//! name, and reason. Rejection is expected, frequent control flow, never an
//! error; the orchestrator logs one warning per rejected record and drops
//! it from the batch.

use chrono::{DateTime, NaiveDateTime, Utc};

use woosync_core::{
    NormalizedCategory, NormalizedImage, NormalizedProduct, ProductType, StockStatus,
};

use crate::types::{WooCategory, WooProduct};

/// Why a raw product record was refused admission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    /// SKU absent or blank after trimming. The record is discarded, never
    /// defaulted.
    #[error("missing or blank sku")]
    MissingSku,

    /// A `type` value was present but is not in the recognized set. An
    /// absent type defaults to `simple` instead.
    #[error("unrecognized product type {value:?}")]
    InvalidType { value: String },

    /// `date_modified_gmt` was absent or unparseable.
    #[error("unparseable last-modified timestamp {value:?}")]
    InvalidTimestamp { value: Option<String> },
}

impl RejectionReason {
    /// Stable snake_case tag for log filtering and aggregation.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::MissingSku => "missing_sku",
            Self::InvalidType { .. } => "invalid_type",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
        }
    }

    /// Path of the offending field in the raw record.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingSku => "sku",
            Self::InvalidType { .. } => "type",
            Self::InvalidTimestamp { .. } => "date_modified_gmt",
        }
    }
}

/// A rejected record with enough context for one attributable log line.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub remote_id: i64,
    pub name: String,
    pub reason: RejectionReason,
}

/// Normalizes a raw product record, admitting or rejecting it.
///
/// Cleaning policy, in order:
/// - SKU and `date_modified_gmt` are hard admission gates; a present but
///   unrecognized `type` also rejects.
/// - Gallery entries without a numeric id are dropped individually.
/// - `description`/`short_description` default to empty strings.
/// - Price fields parse to non-negative floats; absent, unparseable, or
///   negative input maps to 0.0.
/// - An absent `type` defaults to `simple`; an absent or unrecognized
///   `stock_status` falls back to `outofstock`.
/// - `is_active` derives from `status == "publish"`.
///
/// # Errors
///
/// Returns a [`Rejection`] when an admission gate fails.
pub fn normalize_product(product: WooProduct) -> Result<NormalizedProduct, Rejection> {
    let remote_id = product.id;

    let sku = match product.sku.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_owned(),
        _ => {
            return Err(Rejection {
                remote_id,
                name: product.name,
                reason: RejectionReason::MissingSku,
            })
        }
    };

    let kind = match product.product_type.as_deref() {
        None => ProductType::Simple,
        Some(raw) => match ProductType::parse(raw) {
            Some(kind) => kind,
            None => {
                return Err(Rejection {
                    remote_id,
                    name: product.name,
                    reason: RejectionReason::InvalidType {
                        value: raw.to_owned(),
                    },
                })
            }
        },
    };

    let date_modified = match parse_gmt_timestamp(product.date_modified_gmt.as_deref()) {
        Some(instant) => instant,
        None => {
            return Err(Rejection {
                remote_id,
                name: product.name,
                reason: RejectionReason::InvalidTimestamp {
                    value: product.date_modified_gmt,
                },
            })
        }
    };

    // Entries without a numeric id are structurally malformed and dropped
    // one by one; a bad gallery entry never disqualifies the product.
    let images = product
        .images
        .into_iter()
        .filter_map(|image| {
            let image_remote_id = image.id?;
            Some(NormalizedImage {
                remote_id: image_remote_id,
                src: image.src,
                alt: image.alt,
                position: image.position.unwrap_or(0),
            })
        })
        .collect();

    let category_ids = product.categories.iter().map(|c| c.id).collect();

    let is_active = product.status.as_deref() == Some("publish");

    Ok(NormalizedProduct {
        remote_id,
        name: product.name,
        slug: product.slug,
        sku,
        kind,
        is_active,
        description: product.description.unwrap_or_default(),
        short_description: product.short_description.unwrap_or_default(),
        price: parse_price(product.price.as_deref()),
        regular_price: parse_price(product.regular_price.as_deref()),
        sale_price: parse_price(product.sale_price.as_deref()),
        on_sale: product.on_sale,
        stock_quantity: product.stock_quantity,
        stock_status: StockStatus::parse_or_default(product.stock_status.as_deref()),
        manage_stock: product.manage_stock,
        date_modified,
        category_ids,
        images,
    })
}

/// Normalizes a raw category record. Categories have no admission gate.
#[must_use]
pub fn normalize_category(category: WooCategory) -> NormalizedCategory {
    let image_url = category
        .image
        .map(|image| image.src)
        .filter(|src| !src.is_empty());
    NormalizedCategory {
        remote_id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        image_url,
    }
}

/// Parses a decimal-string price. Absent, unparseable, non-finite, or
/// negative input maps to 0.0 so the normalized form always carries a
/// usable non-negative number.
fn parse_price(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|price| price.is_finite() && *price >= 0.0)
        .unwrap_or(0.0)
}

/// Parses a WooCommerce GMT timestamp. The API sends zone-less
/// `YYYY-MM-DDTHH:MM:SS` values that are UTC by contract; RFC 3339 values
/// with an explicit offset are accepted too.
fn parse_gmt_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// A raw product fixture that passes every admission gate; override
    /// fields per test via the JSON value.
    fn raw_product(overrides: serde_json::Value) -> WooProduct {
        let mut base = json!({
            "id": 101,
            "name": "Frosted Bulb",
            "slug": "frosted-bulb",
            "type": "simple",
            "status": "publish",
            "sku": "BULB-01",
            "price": "9.99",
            "regular_price": "9.99",
            "sale_price": "",
            "on_sale": false,
            "stock_quantity": 5,
            "stock_status": "instock",
            "manage_stock": true,
            "date_modified_gmt": "2026-01-15T10:30:00",
            "categories": [{"id": 7, "name": "Lighting", "slug": "lighting"}],
            "images": [{"id": 501, "src": "https://x/y.jpg", "alt": "", "position": 0}]
        });
        if let (Some(base_map), Some(override_map)) =
            (base.as_object_mut(), overrides.as_object())
        {
            for (key, value) in override_map {
                base_map.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(base).expect("fixture should deserialize")
    }

    #[test]
    fn admits_a_well_formed_product() {
        let normalized = normalize_product(raw_product(json!({}))).expect("should admit");
        assert_eq!(normalized.remote_id, 101);
        assert_eq!(normalized.sku, "BULB-01");
        assert_eq!(normalized.kind, ProductType::Simple);
        assert!(normalized.is_active);
        assert!((normalized.price - 9.99).abs() < f64::EPSILON);
        assert_eq!(normalized.stock_quantity, Some(5));
        assert_eq!(normalized.stock_status, StockStatus::InStock);
        assert_eq!(normalized.category_ids, vec![7]);
        assert_eq!(normalized.images.len(), 1);
        assert_eq!(normalized.images[0].remote_id, 501);
    }

    #[test]
    fn rejects_missing_sku() {
        let rejection =
            normalize_product(raw_product(json!({"sku": null}))).expect_err("should reject");
        assert_eq!(rejection.reason, RejectionReason::MissingSku);
        assert_eq!(rejection.reason.tag(), "missing_sku");
        assert_eq!(rejection.reason.field(), "sku");
        assert_eq!(rejection.remote_id, 101);
        assert_eq!(rejection.name, "Frosted Bulb");
    }

    #[test]
    fn rejects_blank_and_whitespace_sku() {
        for sku in ["", "   ", "\t\n"] {
            let rejection = normalize_product(raw_product(json!({"sku": sku})))
                .expect_err("blank sku should reject");
            assert_eq!(rejection.reason, RejectionReason::MissingSku);
        }
    }

    #[test]
    fn trims_sku_whitespace_on_admission() {
        let normalized =
            normalize_product(raw_product(json!({"sku": "  BULB-02  "}))).expect("should admit");
        assert_eq!(normalized.sku, "BULB-02");
    }

    #[test]
    fn unparseable_price_normalizes_to_zero() {
        let normalized = normalize_product(raw_product(
            json!({"price": "free!", "regular_price": null, "sale_price": "-3.50"}),
        ))
        .expect("should admit");
        assert_eq!(normalized.price, 0.0);
        assert_eq!(normalized.regular_price, 0.0);
        assert_eq!(normalized.sale_price, 0.0);
    }

    #[test]
    fn parseable_price_is_preserved() {
        let normalized =
            normalize_product(raw_product(json!({"price": " 12.50 "}))).expect("should admit");
        assert!((normalized.price - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn stock_quantity_null_means_untracked() {
        let normalized = normalize_product(raw_product(json!({"stock_quantity": null})))
            .expect("should admit");
        assert_eq!(normalized.stock_quantity, None);
    }

    #[test]
    fn stock_quantity_numeric_string_is_parsed() {
        let normalized = normalize_product(raw_product(json!({"stock_quantity": "17"})))
            .expect("should admit");
        assert_eq!(normalized.stock_quantity, Some(17));
    }

    #[test]
    fn stock_quantity_non_numeric_normalizes_to_untracked() {
        let normalized = normalize_product(raw_product(json!({"stock_quantity": "plenty"})))
            .expect("should admit");
        assert_eq!(normalized.stock_quantity, None);
    }

    #[test]
    fn absent_type_defaults_to_simple() {
        let normalized =
            normalize_product(raw_product(json!({"type": null}))).expect("should admit");
        assert_eq!(normalized.kind, ProductType::Simple);
    }

    #[test]
    fn unrecognized_type_rejects() {
        let rejection = normalize_product(raw_product(json!({"type": "subscription"})))
            .expect_err("should reject");
        assert_eq!(
            rejection.reason,
            RejectionReason::InvalidType {
                value: "subscription".to_owned()
            }
        );
        assert_eq!(rejection.reason.tag(), "invalid_type");
        assert_eq!(rejection.reason.field(), "type");
    }

    #[test]
    fn absent_stock_status_falls_back_to_out_of_stock() {
        let normalized = normalize_product(raw_product(json!({"stock_status": null})))
            .expect("should admit");
        assert_eq!(normalized.stock_status, StockStatus::OutOfStock);
    }

    #[test]
    fn unparseable_timestamp_rejects() {
        let rejection =
            normalize_product(raw_product(json!({"date_modified_gmt": "yesterday"})))
                .expect_err("should reject");
        assert_eq!(rejection.reason.tag(), "invalid_timestamp");
        assert_eq!(rejection.reason.field(), "date_modified_gmt");
    }

    #[test]
    fn absent_timestamp_rejects() {
        let rejection = normalize_product(raw_product(json!({"date_modified_gmt": null})))
            .expect_err("should reject");
        assert_eq!(
            rejection.reason,
            RejectionReason::InvalidTimestamp { value: None }
        );
    }

    #[test]
    fn rfc3339_timestamp_is_accepted() {
        let normalized = normalize_product(raw_product(
            json!({"date_modified_gmt": "2026-01-15T10:30:00Z"}),
        ))
        .expect("should admit");
        assert_eq!(normalized.date_modified.to_rfc3339(), "2026-01-15T10:30:00+00:00");
    }

    #[test]
    fn non_publish_status_is_inactive() {
        for status in ["draft", "private", "pending"] {
            let normalized = normalize_product(raw_product(json!({"status": status})))
                .expect("should admit");
            assert!(!normalized.is_active, "status {status:?} should be inactive");
        }
    }

    #[test]
    fn description_defaults_to_empty_string() {
        let normalized = normalize_product(raw_product(
            json!({"description": null, "short_description": null}),
        ))
        .expect("should admit");
        assert_eq!(normalized.description, "");
        assert_eq!(normalized.short_description, "");
    }

    #[test]
    fn malformed_gallery_entries_are_dropped_individually() {
        let normalized = normalize_product(raw_product(json!({
            "images": [
                {"id": 501, "src": "https://x/a.jpg", "position": 0},
                {"src": "https://x/no-id.jpg", "position": 1},
                {"id": 502, "src": "https://x/b.jpg", "position": 2}
            ]
        })))
        .expect("should admit");
        let ids: Vec<i64> = normalized.images.iter().map(|i| i.remote_id).collect();
        assert_eq!(ids, vec![501, 502]);
    }

    #[test]
    fn absent_categories_normalize_to_empty() {
        let normalized =
            normalize_product(raw_product(json!({"categories": null}))).expect("should admit");
        assert!(normalized.category_ids.is_empty());
    }

    #[test]
    fn normalize_category_maps_image_url() {
        let category: WooCategory = serde_json::from_value(json!({
            "id": 7,
            "name": "Lighting",
            "slug": "lighting",
            "description": "Lamps and fixtures",
            "image": {"src": "https://x/cat.jpg"}
        }))
        .expect("category fixture should deserialize");
        let normalized = normalize_category(category);
        assert_eq!(normalized.remote_id, 7);
        assert_eq!(normalized.image_url.as_deref(), Some("https://x/cat.jpg"));
    }

    #[test]
    fn normalize_category_empty_image_src_is_none() {
        let category: WooCategory = serde_json::from_value(json!({
            "id": 8,
            "name": "Misc",
            "slug": "misc",
            "image": {"src": ""}
        }))
        .expect("category fixture should deserialize");
        assert!(normalize_category(category).image_url.is_none());
    }
}
