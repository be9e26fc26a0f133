//! Normalized catalog types shared between the WooCommerce client and the
//! database layer.
//!
//! A [`NormalizedProduct`] only exists for records that passed every
//! admission check; raw API shapes never cross this boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product types recognized by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Simple,
    Variable,
    Bundle,
    Variation,
    Grouped,
    External,
}

impl ProductType {
    /// Parses a raw type string. Returns `None` for unrecognized values so
    /// the caller can decide between defaulting and rejecting.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "simple" => Some(Self::Simple),
            "variable" => Some(Self::Variable),
            "bundle" => Some(Self::Bundle),
            "variation" => Some(Self::Variation),
            "grouped" => Some(Self::Grouped),
            "external" => Some(Self::External),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Variable => "variable",
            Self::Bundle => "bundle",
            Self::Variation => "variation",
            Self::Grouped => "grouped",
            Self::External => "external",
        }
    }
}

/// Stock availability states used by the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    OnBackorder,
}

impl StockStatus {
    /// Parses a raw stock status. Absent or unrecognized values fall back to
    /// `OutOfStock`, the conservative reading for a storefront.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("instock") => Self::InStock,
            Some("onbackorder") => Self::OnBackorder,
            _ => Self::OutOfStock,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "instock",
            Self::OutOfStock => "outofstock",
            Self::OnBackorder => "onbackorder",
        }
    }
}

/// A product record that passed every admission check, ready for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedProduct {
    /// Remote catalog identifier, stable across syncs.
    pub remote_id: i64,
    pub name: String,
    pub slug: String,
    /// Always non-empty: records without a usable SKU are rejected, never
    /// defaulted.
    pub sku: String,
    pub kind: ProductType,
    /// Derived from the remote status: `true` iff the record is published.
    pub is_active: bool,
    pub description: String,
    pub short_description: String,
    /// Prices are always present and non-negative; absent or unparseable
    /// input normalizes to 0.0.
    pub price: f64,
    pub regular_price: f64,
    pub sale_price: f64,
    pub on_sale: bool,
    /// `None` means the remote does not track stock for this product.
    pub stock_quantity: Option<i64>,
    pub stock_status: StockStatus,
    pub manage_stock: bool,
    /// Remote last-modified instant.
    pub date_modified: DateTime<Utc>,
    /// Remote category identifiers, in listing order. Resolved to local ids
    /// by the orchestrator after category sync.
    pub category_ids: Vec<i64>,
    pub images: Vec<NormalizedImage>,
}

/// A structurally well-formed gallery image belonging to a product.
///
/// Carries the remote product linkage implicitly through its parent
/// [`NormalizedProduct`]; the local foreign key only exists after the
/// product row is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedImage {
    pub remote_id: i64,
    pub src: String,
    pub alt: String,
    pub position: i32,
}

/// A category record from the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedCategory {
    pub remote_id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image_url: Option<String>,
}
