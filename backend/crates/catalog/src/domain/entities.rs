//! Catalog rows as read from the hosted database.
//!
//! Field names follow the table and view columns so rows serialize back to
//! clients unchanged.

use serde::{Deserialize, Serialize};

/// Top-level category (`services`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
}

/// `subcategories` row, with optional slug and display position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: i64,
    pub service_id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// Search facet attached to a subcategory (`subcategory_filters`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryFilter {
    pub id: i64,
    pub subcategory_id: i64,
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: serde_json::Value,
    #[serde(default)]
    pub position: Option<i32>,
}

/// `{id, name}` pair used by the cascading selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedItem {
    pub id: i64,
    pub name: String,
}

/// Where an active provider works and what it offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderArea {
    pub service_name: Option<String>,
    pub judet: Option<String>,
    pub oras: Option<String>,
}

/// Row of `v_active_subcategories_by_area`: active provider count for one
/// subcategory in one county/city.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AreaSubcategoryRow {
    pub subcategory_id: i64,
    pub subcategory_name: String,
    #[serde(default)]
    pub service_id: Option<i64>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub judet: Option<String>,
    #[serde(default)]
    pub oras: Option<String>,
    #[serde(default)]
    pub providers_count: Option<i64>,
}

/// `locations` row (county, city)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub judet: String,
    #[serde(default)]
    pub oras: Option<String>,
}

/// Row of `v_search_providers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: i64,
    pub company_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub judet: Option<String>,
    #[serde(default)]
    pub oras: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_online: Option<bool>,
    #[serde(default)]
    pub subcat_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Public landing page of a provider (`provider_pages`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPage {
    pub provider_id: i64,
    pub slug: String,
    #[serde(default)]
    pub template_choice: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub gallery: serde_json::Value,
    #[serde(default)]
    pub long_description: Option<String>,
}

/// Active product listed on a provider page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Aggregated subcategory with its provider count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyCount {
    pub id: i64,
    pub name: String,
    pub count: i64,
}

/// County or city with its active provider count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaCount {
    pub name: String,
    pub count: i64,
}
