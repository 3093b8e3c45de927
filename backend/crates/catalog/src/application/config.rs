//! Application Configuration
//!
//! Cache lifetimes for the public catalog reads, in seconds.

/// Catalog application configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// `categories`
    pub categories_max_age: u32,
    /// `subcategories` and resolved `children`
    pub selects_max_age: u32,
    /// `children` when the subcategory name did not resolve
    pub unresolved_max_age: u32,
    /// `taxonomy`
    pub taxonomy_max_age: u32,
    /// `lists`
    pub lists_max_age: u32,
    /// `providers`
    pub providers_max_age: u32,
    /// `provider_page`
    pub provider_page_max_age: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            categories_max_age: 60,
            selects_max_age: 120,
            unresolved_max_age: 60,
            taxonomy_max_age: 60,
            lists_max_age: 60,
            providers_max_age: 30,
            provider_page_max_age: 60,
        }
    }
}
