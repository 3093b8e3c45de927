//! Repository Traits
//!
//! Read-only interfaces over the hosted database. Implementation is in the
//! infrastructure layer.

use crate::domain::entities::{
    AreaSubcategoryRow, NamedItem, ProviderArea, ProviderPage, ProviderSummary, Product,
    Service, Subcategory, SubcategoryFilter,
};
use crate::error::CatalogResult;

/// Which rows of the per-area subcategory view to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaScope {
    /// Subcategories of one service
    Service(i64),
    /// Children of one subcategory
    Parent(i64),
}

/// Services, subcategories and their children
#[trait_variant::make(TaxonomyRepository: Send)]
pub trait LocalTaxonomyRepository {
    /// All services ordered by name
    async fn services(&self) -> CatalogResult<Vec<Service>>;

    /// All subcategories ordered by position
    async fn subcategories(&self) -> CatalogResult<Vec<Subcategory>>;

    /// All subcategory filters ordered by position
    async fn subcategory_filters(&self) -> CatalogResult<Vec<SubcategoryFilter>>;

    async fn service_subcategories(&self, service_id: i64) -> CatalogResult<Vec<NamedItem>>;

    /// Id of the subcategory with this name, compared case-insensitively
    async fn find_service_subcategory(&self, name: &str) -> CatalogResult<Option<i64>>;

    async fn service_children(&self, subcategory_id: i64) -> CatalogResult<Vec<NamedItem>>;

    /// Per-area provider counts of active subcategories
    async fn area_subcategories(&self, scope: AreaScope) -> CatalogResult<Vec<AreaSubcategoryRow>>;
}

/// Counties, cities and where providers work
#[trait_variant::make(LocationRepository: Send)]
pub trait LocalLocationRepository {
    /// Counties of the signup location list, ordered
    async fn location_counties(&self) -> CatalogResult<Vec<String>>;

    /// Cities of one county, ordered; the county is matched case-insensitively
    async fn location_cities(&self, judet: &str) -> CatalogResult<Vec<String>>;

    /// County of every public provider, unordered and with repeats
    async fn public_provider_counties(&self) -> CatalogResult<Vec<String>>;

    /// Service and area of every active provider
    async fn active_provider_areas(&self) -> CatalogResult<Vec<ProviderArea>>;
}

/// Public provider listings and pages
#[trait_variant::make(ProviderRepository: Send)]
pub trait LocalProviderRepository {
    /// Every row of the provider search view
    async fn search_rows(&self) -> CatalogResult<Vec<ProviderSummary>>;

    async fn provider_page(&self, slug: &str) -> CatalogResult<Option<ProviderPage>>;

    /// Full public row of one provider, passed through to clients as is
    async fn public_provider(&self, provider_id: i64) -> CatalogResult<Option<serde_json::Value>>;

    /// Active products, newest first
    async fn active_products(&self, provider_id: i64) -> CatalogResult<Vec<Product>>;
}

/// Everything the catalog routes read, bundled for handler bounds.
pub trait CatalogRepository:
    TaxonomyRepository + LocationRepository + ProviderRepository + Clone + Send + Sync + 'static
{
}

impl<T> CatalogRepository for T where
    T: TaxonomyRepository + LocationRepository + ProviderRepository + Clone + Send + Sync + 'static
{
}
