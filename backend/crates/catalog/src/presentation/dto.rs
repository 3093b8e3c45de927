//! API DTOs (Data Transfer Objects)

use crate::application::categories::CategoryItem;
use crate::application::lists::ListsOutput;
use crate::application::taxonomy::TaxonomyOutput;
use crate::domain::entities::{
    AreaCount, NamedItem, ProviderPage, ProviderSummary, Product, Service, Subcategory,
    SubcategoryFilter, TaxonomyCount,
};
use serde::{Deserialize, Serialize};

/// Response for GET /api/categories
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub items: Vec<CategoryItem>,
    pub services: Vec<Service>,
    pub subs: Vec<Subcategory>,
    pub filters: Vec<SubcategoryFilter>,
}

/// Query for GET /api/subcategories
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubcategoriesQuery {
    #[serde(rename = "serviceId")]
    pub service_id: Option<String>,
}

/// Query for GET /api/children
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildrenQuery {
    #[serde(rename = "subcatId")]
    pub subcat_id: Option<String>,
    pub subcat: Option<String>,
}

impl ChildrenQuery {
    /// `subcatId` wins over `subcat`.
    pub fn value(&self) -> Option<&str> {
        self.subcat_id.as_deref().or(self.subcat.as_deref())
    }
}

/// `{items}` response of the cascading selects
#[derive(Debug, Clone, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<NamedItem>,
}

/// Query for GET /api/taxonomy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxonomyQuery {
    pub mode: Option<String>,
    pub service: Option<String>,
    pub subcat: Option<String>,
    pub judet: Option<String>,
    pub oras: Option<String>,
}

/// Response for GET /api/taxonomy, one shape per mode
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TaxonomyResponse {
    Categories { services: Vec<String> },
    Subcategories { subcategories: Vec<TaxonomyCount> },
    Children { children: Vec<TaxonomyCount> },
    Areas { areas: Vec<AreaCount> },
}

impl From<TaxonomyOutput> for TaxonomyResponse {
    fn from(output: TaxonomyOutput) -> Self {
        match output {
            TaxonomyOutput::Categories(services) => TaxonomyResponse::Categories { services },
            TaxonomyOutput::Subcategories(subcategories) => {
                TaxonomyResponse::Subcategories { subcategories }
            }
            TaxonomyOutput::Children(children) => TaxonomyResponse::Children { children },
            TaxonomyOutput::Areas(areas) => TaxonomyResponse::Areas { areas },
        }
    }
}

/// Query for GET /api/lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListsQuery {
    pub mode: Option<String>,
    pub judet: Option<String>,
}

/// Response for GET /api/lists
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ListsResponse {
    Counties { judete: Vec<String> },
    Cities { orase: Vec<String> },
    Home { services: Vec<String>, judete: Vec<String> },
}

impl From<ListsOutput> for ListsResponse {
    fn from(output: ListsOutput) -> Self {
        match output {
            ListsOutput::Counties(judete) => ListsResponse::Counties { judete },
            ListsOutput::Cities(orase) => ListsResponse::Cities { orase },
            ListsOutput::Home { services, judete } => ListsResponse::Home { services, judete },
        }
    }
}

/// Query for GET /api/providers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersQuery {
    pub judet: Option<String>,
    pub oras: Option<String>,
    pub service: Option<String>,
    pub subcat: Option<String>,
    pub subsub: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Response for GET /api/providers
#[derive(Debug, Clone, Serialize)]
pub struct ProvidersResponse {
    pub items: Vec<ProviderSummary>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Query for GET /api/provider_page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderPageQuery {
    pub slug: Option<String>,
}

/// Response for GET /api/provider_page
#[derive(Debug, Clone, Serialize)]
pub struct ProviderPageResponse {
    pub page: ProviderPage,
    pub provider: serde_json::Value,
    pub products: Vec<Product>,
}
