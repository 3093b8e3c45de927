//! List Categories Use Case

use crate::domain::entities::{Service, Subcategory, SubcategoryFilter};
use crate::domain::repository::TaxonomyRepository;
use crate::error::CatalogResult;
use kernel::text::title_case;
use serde::Serialize;
use std::sync::Arc;

/// Service entry of the category select
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryItem {
    pub id: i64,
    pub name: String,
    /// Name as shown in the select
    pub display: String,
}

#[derive(Debug, Clone)]
pub struct CategoriesOutput {
    pub items: Vec<CategoryItem>,
    pub services: Vec<Service>,
    pub subs: Vec<Subcategory>,
    pub filters: Vec<SubcategoryFilter>,
}

/// Whole taxonomy in one read, for the category pickers
pub struct ListCategoriesUseCase<R>
where
    R: TaxonomyRepository,
{
    repo: Arc<R>,
}

impl<R> ListCategoriesUseCase<R>
where
    R: TaxonomyRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> CatalogResult<CategoriesOutput> {
        let (services, subs, filters) = tokio::try_join!(
            self.repo.services(),
            self.repo.subcategories(),
            self.repo.subcategory_filters(),
        )?;

        let items = services
            .iter()
            .map(|s| CategoryItem {
                id: s.id,
                name: s.name.clone(),
                display: title_case(&s.name),
            })
            .collect();

        tracing::debug!(
            services = services.len(),
            subcategories = subs.len(),
            filters = filters.len(),
            "Listed categories"
        );

        Ok(CategoriesOutput {
            items,
            services,
            subs,
            filters,
        })
    }
}
