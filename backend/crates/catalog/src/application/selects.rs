//! Cascading Select Use Cases
//!
//! Service → subcategory → child lookups used by the signup and offer forms.

use crate::domain::entities::NamedItem;
use crate::domain::repository::TaxonomyRepository;
use crate::error::{CatalogError, CatalogResult};
use kernel::validation::parse_numeric_id;
use std::sync::Arc;

/// Subcategories of one service
pub struct ListSubcategoriesUseCase<R>
where
    R: TaxonomyRepository,
{
    repo: Arc<R>,
}

impl<R> ListSubcategoriesUseCase<R>
where
    R: TaxonomyRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, service_id: Option<&str>) -> CatalogResult<Vec<NamedItem>> {
        let raw = service_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CatalogError::MissingParam("serviceId"))?;
        let service_id = parse_numeric_id(raw).ok_or(CatalogError::InvalidParam("serviceId"))?;

        self.repo.service_subcategories(service_id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildrenOutput {
    Found(Vec<NamedItem>),
    /// The subcategory name matched nothing
    Unresolved,
}

impl ChildrenOutput {
    pub fn into_items(self) -> Vec<NamedItem> {
        match self {
            ChildrenOutput::Found(items) => items,
            ChildrenOutput::Unresolved => Vec::new(),
        }
    }
}

/// Children of one subcategory, given by id or by name
pub struct ListChildrenUseCase<R>
where
    R: TaxonomyRepository,
{
    repo: Arc<R>,
}

impl<R> ListChildrenUseCase<R>
where
    R: TaxonomyRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, subcategory: Option<&str>) -> CatalogResult<ChildrenOutput> {
        let raw = subcategory
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CatalogError::MissingParam("subcatId"))?;

        let subcategory_id = match parse_numeric_id(raw) {
            Some(id) => id,
            None => match self.repo.find_service_subcategory(raw).await? {
                Some(id) => id,
                None => {
                    tracing::debug!(name = %raw, "Subcategory name did not resolve");
                    return Ok(ChildrenOutput::Unresolved);
                }
            },
        };

        let items = self.repo.service_children(subcategory_id).await?;
        Ok(ChildrenOutput::Found(items))
    }
}
