//! Taxonomy Use Case
//!
//! Counts of what is offered where, for the search sidebar.

use crate::domain::entities::{AreaCount, TaxonomyCount};
use crate::domain::repository::{AreaScope, LocationRepository, TaxonomyRepository};
use crate::domain::services::{
    aggregate_by_id, area_counts, filter_area, service_names_in_area,
};
use crate::domain::value_objects::{AreaFilter, TaxonomyMode};
use crate::error::{CatalogError, CatalogResult};
use kernel::text::match_name;
use kernel::validation::parse_numeric_id;
use std::sync::Arc;

/// Raw query values
#[derive(Debug, Clone, Default)]
pub struct TaxonomyInput {
    pub mode: Option<String>,
    pub service: Option<String>,
    pub subcat: Option<String>,
    pub judet: Option<String>,
    pub oras: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyOutput {
    /// Service names
    Categories(Vec<String>),
    /// Top-level subcategories of a service
    Subcategories(Vec<TaxonomyCount>),
    /// Children of a subcategory
    Children(Vec<TaxonomyCount>),
    /// Counties, or cities of one county
    Areas(Vec<AreaCount>),
}

pub struct TaxonomyUseCase<R>
where
    R: TaxonomyRepository + LocationRepository,
{
    repo: Arc<R>,
}

impl<R> TaxonomyUseCase<R>
where
    R: TaxonomyRepository + LocationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: TaxonomyInput) -> CatalogResult<TaxonomyOutput> {
        let mode = TaxonomyMode::parse(input.mode.as_deref().unwrap_or_default())
            .ok_or(CatalogError::InvalidMode)?;
        let area = AreaFilter::new(input.judet.as_deref(), input.oras.as_deref());

        match mode {
            TaxonomyMode::Categories => self.categories(&area).await,
            TaxonomyMode::Subcategories => {
                self.subcategories(input.service.as_deref().unwrap_or_default(), &area)
                    .await
            }
            TaxonomyMode::Children => {
                self.children(input.subcat.as_deref().unwrap_or_default(), &area)
                    .await
            }
            TaxonomyMode::Areas => {
                let providers = self.repo.active_provider_areas().await?;
                Ok(TaxonomyOutput::Areas(area_counts(&providers, &area)))
            }
        }
    }

    async fn categories(&self, area: &AreaFilter) -> CatalogResult<TaxonomyOutput> {
        if area.is_empty() {
            let services = self.repo.services().await?;
            return Ok(TaxonomyOutput::Categories(
                services.into_iter().map(|s| s.name).collect(),
            ));
        }
        let providers = self.repo.active_provider_areas().await?;
        Ok(TaxonomyOutput::Categories(service_names_in_area(
            &providers, area,
        )))
    }

    async fn subcategories(&self, service: &str, area: &AreaFilter) -> CatalogResult<TaxonomyOutput> {
        let services = self.repo.services().await?;
        let Some(service_id) = match_name(services.iter().map(|s| (s.id, s.name.as_str())), service)
        else {
            tracing::debug!(service = %service, "Unknown service in taxonomy lookup");
            return Ok(TaxonomyOutput::Subcategories(Vec::new()));
        };

        let rows = self
            .repo
            .area_subcategories(AreaScope::Service(service_id))
            .await?;
        let top_level = filter_area(&rows, area).filter(|row| row.parent_id.is_none());
        Ok(TaxonomyOutput::Subcategories(aggregate_by_id(top_level)))
    }

    async fn children(&self, subcat: &str, area: &AreaFilter) -> CatalogResult<TaxonomyOutput> {
        let Some(parent_id) = parse_numeric_id(subcat.trim()).filter(|id| *id > 0) else {
            return Ok(TaxonomyOutput::Children(Vec::new()));
        };

        let rows = self
            .repo
            .area_subcategories(AreaScope::Parent(parent_id))
            .await?;
        Ok(TaxonomyOutput::Children(aggregate_by_id(filter_area(
            &rows, area,
        ))))
    }
}
