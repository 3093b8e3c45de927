//! Lists Use Case
//!
//! County and city pickers for the signup form and the home page.

use crate::domain::repository::{LocationRepository, TaxonomyRepository};
use crate::domain::services::{distinct_in_order, distinct_sorted};
use crate::error::CatalogResult;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListsOutput {
    /// All counties of the location list
    Counties(Vec<String>),
    /// Cities of the requested county
    Cities(Vec<String>),
    /// Service names and counties that have public providers
    Home {
        services: Vec<String>,
        judete: Vec<String>,
    },
}

pub struct ListsUseCase<R>
where
    R: TaxonomyRepository + LocationRepository,
{
    repo: Arc<R>,
}

impl<R> ListsUseCase<R>
where
    R: TaxonomyRepository + LocationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, mode: Option<&str>, judet: Option<&str>) -> CatalogResult<ListsOutput> {
        let mode = mode.map(str::trim).unwrap_or_default();
        let judet = judet.map(str::trim).filter(|j| !j.is_empty());

        if matches!(mode, "locations" | "signup") {
            return match judet {
                Some(judet) => {
                    let cities = self.repo.location_cities(judet).await?;
                    Ok(ListsOutput::Cities(distinct_in_order(cities)))
                }
                None => {
                    let counties = self.repo.location_counties().await?;
                    Ok(ListsOutput::Counties(distinct_in_order(counties)))
                }
            };
        }

        let (services, counties) = tokio::try_join!(
            self.repo.services(),
            self.repo.public_provider_counties(),
        )?;

        Ok(ListsOutput::Home {
            services: services.into_iter().map(|s| s.name).collect(),
            judete: distinct_sorted(counties),
        })
    }
}
