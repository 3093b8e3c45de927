//! Search Providers Use Case

use crate::domain::repository::ProviderRepository;
use crate::domain::services::{ProviderMatches, search_providers};
use crate::domain::value_objects::ProviderQuery;
use crate::error::CatalogResult;
use std::sync::Arc;

pub struct SearchProvidersUseCase<R>
where
    R: ProviderRepository,
{
    repo: Arc<R>,
}

impl<R> SearchProvidersUseCase<R>
where
    R: ProviderRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The view is read whole and filtered here so that area and service
    /// names compare without diacritics.
    pub async fn execute(&self, query: &ProviderQuery) -> CatalogResult<ProviderMatches> {
        let rows = self.repo.search_rows().await?;
        let scanned = rows.len();
        let matches = search_providers(rows, query);

        tracing::debug!(
            scanned,
            total = matches.total,
            page = query.page,
            "Provider search"
        );
        Ok(matches)
    }
}
