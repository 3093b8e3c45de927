//! Provider Page Use Case

use crate::domain::entities::{ProviderPage, Product};
use crate::domain::repository::ProviderRepository;
use crate::error::{CatalogError, CatalogResult};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ProviderPageOutput {
    pub page: ProviderPage,
    pub provider: serde_json::Value,
    pub products: Vec<Product>,
}

pub struct ProviderPageUseCase<R>
where
    R: ProviderRepository,
{
    repo: Arc<R>,
}

impl<R> ProviderPageUseCase<R>
where
    R: ProviderRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// `slug` may arrive percent-encoded a second time by some links.
    pub async fn execute(&self, slug: Option<&str>) -> CatalogResult<ProviderPageOutput> {
        let raw = slug
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CatalogError::MissingParam("slug"))?;
        let slug = urlencoding::decode(raw)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| raw.to_string());

        let page = self
            .repo
            .provider_page(&slug)
            .await?
            .ok_or(CatalogError::NotFound("Provider page not found"))?;

        let provider = self
            .repo
            .public_provider(page.provider_id)
            .await?
            .ok_or(CatalogError::NotFound("Provider not found or not public"))?;

        let products = self.repo.active_products(page.provider_id).await?;

        tracing::debug!(
            slug = %slug,
            provider_id = page.provider_id,
            products = products.len(),
            "Loaded provider page"
        );

        Ok(ProviderPageOutput {
            page,
            provider,
            products,
        })
    }
}
