//! Catalog Router

use crate::application::config::CatalogConfig;
use crate::domain::repository::CatalogRepository;
use crate::infra::hosted::HostedCatalogRepository;
use crate::presentation::handlers::{self, CatalogAppState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Create the catalog router backed by the hosted database
pub fn catalog_router(repo: HostedCatalogRepository, config: CatalogConfig) -> Router {
    catalog_router_generic(repo, config)
}

/// Create a catalog router for any repository implementation
pub fn catalog_router_generic<R>(repo: R, config: CatalogConfig) -> Router
where
    R: CatalogRepository,
{
    let state = CatalogAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/categories", get(handlers::categories::<R>))
        .route("/subcategories", get(handlers::subcategories::<R>))
        .route("/children", get(handlers::children::<R>))
        .route("/taxonomy", get(handlers::taxonomy::<R>))
        .route("/lists", get(handlers::lists::<R>))
        .route("/providers", get(handlers::providers::<R>))
        .route("/provider_page", get(handlers::provider_page::<R>))
        .with_state(state)
}
