//! HTTP Handlers

use crate::application::categories::ListCategoriesUseCase;
use crate::application::config::CatalogConfig;
use crate::application::lists::ListsUseCase;
use crate::application::provider_page::ProviderPageUseCase;
use crate::application::search_providers::SearchProvidersUseCase;
use crate::application::selects::{ChildrenOutput, ListChildrenUseCase, ListSubcategoriesUseCase};
use crate::application::taxonomy::{TaxonomyInput, TaxonomyUseCase};
use crate::domain::repository::CatalogRepository;
use crate::domain::value_objects::{ProviderParams, ProviderQuery};
use crate::error::CatalogResult;
use crate::presentation::dto::{
    CategoriesResponse, ChildrenQuery, ItemsResponse, ListsQuery, ListsResponse,
    ProviderPageQuery, ProviderPageResponse, ProvidersQuery, ProvidersResponse,
    SubcategoriesQuery, TaxonomyQuery, TaxonomyResponse,
};
use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use platform::web::cache_public;
use std::sync::Arc;

/// Shared state for catalog handlers
#[derive(Clone)]
pub struct CatalogAppState<R>
where
    R: CatalogRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<CatalogConfig>,
}

/// GET /api/categories
pub async fn categories<R>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<impl IntoResponse>
where
    R: CatalogRepository,
{
    let output = ListCategoriesUseCase::new(state.repo.clone()).execute().await?;

    Ok((
        cache_public(state.config.categories_max_age),
        Json(CategoriesResponse {
            items: output.items,
            services: output.services,
            subs: output.subs,
            filters: output.filters,
        }),
    ))
}

/// GET /api/subcategories?serviceId=
pub async fn subcategories<R>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<SubcategoriesQuery>,
) -> CatalogResult<impl IntoResponse>
where
    R: CatalogRepository,
{
    let items = ListSubcategoriesUseCase::new(state.repo.clone())
        .execute(query.service_id.as_deref())
        .await?;

    Ok((
        cache_public(state.config.selects_max_age),
        Json(ItemsResponse { items }),
    ))
}

/// GET /api/children?subcatId= (or ?subcat=)
pub async fn children<R>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<ChildrenQuery>,
) -> CatalogResult<impl IntoResponse>
where
    R: CatalogRepository,
{
    let output = ListChildrenUseCase::new(state.repo.clone())
        .execute(query.value())
        .await?;

    let max_age = match output {
        ChildrenOutput::Found(_) => state.config.selects_max_age,
        ChildrenOutput::Unresolved => state.config.unresolved_max_age,
    };

    Ok((
        cache_public(max_age),
        Json(ItemsResponse {
            items: output.into_items(),
        }),
    ))
}

/// GET /api/taxonomy?mode=
pub async fn taxonomy<R>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<TaxonomyQuery>,
) -> CatalogResult<impl IntoResponse>
where
    R: CatalogRepository,
{
    let input = TaxonomyInput {
        mode: query.mode,
        service: query.service,
        subcat: query.subcat,
        judet: query.judet,
        oras: query.oras,
    };
    let output = TaxonomyUseCase::new(state.repo.clone()).execute(input).await?;

    Ok((
        cache_public(state.config.taxonomy_max_age),
        Json(TaxonomyResponse::from(output)),
    ))
}

/// GET /api/lists
pub async fn lists<R>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<ListsQuery>,
) -> CatalogResult<impl IntoResponse>
where
    R: CatalogRepository,
{
    let output = ListsUseCase::new(state.repo.clone())
        .execute(query.mode.as_deref(), query.judet.as_deref())
        .await?;

    Ok((
        cache_public(state.config.lists_max_age),
        Json(ListsResponse::from(output)),
    ))
}

/// GET /api/providers
pub async fn providers<R>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<ProvidersQuery>,
) -> CatalogResult<impl IntoResponse>
where
    R: CatalogRepository,
{
    let search = ProviderQuery::from_params(ProviderParams {
        judet: query.judet.as_deref(),
        oras: query.oras.as_deref(),
        service: query.service.as_deref(),
        subcat: query.subcat.as_deref(),
        subsub: query.subsub.as_deref(),
        sort: query.sort.as_deref(),
        page: query.page.as_deref(),
        per_page: query.per_page.as_deref(),
    });

    let matches = SearchProvidersUseCase::new(state.repo.clone())
        .execute(&search)
        .await?;

    Ok((
        cache_public(state.config.providers_max_age),
        Json(ProvidersResponse {
            items: matches.items,
            total: matches.total,
            page: search.page,
            per_page: search.per_page,
        }),
    ))
}

/// GET /api/provider_page?slug=
pub async fn provider_page<R>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<ProviderPageQuery>,
) -> CatalogResult<impl IntoResponse>
where
    R: CatalogRepository,
{
    let output = ProviderPageUseCase::new(state.repo.clone())
        .execute(query.slug.as_deref())
        .await?;

    Ok((
        cache_public(state.config.provider_page_max_age),
        Json(ProviderPageResponse {
            page: output.page,
            provider: output.provider,
            products: output.products,
        }),
    ))
}
