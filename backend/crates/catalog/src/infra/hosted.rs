//! Hosted Database Repository Implementations
//!
//! Every catalog read is public, so all queries run under the anon key and
//! row-level policies decide what is visible.

use crate::domain::entities::{
    AreaSubcategoryRow, NamedItem, ProviderArea, ProviderPage, ProviderSummary, Product,
    Service, Subcategory, SubcategoryFilter,
};
use crate::domain::repository::{
    AreaScope, LocationRepository, ProviderRepository, TaxonomyRepository,
};
use crate::error::CatalogResult;
use platform::hosted::{HostedClient, Scope};
use serde::Deserialize;

const AREA_VIEW: &str = "v_active_subcategories_by_area";
const SEARCH_VIEW: &str = "v_search_providers";
const SEARCH_COLUMNS: &str = "id,company_name,description,service_name,judet,oras,created_at,is_online,subcat_ids,logo,photo_url";

#[derive(Deserialize)]
struct IdRow {
    id: i64,
}

#[derive(Deserialize)]
struct CountyRow {
    #[serde(default)]
    judet: Option<String>,
}

#[derive(Deserialize)]
struct CityRow {
    #[serde(default)]
    oras: Option<String>,
}

#[derive(Deserialize)]
struct ServiceName {
    name: String,
}

/// `providers` row with its service embedded through the foreign key
#[derive(Deserialize)]
struct ActiveProviderRow {
    #[serde(default)]
    services: Option<ServiceName>,
    #[serde(default)]
    judet: Option<String>,
    #[serde(default)]
    oras: Option<String>,
}

/// Hosted-database-backed catalog repository
#[derive(Clone)]
pub struct HostedCatalogRepository {
    client: HostedClient,
}

impl HostedCatalogRepository {
    pub fn new(client: HostedClient) -> Self {
        Self { client }
    }

    fn db(&self) -> Scope {
        self.client.anon()
    }
}

impl TaxonomyRepository for HostedCatalogRepository {
    async fn services(&self) -> CatalogResult<Vec<Service>> {
        Ok(self
            .db()
            .from("services")
            .select("id,name")
            .order("name", true)
            .fetch()
            .await?)
    }

    async fn subcategories(&self) -> CatalogResult<Vec<Subcategory>> {
        Ok(self
            .db()
            .from("subcategories")
            .select("id,service_id,name,slug,position")
            .order("position", true)
            .fetch()
            .await?)
    }

    async fn subcategory_filters(&self) -> CatalogResult<Vec<SubcategoryFilter>> {
        Ok(self
            .db()
            .from("subcategory_filters")
            .select("id,subcategory_id,key,label,type,options,position")
            .order("position", true)
            .fetch()
            .await?)
    }

    async fn service_subcategories(&self, service_id: i64) -> CatalogResult<Vec<NamedItem>> {
        Ok(self
            .db()
            .from("service_subcategories")
            .select("id,name")
            .eq("service_id", service_id)
            .order("name", true)
            .fetch()
            .await?)
    }

    async fn find_service_subcategory(&self, name: &str) -> CatalogResult<Option<i64>> {
        let row: Option<IdRow> = self
            .db()
            .from("service_subcategories")
            .select("id")
            .ilike("name", &escape_like(name))
            .maybe_single()
            .await?;
        Ok(row.map(|r| r.id))
    }

    async fn service_children(&self, subcategory_id: i64) -> CatalogResult<Vec<NamedItem>> {
        Ok(self
            .db()
            .from("service_children")
            .select("id,name")
            .eq("subcategory_id", subcategory_id)
            .order("name", true)
            .fetch()
            .await?)
    }

    async fn area_subcategories(&self, scope: AreaScope) -> CatalogResult<Vec<AreaSubcategoryRow>> {
        let query = self.db().from(AREA_VIEW).select(
            "subcategory_id,subcategory_name,service_id,parent_id,judet,oras,providers_count",
        );
        let query = match scope {
            AreaScope::Service(id) => query.eq("service_id", id),
            AreaScope::Parent(id) => query.eq("parent_id", id),
        };
        Ok(query.fetch().await?)
    }
}

impl LocationRepository for HostedCatalogRepository {
    async fn location_counties(&self) -> CatalogResult<Vec<String>> {
        let rows: Vec<CountyRow> = self
            .db()
            .from("locations")
            .select("judet")
            .order("judet", true)
            .fetch()
            .await?;
        Ok(rows.into_iter().filter_map(|r| r.judet).collect())
    }

    async fn location_cities(&self, judet: &str) -> CatalogResult<Vec<String>> {
        let rows: Vec<CityRow> = self
            .db()
            .from("locations")
            .select("oras,judet")
            .ilike("judet", &escape_like(judet))
            .order("oras", true)
            .fetch()
            .await?;
        Ok(rows.into_iter().filter_map(|r| r.oras).collect())
    }

    async fn public_provider_counties(&self) -> CatalogResult<Vec<String>> {
        let rows: Vec<CountyRow> = self
            .db()
            .from("v_public_providers")
            .select("judet")
            .fetch()
            .await?;
        Ok(rows.into_iter().filter_map(|r| r.judet).collect())
    }

    async fn active_provider_areas(&self) -> CatalogResult<Vec<ProviderArea>> {
        let rows: Vec<ActiveProviderRow> = self
            .db()
            .from("providers")
            .select("services(name),judet,oras")
            .eq("is_active", true)
            .fetch()
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| ProviderArea {
                service_name: r.services.map(|s| s.name),
                judet: r.judet,
                oras: r.oras,
            })
            .collect())
    }
}

impl ProviderRepository for HostedCatalogRepository {
    async fn search_rows(&self) -> CatalogResult<Vec<ProviderSummary>> {
        Ok(self
            .db()
            .from(SEARCH_VIEW)
            .select(SEARCH_COLUMNS)
            .fetch()
            .await?)
    }

    async fn provider_page(&self, slug: &str) -> CatalogResult<Option<ProviderPage>> {
        Ok(self
            .db()
            .from("provider_pages")
            .select("provider_id,slug,template_choice,cover_url,gallery,long_description")
            .eq("slug", slug)
            .maybe_single()
            .await?)
    }

    async fn public_provider(&self, provider_id: i64) -> CatalogResult<Option<serde_json::Value>> {
        Ok(self
            .db()
            .from(SEARCH_VIEW)
            .select("*")
            .eq("id", provider_id)
            .maybe_single()
            .await?)
    }

    async fn active_products(&self, provider_id: i64) -> CatalogResult<Vec<Product>> {
        Ok(self
            .db()
            .from("products")
            .select("id,name,description,price,currency,image_url")
            .eq("provider_id", provider_id)
            .eq("is_active", true)
            .order("created_at", false)
            .fetch()
            .await?)
    }
}

/// `ilike` without wildcards: user text must match literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::hosted::HostedConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo(server: &MockServer) -> HostedCatalogRepository {
        HostedCatalogRepository::new(HostedClient::new(
            HostedConfig {
                url: server.uri(),
                anon_key: "anon".to_string(),
                service_role_key: None,
            },
            reqwest::Client::new(),
        ))
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("Cluj"), "Cluj");
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
    }

    #[tokio::test]
    async fn test_active_provider_areas_reads_embedded_service() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/providers"))
            .and(query_param("select", "services(name),judet,oras"))
            .and(query_param("is_active", "eq.true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "services": { "name": "Electrician" }, "judet": "Cluj", "oras": "Dej" },
                { "services": null, "judet": "Alba", "oras": null }
            ])))
            .mount(&server)
            .await;

        let areas = LocationRepository::active_provider_areas(&repo(&server))
            .await
            .unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].service_name.as_deref(), Some("Electrician"));
        assert_eq!(areas[1].service_name, None);
        assert_eq!(areas[1].oras, None);
    }

    #[tokio::test]
    async fn test_area_scope_selects_column() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/v_active_subcategories_by_area"))
            .and(query_param("parent_id", "eq.9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "subcategory_id": 31,
                    "subcategory_name": "Prize",
                    "service_id": 2,
                    "parent_id": 9,
                    "judet": "Cluj",
                    "oras": "Dej",
                    "providers_count": 4
                }
            ])))
            .mount(&server)
            .await;

        let rows = TaxonomyRepository::area_subcategories(&repo(&server), AreaScope::Parent(9))
            .await
            .unwrap();
        assert_eq!(rows[0].subcategory_id, 31);
        assert_eq!(rows[0].providers_count, Some(4));
    }

    #[tokio::test]
    async fn test_location_cities_matches_county_literally() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/locations"))
            .and(query_param("judet", "ilike.cluj"))
            .and(query_param("order", "oras.asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "oras": "Cluj-Napoca", "judet": "Cluj" },
                { "oras": null, "judet": "Cluj" },
                { "oras": "Dej", "judet": "Cluj" }
            ])))
            .mount(&server)
            .await;

        let cities = LocationRepository::location_cities(&repo(&server), "cluj")
            .await
            .unwrap();
        assert_eq!(cities, vec!["Cluj-Napoca", "Dej"]);
    }

    #[tokio::test]
    async fn test_active_products_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param("provider_id", "eq.5"))
            .and(query_param("is_active", "eq.true"))
            .and(query_param("order", "created_at.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Revizie centrală", "price": 150.0, "currency": "RON" }
            ])))
            .mount(&server)
            .await;

        let products = ProviderRepository::active_products(&repo(&server), 5)
            .await
            .unwrap();
        assert_eq!(products[0].name, "Revizie centrală");
        assert_eq!(products[0].price, Some(150.0));
        assert_eq!(products[0].description, None);
    }
}
