//! Hosted Database Repository Implementations
//!
//! Writes use the service-role key: offers come from anonymous visitors and
//! provider rows are created on behalf of the caller.

use crate::domain::entities::{CreatedOffer, CreatedProvider, NewOffer, NewProvider, ServiceRef};
use crate::domain::repository::{OfferRepository, ProviderRepository};
use crate::error::{EnrollmentError, EnrollmentResult};
use platform::hosted::{AuthUser, HostedClient, HostedError, UserStore};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct IdRow {
    id: i64,
}

#[derive(Serialize)]
struct SubcategoryLink {
    provider_id: i64,
    subcategory_id: i64,
}

/// Hosted-database-backed enrollment repository
#[derive(Clone)]
pub struct HostedEnrollmentRepository {
    client: HostedClient,
}

impl HostedEnrollmentRepository {
    pub fn new(client: HostedClient) -> Self {
        Self { client }
    }
}

impl OfferRepository for HostedEnrollmentRepository {
    fn can_write_offers(&self) -> bool {
        self.client.has_admin()
    }

    async fn insert_offer(&self, offer: &NewOffer) -> EnrollmentResult<CreatedOffer> {
        Ok(self
            .client
            .admin()?
            .from("offers")
            .select("id,created_at")
            .insert(offer)
            .await?)
    }
}

impl ProviderRepository for HostedEnrollmentRepository {
    async fn list_services(&self) -> EnrollmentResult<Vec<ServiceRef>> {
        Ok(self
            .client
            .anon()
            .from("services")
            .select("id,name")
            .order("name", true)
            .fetch()
            .await?)
    }

    async fn insert_provider(&self, provider: &NewProvider) -> EnrollmentResult<CreatedProvider> {
        self.client
            .admin()?
            .from("providers")
            .select("id,company_name")
            .insert(provider)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    EnrollmentError::CompanyExists
                } else {
                    EnrollmentError::Hosted(e)
                }
            })
    }

    async fn existing_subcategories(&self, ids: &[i64]) -> EnrollmentResult<Vec<i64>> {
        let rows: Vec<IdRow> = self
            .client
            .admin()?
            .from("subcategories")
            .select("id")
            .in_list("id", ids)
            .fetch()
            .await?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    async fn link_subcategory(&self, provider_id: i64, subcategory_id: i64) -> EnrollmentResult<()> {
        let link = SubcategoryLink {
            provider_id,
            subcategory_id,
        };
        let result: Result<IgnoredAny, HostedError> = self
            .client
            .admin()?
            .from("provider_subcategories")
            .select("provider_id")
            .insert(&link)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.is_unique_violation() => {
                tracing::debug!(provider_id, subcategory_id, "Subcategory already linked");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl UserStore for HostedEnrollmentRepository {
    async fn user_for_token(&self, access_token: &str) -> Result<Option<AuthUser>, HostedError> {
        UserStore::user_for_token(&self.client, access_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::hosted::HostedConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo(server: &MockServer, service_role_key: Option<&str>) -> HostedEnrollmentRepository {
        HostedEnrollmentRepository::new(HostedClient::new(
            HostedConfig {
                url: server.uri(),
                anon_key: "anon".to_string(),
                service_role_key: service_role_key.map(str::to_string),
            },
            reqwest::Client::new(),
        ))
    }

    fn provider() -> NewProvider {
        NewProvider {
            user_id: "user-1".to_string(),
            company_name: "Instal Pro".to_string(),
            description: None,
            service_id: 2,
            judet: "Cluj".to_string(),
            oras: "Dej".to_string(),
            phone: None,
            email: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_insert_offer_uses_service_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/offers"))
            .and(query_param("select", "id,created_at"))
            .and(header("apikey", "service"))
            .and(header("authorization", "Bearer service"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                { "id": 42, "created_at": "2025-05-01T10:00:00Z" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let offer = NewOffer {
            email: "ana@example.com".to_string(),
            phone: "+40722123456".to_string(),
            service_id: 3,
            description: "Reparatie".to_string(),
            source_ip: Some("203.0.113.9".to_string()),
            user_agent: None,
            created_by: None,
            meta: json!({ "judet": "Cluj" }),
        };
        let created = repo(&server, Some("service")).insert_offer(&offer).await.unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(created.created_at, "2025-05-01T10:00:00Z");
    }

    #[tokio::test]
    async fn test_writes_need_service_role() {
        let server = MockServer::start().await;
        let repo = repo(&server, None);
        assert!(!repo.can_write_offers());

        let err = repo.insert_provider(&provider()).await.unwrap_err();
        assert!(matches!(err, EnrollmentError::Hosted(HostedError::NotConfigured)));
        assert_eq!(err.to_app_error().status_code(), 500);
    }

    #[tokio::test]
    async fn test_duplicate_company_is_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/providers"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint \"providers_company_name_key\""
            })))
            .mount(&server)
            .await;

        let err = repo(&server, Some("service"))
            .insert_provider(&provider())
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::CompanyExists));
    }

    #[tokio::test]
    async fn test_existing_subcategories_filters_by_id_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/subcategories"))
            .and(query_param("id", "in.(4,17,99)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 4 }, { "id": 17 }
            ])))
            .mount(&server)
            .await;

        let ids = repo(&server, Some("service"))
            .existing_subcategories(&[4, 17, 99])
            .await
            .unwrap();
        assert_eq!(ids, vec![4, 17]);
    }

    #[tokio::test]
    async fn test_existing_link_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/provider_subcategories"))
            .and(body_json(json!({ "provider_id": 7, "subcategory_id": 4 })))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "message": "duplicate key"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/provider_subcategories"))
            .and(body_json(json!({ "provider_id": 7, "subcategory_id": 5 })))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "23503",
                "message": "violates foreign key constraint"
            })))
            .mount(&server)
            .await;

        let repo = repo(&server, Some("service"));
        assert!(repo.link_subcategory(7, 4).await.is_ok());
        let err = repo.link_subcategory(7, 5).await.unwrap_err();
        assert_eq!(err.to_app_error().status_code(), 502);
    }

    #[tokio::test]
    async fn test_user_lookup_delegates_to_auth_service() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-1", "email": "ana@example.com"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer bad"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let repo = repo(&server, None);
        let user = UserStore::user_for_token(&repo, "good").await.unwrap().unwrap();
        assert_eq!(user.id, "user-1");
        assert!(UserStore::user_for_token(&repo, "bad").await.unwrap().is_none());
    }
}
