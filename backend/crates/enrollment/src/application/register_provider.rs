//! Register Provider Use Case

use crate::domain::entities::{CreatedProvider, NewProvider};
use crate::domain::repository::ProviderRepository;
use crate::domain::value_objects::subcategory_ids;
use crate::error::{EnrollmentError, EnrollmentResult};
use kernel::text::{match_name, title_case};
use platform::hosted::UserStore;
use serde_json::Value;
use std::sync::Arc;

/// Input DTO for register provider
#[derive(Debug, Clone, Default)]
pub struct RegisterProviderInput {
    pub company_name: Option<String>,
    pub service_name: Option<String>,
    pub judet: Option<String>,
    pub oras: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub subcat: Value,
    pub subsub: Value,
    pub subsubs: Value,
    /// `Authorization: Bearer` token
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterProviderOutput {
    pub provider: CreatedProvider,
    /// Subcategory ids actually linked
    pub linked: Vec<i64>,
}

/// Register the signed-in user as a service provider
pub struct RegisterProviderUseCase<R>
where
    R: ProviderRepository + UserStore,
{
    repo: Arc<R>,
}

impl<R> RegisterProviderUseCase<R>
where
    R: ProviderRepository + UserStore,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        input: RegisterProviderInput,
    ) -> EnrollmentResult<RegisterProviderOutput> {
        let company_name = required(&input.company_name, "company_name")?;
        let service_name = required(&input.service_name, "service_name")?;
        let judet = required(&input.judet, "judet")?;
        let oras = required(&input.oras, "oras")?;

        let token = input
            .access_token
            .as_deref()
            .ok_or(EnrollmentError::AuthRequired)?;
        let user = self
            .repo
            .user_for_token(token)
            .await?
            .ok_or(EnrollmentError::InvalidToken)?;

        let services = self.repo.list_services().await?;
        let service_id = match_name(
            services.iter().map(|s| (s.id, s.name.as_str())),
            service_name,
        )
        .ok_or(EnrollmentError::UnknownService)?;

        let provider = NewProvider {
            user_id: user.id.clone(),
            company_name: company_name.to_string(),
            description: optional(&input.description),
            service_id,
            judet: title_case(judet),
            oras: title_case(oras),
            phone: optional(&input.phone),
            email: optional(&input.email),
            is_active: true,
        };
        let created = self.repo.insert_provider(&provider).await?;

        let wanted = subcategory_ids(&input.subcat, &input.subsub, &input.subsubs);
        let mut linked = Vec::new();
        if !wanted.is_empty() {
            let existing = self.repo.existing_subcategories(&wanted).await?;
            for id in wanted.into_iter().filter(|id| existing.contains(id)) {
                self.repo.link_subcategory(created.id, id).await?;
                linked.push(id);
            }
        }

        tracing::info!(
            provider_id = created.id,
            user_id = %user.id,
            service_id,
            subcategories = linked.len(),
            "Provider registered"
        );

        Ok(RegisterProviderOutput {
            provider: created,
            linked,
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> EnrollmentResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(EnrollmentError::MissingField(field))
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
