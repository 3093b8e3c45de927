//! Domain Entities

use serde::{Deserialize, Serialize};

/// Offer request as stored in `offers`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOffer {
    pub email: String,
    pub phone: String,
    pub service_id: i64,
    pub description: String,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    /// Signed-in user who sent the offer, if any
    pub created_by: Option<String>,
    /// Free-form extra fields such as county or city
    pub meta: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedOffer {
    pub id: i64,
    pub created_at: String,
}

/// Provider row inserted on registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProvider {
    pub user_id: String,
    pub company_name: String,
    pub description: Option<String>,
    pub service_id: i64,
    pub judet: String,
    pub oras: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedProvider {
    pub id: i64,
    pub company_name: String,
}

/// `services` row used to resolve a typed service name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceRef {
    pub id: i64,
    pub name: String,
}
