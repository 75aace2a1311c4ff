//! Data Transfer Objects - query parameters and small response bodies of the API.

use serde::{Deserialize, Serialize};

/// `?page=&limit=` on list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters of `GET /api/posts`.
///
/// Listed field by field rather than flattening [`PaginationQuery`]: flattened
/// structs lose the string-to-number coercion of urlencoded query strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub published: Option<bool>,
    pub author_id: Option<String>,
    pub category_id: Option<String>,
    pub category_slug: Option<String>,
}

/// Confirmation body for deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub services: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseInfo>,
    pub uptime: f64,
    pub response_time: String,
    pub environment: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub database: String,
    pub api: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseInfo {
    #[serde(rename = "type")]
    pub backend: String,
    pub dialect: String,
    pub healthy: bool,
}

/// `GET /` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub environment: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub rest: String,
    pub graphql: String,
    pub health: String,
}
