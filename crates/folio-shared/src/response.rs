//! The uniform REST envelope: `{success, data | error, meta?, timestamp}`.

use serde::{Deserialize, Serialize};

/// Standard API response wrapper used by every REST endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub timestamp: String,
}

/// Error payload of a failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub has_more: bool,
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
            timestamp: now(),
        }
    }

    /// Success response for list endpoints.
    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            meta: Some(Meta {
                pagination: Some(pagination),
            }),
            ..Self::ok(data)
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                message: message.into(),
                details: None,
            }),
            meta: None,
            timestamp: now(),
        }
    }

    pub fn error_with_details(message: impl Into<String>, details: serde_json::Value) -> Self {
        let mut response = Self::error(message);
        if let Some(error) = response.error.as_mut() {
            error.details = Some(details);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_shape() {
        let response = ApiResponse::paginated(
            vec![1, 2],
            Pagination {
                page: 1,
                limit: 2,
                has_more: true,
            },
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["meta"]["pagination"]["hasMore"], true);
        assert!(json.get("error").is_none());
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_error_shape() {
        let json = serde_json::to_value(ApiResponse::error("User not found")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["message"], "User not found");
        assert!(json.get("data").is_none());
        assert!(json["error"].get("details").is_none());
    }
}
