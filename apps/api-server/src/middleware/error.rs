//! Error handling - every failure leaves the server as an envelope.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde_json::json;

use folio_core::error::{DomainError, RepoError};
use folio_core::validation::ValidationErrors;
use folio_infra::database::AdapterError;
use folio_shared::ApiResponse;

static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(false);

/// Attach internal error detail to 500 responses (development only).
pub fn expose_error_details(enabled: bool) {
    EXPOSE_DETAILS.store(enabled, Ordering::Relaxed);
}

pub fn error_details_exposed() -> bool {
    EXPOSE_DETAILS.load(Ordering::Relaxed)
}

/// Application-level error type that converts to envelope responses.
#[derive(Debug)]
pub enum AppError {
    /// Field-level problems with the request.
    Validation(ValidationErrors),
    /// The named entity does not exist.
    NotFound(&'static str),
    /// No route matched.
    RouteNotFound { method: String, path: String },
    Conflict(String),
    TooManyRequests { retry_after_secs: u64 },
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => write!(f, "Validation failed: {}", errors),
            AppError::NotFound(entity) => write!(f, "{} not found", entity),
            AppError::RouteNotFound { method, path } => {
                write!(f, "Endpoint not found: {} {}", method, path)
            }
            AppError::Conflict(msg) => write!(f, "{}", msg),
            AppError::TooManyRequests { .. } => {
                write!(f, "Too many requests, please try again later")
            }
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => {
                ApiResponse::error_with_details("Validation failed", json!({ "validation": errors }))
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                if error_details_exposed() {
                    ApiResponse::error_with_details("Internal server error", json!({ "error": detail }))
                } else {
                    ApiResponse::error("Internal server error")
                }
            }
            other => ApiResponse::error(other.to_string()),
        };

        let mut response = HttpResponse::build(self.status_code());
        if let AppError::TooManyRequests { retry_after_secs } = self {
            response.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
        }
        response.json(body)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => AppError::NotFound(entity_type),
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource"),
            RepoError::Constraint(msg) => {
                tracing::debug!(error = %msg, "Unique constraint violated");
                AppError::Conflict("A record with the same unique value already exists".to_string())
            }
            RepoError::ForeignKey(msg) => {
                tracing::debug!(error = %msg, "Foreign key violated");
                AppError::Conflict("A referenced record does not exist".to_string())
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal(msg)
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal(msg)
            }
        }
    }
}

impl From<AdapterError> for AppError {
    fn from(err: AdapterError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Turn "no row" repository outcomes into a 404 for a named entity.
pub trait OrNotFound<T> {
    fn or_not_found(self, entity: &'static str) -> AppResult<T>;
}

impl<T> OrNotFound<T> for Result<Option<T>, RepoError> {
    fn or_not_found(self, entity: &'static str) -> AppResult<T> {
        self?.ok_or(AppError::NotFound(entity))
    }
}

impl OrNotFound<()> for Result<(), RepoError> {
    fn or_not_found(self, entity: &'static str) -> AppResult<()> {
        match self {
            Err(RepoError::NotFound) => Err(AppError::NotFound(entity)),
            other => other.map_err(Into::into),
        }
    }
}

/// Malformed or mistyped JSON bodies.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid JSON body: {}", e),
        other => other.to_string(),
    };
    AppError::Validation(ValidationErrors::single("body", message)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(ValidationErrors::single("query", err.to_string())).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(ValidationErrors::single("path", err.to_string())).into()
}
