//! Resolver errors, surfaced to clients with an `extensions.code`.

use juniper::{FieldError, IntoFieldError, Object, ScalarValue, Value};
use thiserror::Error;

use folio_core::error::RepoError;
use folio_core::validation::ValidationErrors;

use crate::middleware::error::error_details_exposed;

#[derive(Debug, Error)]
pub enum GraphQLError {
    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(String),
}

pub type GraphQLResult<T> = Result<T, GraphQLError>;

impl GraphQLError {
    pub fn code(&self) -> &'static str {
        match self {
            GraphQLError::Validation(_) => "BAD_USER_INPUT",
            GraphQLError::NotFound(_) => "NOT_FOUND",
            GraphQLError::Conflict(_) => "CONFLICT",
            GraphQLError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl<S: ScalarValue> IntoFieldError<S> for GraphQLError {
    fn into_field_error(self) -> FieldError<S> {
        let mut extensions = Object::with_capacity(2);
        extensions.add_field("code", Value::scalar(self.code().to_string()));

        match &self {
            GraphQLError::Validation(errors) => {
                let mut fields = Object::with_capacity(errors.fields().count());
                for (field, messages) in errors.iter() {
                    let messages = messages
                        .iter()
                        .map(|message| Value::scalar(message.clone()))
                        .collect();
                    fields.add_field(field, Value::list(messages));
                }
                extensions.add_field("validation", Value::object(fields));
            }
            GraphQLError::Internal(detail) => {
                tracing::error!(error = %detail, "GraphQL resolver failed");
                if error_details_exposed() {
                    extensions.add_field("error", Value::scalar(detail.clone()));
                }
            }
            _ => {}
        }

        FieldError::new(self.to_string(), Value::object(extensions))
    }
}

impl From<ValidationErrors> for GraphQLError {
    fn from(errors: ValidationErrors) -> Self {
        GraphQLError::Validation(errors)
    }
}

impl From<RepoError> for GraphQLError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => GraphQLError::NotFound("Resource"),
            RepoError::Constraint(msg) => {
                tracing::debug!(error = %msg, "Unique constraint violated");
                GraphQLError::Conflict("A record with the same unique value already exists".to_string())
            }
            RepoError::ForeignKey(msg) => {
                tracing::debug!(error = %msg, "Foreign key violated");
                GraphQLError::Conflict("A referenced record does not exist".to_string())
            }
            RepoError::Connection(msg) | RepoError::Query(msg) => GraphQLError::Internal(msg),
        }
    }
}

/// Turn "no row" repository outcomes into a `NOT_FOUND` error for a named entity.
pub trait Required<T> {
    fn required(self, entity: &'static str) -> GraphQLResult<T>;
}

impl<T> Required<T> for Result<Option<T>, RepoError> {
    fn required(self, entity: &'static str) -> GraphQLResult<T> {
        self?.ok_or(GraphQLError::NotFound(entity))
    }
}

#[cfg(test)]
mod tests {
    use juniper::DefaultScalarValue;

    use super::*;

    #[test]
    fn test_validation_error_carries_fields() {
        let err = GraphQLError::Validation(ValidationErrors::single("slug", "Invalid slug format"));
        let field_error: FieldError<DefaultScalarValue> = err.into_field_error();

        assert_eq!(field_error.message(), "Validation failed");
        let extensions = field_error.extensions().as_object_value().unwrap();
        assert_eq!(
            extensions.get_field_value("code").and_then(|v| v.as_string_value()),
            Some("BAD_USER_INPUT")
        );
        assert!(extensions.get_field_value("validation").is_some());
    }

    #[test]
    fn test_missing_row_is_not_found() {
        let result: Result<Option<u8>, RepoError> = Ok(None);
        let err = result.required("User").unwrap_err();
        assert_eq!(err.to_string(), "User not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
