//! # Folio Core
//!
//! The domain layer of the Folio content backend.
//! This crate contains entities, payload validation and pagination rules with
//! zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod timestamp;
pub mod validation;

pub use error::{DomainError, RepoError};
pub use pagination::{PageInfo, PageRequest};
pub use validation::ValidationErrors;
