//! # Folio Shared
//!
//! Wire types shared between the server and its clients.
//! Nothing here touches the database; a frontend can depend on it directly.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorBody, Meta, Pagination};
