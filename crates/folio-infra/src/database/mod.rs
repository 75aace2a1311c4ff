//! Database access: backend adapters, schema, entities and repositories.

mod adapter;
mod cloud;
mod factory;
mod local;
mod repositories;
mod schema;
mod sea_base;
pub mod seed;

pub mod entity;

pub use adapter::{AdapterError, BackendType, DatabaseAdapter, Dialect};
pub use cloud::CloudAdapter;
pub use factory::{DatabaseConfig, create_adapter};
pub use local::{DEFAULT_LOCAL_PATH, LocalAdapter, MEMORY_PATH};
pub use repositories::{
    SeaCategoryRepository, SeaCommentRepository, SeaPostRepository, SeaUserRepository,
    repositories,
};
pub use schema::ContentSchema;
pub use sea_base::SeaBaseRepository;

#[cfg(test)]
mod tests;
