//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Instant;

use folio_core::ports::Repositories;
use folio_infra::database::{AdapterError, DatabaseAdapter, repositories};

use crate::config::Environment;
use crate::graphql::{Schema, create_schema};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The initialized database adapter; `main` closes it after the server stops.
    pub database: Arc<DatabaseAdapter>,
    pub repos: Repositories,
    pub schema: Arc<Schema>,
    pub environment: Environment,
    pub started_at: Instant,
}

impl AppState {
    /// Build the application state around an initialized adapter.
    pub fn new(database: Arc<DatabaseAdapter>, environment: Environment) -> Result<Self, AdapterError> {
        let repos = repositories(database.db()?);

        tracing::info!(
            backend = %database.backend(),
            dialect = %database.dialect(),
            "Application state initialized"
        );

        Ok(Self {
            database,
            repos,
            schema: Arc::new(create_schema()),
            environment,
            started_at: Instant::now(),
        })
    }
}

/// Fresh in-memory database with the schema applied.
#[cfg(test)]
pub(crate) async fn test_state() -> AppState {
    use folio_infra::database::{DatabaseConfig, create_adapter};
    use migration::{Migrator, MigratorTrait};

    let mut adapter = create_adapter(&DatabaseConfig::in_memory()).unwrap();
    adapter.initialize().await.unwrap();
    Migrator::up(adapter.db().unwrap(), None).await.unwrap();
    AppState::new(Arc::new(adapter), Environment::Test).unwrap()
}
