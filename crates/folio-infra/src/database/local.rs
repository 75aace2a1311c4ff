//! Embedded SQLite backend.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use super::adapter::{AdapterError, BackendType, ping};

/// Path that selects a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Default database file for development.
pub const DEFAULT_LOCAL_PATH: &str = "./dev.db";

#[derive(Debug)]
pub struct LocalAdapter {
    path: String,
    pub(super) conn: Option<DatabaseConnection>,
}

impl LocalAdapter {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }

    fn url(&self) -> String {
        if self.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}?mode=rwc", self.path)
        }
    }

    pub(super) async fn connect(&mut self) -> Result<(), AdapterError> {
        let fail = |source| AdapterError::Initialize {
            backend: BackendType::Local,
            source,
        };

        // Each in-memory connection is its own database, so the pool holds exactly one.
        let max_connections = if self.is_in_memory() { 1 } else { 5 };
        let opts = ConnectOptions::new(self.url())
            .max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false)
            .to_owned();

        let conn = Database::connect(opts).await.map_err(fail)?;
        conn.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .map_err(fail)?;
        ping(&conn).await.map_err(fail)?;

        tracing::info!(path = %self.path, "Local SQLite database connected");
        self.conn = Some(conn);
        Ok(())
    }
}
