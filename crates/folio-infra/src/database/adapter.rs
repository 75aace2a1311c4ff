//! The database adapter: one closed set of backends behind a single lifecycle.

use std::fmt;
use std::str::FromStr;

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr};
use thiserror::Error;

use super::cloud::CloudAdapter;
use super::local::LocalAdapter;
use super::schema::ContentSchema;

/// Where the data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendType {
    /// Embedded SQLite file (or in-memory database).
    Local,
    /// Hosted PostgreSQL reached through a connection string.
    Cloud,
}

impl BackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Local => "local",
            BackendType::Cloud => "cloud",
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            BackendType::Local => Dialect::Sqlite,
            BackendType::Cloud => Dialect::Postgres,
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendType {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "sqlite" => Ok(BackendType::Local),
            "cloud" | "neon" | "postgres" | "postgresql" => Ok(BackendType::Cloud),
            other => Err(AdapterError::UnknownBackend(other.to_string())),
        }
    }
}

/// SQL dialect spoken by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgresql",
        }
    }

    pub fn db_backend(&self) -> DbBackend {
        match self {
            Dialect::Sqlite => DbBackend::Sqlite,
            Dialect::Postgres => DbBackend::Postgres,
        }
    }

    /// The dialect of a live connection. `None` for engines Folio does not target.
    pub fn from_db_backend(backend: DbBackend) -> Option<Self> {
        match backend {
            DbBackend::Sqlite => Some(Dialect::Sqlite),
            DbBackend::Postgres => Some(Dialect::Postgres),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adapter construction and lifecycle failures.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Unknown database type: {0}")]
    UnknownBackend(String),

    #[error("Connection string is required for cloud database")]
    MissingConnectionString,

    #[error("Failed to initialize {backend} database: {source}")]
    Initialize {
        backend: BackendType,
        #[source]
        source: DbErr,
    },

    #[error("Database not initialized. Call initialize() first.")]
    NotInitialized,

    #[error("Failed to close {backend} database: {source}")]
    Close {
        backend: BackendType,
        #[source]
        source: DbErr,
    },
}

/// A configured database backend.
///
/// Created by [`create_adapter`](super::create_adapter), then [`initialize`](Self::initialize)d
/// once before any repository use. Every query goes through [`db`](Self::db).
#[derive(Debug)]
pub enum DatabaseAdapter {
    Local(LocalAdapter),
    Cloud(CloudAdapter),
}

impl DatabaseAdapter {
    pub fn backend(&self) -> BackendType {
        match self {
            DatabaseAdapter::Local(_) => BackendType::Local,
            DatabaseAdapter::Cloud(_) => BackendType::Cloud,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.backend().dialect()
    }

    /// Table definitions for this backend's dialect.
    pub fn schema(&self) -> ContentSchema {
        ContentSchema::new(self.dialect())
    }

    /// Open the connection pool and verify it answers a trivial query.
    ///
    /// Calling it on an initialized adapter is a no-op.
    pub async fn initialize(&mut self) -> Result<(), AdapterError> {
        if self.is_initialized() {
            return Ok(());
        }
        match self {
            DatabaseAdapter::Local(local) => local.connect().await,
            DatabaseAdapter::Cloud(cloud) => cloud.connect().await,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.connection().is_some()
    }

    /// The live connection.
    pub fn db(&self) -> Result<&DatabaseConnection, AdapterError> {
        self.connection().ok_or(AdapterError::NotInitialized)
    }

    /// Whether the backend currently answers `SELECT 1`. Never fails.
    pub async fn health(&self) -> bool {
        let Some(conn) = self.connection() else {
            tracing::warn!(backend = %self.backend(), "Health check on uninitialized database");
            return false;
        };
        match ping(conn).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(backend = %self.backend(), error = %e, "Database health check failed");
                false
            }
        }
    }

    /// Release the connection pool. A closed adapter is no longer initialized.
    pub async fn close(&mut self) -> Result<(), AdapterError> {
        let backend = self.backend();
        let conn = match self {
            DatabaseAdapter::Local(local) => local.conn.take(),
            DatabaseAdapter::Cloud(cloud) => cloud.conn.take(),
        };
        if let Some(conn) = conn {
            conn.close()
                .await
                .map_err(|source| AdapterError::Close { backend, source })?;
            tracing::info!(%backend, "Database connection closed");
        }
        Ok(())
    }

    fn connection(&self) -> Option<&DatabaseConnection> {
        match self {
            DatabaseAdapter::Local(local) => local.conn.as_ref(),
            DatabaseAdapter::Cloud(cloud) => cloud.conn.as_ref(),
        }
    }
}

pub(crate) async fn ping(conn: &DatabaseConnection) -> Result<(), DbErr> {
    conn.execute_unprepared("SELECT 1").await.map(|_| ())
}
