//! Hosted PostgreSQL backend.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use super::adapter::{AdapterError, BackendType, ping};

pub struct CloudAdapter {
    connection_string: String,
    max_connections: u32,
    min_connections: u32,
    pub(super) conn: Option<DatabaseConnection>,
}

impl CloudAdapter {
    pub fn new(connection_string: impl Into<String>, max_connections: u32, min_connections: u32) -> Self {
        Self {
            connection_string: connection_string.into(),
            max_connections,
            min_connections,
            conn: None,
        }
    }

    pub(super) async fn connect(&mut self) -> Result<(), AdapterError> {
        let fail = |source| AdapterError::Initialize {
            backend: BackendType::Cloud,
            source,
        };

        let opts = ConnectOptions::new(&self.connection_string)
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let conn = Database::connect(opts).await.map_err(fail)?;
        ping(&conn).await.map_err(fail)?;

        tracing::info!(pool = self.max_connections, "Cloud PostgreSQL database connected");
        self.conn = Some(conn);
        Ok(())
    }
}

// The connection string carries credentials.
impl std::fmt::Debug for CloudAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudAdapter")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("initialized", &self.conn.is_some())
            .finish()
    }
}
