//! Adapter selection from configuration.

use super::adapter::{AdapterError, BackendType, DatabaseAdapter};
use super::cloud::CloudAdapter;
use super::local::{DEFAULT_LOCAL_PATH, LocalAdapter};

/// Database settings as read from the environment.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Backend name: `local`/`sqlite` or `cloud`/`neon`/`postgres`/`postgresql`.
    pub backend_type: String,
    /// Required for the cloud backend.
    pub connection_string: Option<String>,
    /// SQLite file path, or `:memory:`.
    pub local_path: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend_type: BackendType::Local.as_str().to_string(),
            connection_string: None,
            local_path: DEFAULT_LOCAL_PATH.to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl DatabaseConfig {
    /// A private in-memory SQLite database.
    pub fn in_memory() -> Self {
        Self {
            local_path: super::local::MEMORY_PATH.to_string(),
            ..Self::default()
        }
    }

    /// Work out the backend from whatever the environment provides.
    ///
    /// An explicit `backend_type` wins. Otherwise a `postgres://` or `postgresql://`
    /// URL selects the cloud backend, a `file:`/`sqlite:` URL selects the local one
    /// with the path taken from the URL, and no URL at all means a local database
    /// at `local_path` (or `./dev.db`).
    pub fn infer(
        backend_type: Option<&str>,
        database_url: Option<&str>,
        local_path: Option<&str>,
    ) -> Self {
        let database_url = database_url.map(str::trim).filter(|url| !url.is_empty());
        let mut config = Self {
            local_path: local_path.unwrap_or(DEFAULT_LOCAL_PATH).to_string(),
            ..Self::default()
        };

        let url_is_postgres = database_url
            .is_some_and(|url| url.starts_with("postgres://") || url.starts_with("postgresql://"));
        let url_local_path = database_url.and_then(sqlite_path);

        config.backend_type = match backend_type.map(str::trim).filter(|t| !t.is_empty()) {
            Some(explicit) => explicit.to_string(),
            None if url_is_postgres => BackendType::Cloud.as_str().to_string(),
            None => BackendType::Local.as_str().to_string(),
        };

        if url_is_postgres {
            config.connection_string = database_url.map(str::to_string);
        } else if let Some(path) = url_local_path {
            if local_path.is_none() {
                config.local_path = path;
            }
        } else {
            config.connection_string = database_url.map(str::to_string);
        }
        config
    }
}

/// Strip the scheme off a `file:` or `sqlite:` URL.
fn sqlite_path(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("sqlite:")
        .or_else(|| url.strip_prefix("file:"))?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or(rest);
    (!path.is_empty()).then(|| path.to_string())
}

/// Build (but do not initialize) the adapter named by `config`.
pub fn create_adapter(config: &DatabaseConfig) -> Result<DatabaseAdapter, AdapterError> {
    let backend: BackendType = config.backend_type.parse()?;
    tracing::debug!(%backend, "Creating database adapter");
    match backend {
        BackendType::Local => Ok(DatabaseAdapter::Local(LocalAdapter::new(&config.local_path))),
        BackendType::Cloud => {
            let url = config
                .connection_string
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .ok_or(AdapterError::MissingConnectionString)?;
            Ok(DatabaseAdapter::Cloud(CloudAdapter::new(
                url,
                config.max_connections,
                config.min_connections,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_aliases() {
        for name in ["cloud", "neon", "postgres", "postgresql", "POSTGRES"] {
            assert_eq!(name.parse::<BackendType>().unwrap(), BackendType::Cloud);
        }
        for name in ["local", "sqlite"] {
            assert_eq!(name.parse::<BackendType>().unwrap(), BackendType::Local);
        }
        assert!(matches!(
            "mysql".parse::<BackendType>(),
            Err(AdapterError::UnknownBackend(name)) if name == "mysql"
        ));
    }

    #[test]
    fn test_cloud_requires_connection_string() {
        let config = DatabaseConfig {
            backend_type: "cloud".into(),
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            create_adapter(&config),
            Err(AdapterError::MissingConnectionString)
        ));
    }

    #[test]
    fn test_created_adapter_is_not_initialized() {
        let adapter = create_adapter(&DatabaseConfig::in_memory()).unwrap();
        assert_eq!(adapter.backend(), BackendType::Local);
        assert_eq!(adapter.dialect().as_str(), "sqlite");
        assert!(!adapter.is_initialized());
        assert!(matches!(adapter.db(), Err(AdapterError::NotInitialized)));

        let cloud = create_adapter(&DatabaseConfig {
            backend_type: "neon".into(),
            connection_string: Some("postgres://u:p@localhost/db".into()),
            ..DatabaseConfig::default()
        })
        .unwrap();
        assert_eq!(cloud.dialect().as_str(), "postgresql");
    }

    #[test]
    fn test_infer_from_url() {
        let config = DatabaseConfig::infer(None, Some("postgresql://u:p@host/db"), None);
        assert_eq!(config.backend_type, "cloud");
        assert_eq!(config.connection_string.as_deref(), Some("postgresql://u:p@host/db"));

        let config = DatabaseConfig::infer(None, Some("file:./data/app.db"), None);
        assert_eq!(config.backend_type, "local");
        assert_eq!(config.local_path, "./data/app.db");

        let config = DatabaseConfig::infer(None, None, None);
        assert_eq!(config.backend_type, "local");
        assert_eq!(config.local_path, "./dev.db");

        let config = DatabaseConfig::infer(Some("sqlite"), None, Some(":memory:"));
        assert_eq!(config.local_path, ":memory:");
    }
}
