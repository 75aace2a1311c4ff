//! Application configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use folio_infra::database::{BackendType, DatabaseConfig};
use folio_infra::rate_limit::RateLimitConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::telemetry::TelemetryConfig;

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!(
                "APP_ENV must be one of development, production, test (got '{other}')"
            )),
        }
    }
}

/// Every problem found while reading the environment.
#[derive(Debug, Error)]
#[error("invalid configuration: {}", .issues.join("; "))]
pub struct ConfigError {
    pub issues: Vec<String>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    /// Apply pending migrations before serving.
    pub auto_migrate: bool,
    pub rate_limit: RateLimitConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, collecting every invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut issues = Vec::new();

        let environment = match get("APP_ENV") {
            Some(value) => value.parse().unwrap_or_else(|issue| {
                issues.push(issue);
                Environment::Development
            }),
            None => Environment::Development,
        };

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_var(get("PORT"), "PORT", 3001u16, &mut issues);

        let database = {
            let mut database = DatabaseConfig::infer(
                get("DATABASE_TYPE").as_deref(),
                get("DATABASE_URL").as_deref(),
                get("SQLITE_PATH").as_deref(),
            );
            database.max_connections =
                parse_var(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10u32, &mut issues);
            database.min_connections =
                parse_var(get("DB_MIN_CONNECTIONS"), "DB_MIN_CONNECTIONS", 1u32, &mut issues);

            match database.backend_type.parse::<BackendType>() {
                Ok(BackendType::Cloud) if database.connection_string.is_none() => {
                    issues.push("DATABASE_URL is required for the cloud database".to_string());
                }
                Ok(_) => {}
                Err(e) => issues.push(format!("DATABASE_TYPE: {e}")),
            }
            if database.max_connections == 0 {
                issues.push("DB_MAX_CONNECTIONS must be at least 1".to_string());
            }
            if database.min_connections > database.max_connections {
                issues.push("DB_MIN_CONNECTIONS must not exceed DB_MAX_CONNECTIONS".to_string());
            }
            database
        };

        let auto_migrate = match get("AUTO_MIGRATE") {
            None => true,
            Some(value) => parse_flag(&value).unwrap_or_else(|| {
                issues.push(format!("AUTO_MIGRATE must be true or false (got '{value}')"));
                true
            }),
        };

        let default_max_requests = if environment.is_production() { 100 } else { 1000 };
        let rate_limit = RateLimitConfig {
            max_requests: parse_var(
                get("RATE_LIMIT_MAX_REQUESTS"),
                "RATE_LIMIT_MAX_REQUESTS",
                default_max_requests,
                &mut issues,
            ),
            window: Duration::from_secs(parse_var(
                get("RATE_LIMIT_WINDOW_SECS"),
                "RATE_LIMIT_WINDOW_SECS",
                15 * 60,
                &mut issues,
            )),
        };
        if rate_limit.max_requests == 0 {
            issues.push("RATE_LIMIT_MAX_REQUESTS must be at least 1".to_string());
        }
        if rate_limit.window.is_zero() {
            issues.push("RATE_LIMIT_WINDOW_SECS must be at least 1".to_string());
        }

        let default_level = if environment.is_development() { "debug" } else { "info" };
        let log_level = get("LOG_LEVEL").unwrap_or_else(|| default_level.to_string());
        if EnvFilter::try_new(&log_level).is_err() {
            issues.push(format!("LOG_LEVEL is not a valid filter (got '{log_level}')"));
        }
        let json_logs = match get("LOG_FORMAT").map(|v| v.to_ascii_lowercase()) {
            None => environment.is_production(),
            Some(format) if format == "json" => true,
            Some(format) if format == "pretty" => false,
            Some(format) => {
                issues.push(format!("LOG_FORMAT must be pretty or json (got '{format}')"));
                false
            }
        };

        if !issues.is_empty() {
            return Err(ConfigError { issues });
        }

        Ok(Self {
            environment,
            host,
            port,
            database,
            auto_migrate,
            rate_limit,
            telemetry: TelemetryConfig {
                json_logs,
                log_level,
                service_name: "folio-api".to_string(),
            },
        })
    }
}

fn parse_var<T: FromStr>(value: Option<String>, key: &str, default: T, issues: &mut Vec<String>) -> T {
    match value {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            issues.push(format!("{key} must be a non-negative integer (got '{raw}')"));
            default
        }),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.port, 3001);
        assert_eq!(config.database.backend_type, "local");
        assert_eq!(config.database.local_path, "./dev.db");
        assert!(config.auto_migrate);
        assert_eq!(config.rate_limit.max_requests, 1000);
        assert_eq!(config.rate_limit.window, Duration::from_secs(900));
        assert!(!config.telemetry.json_logs);
    }

    #[test]
    fn test_production_defaults() {
        let config = load(&[
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://u:p@db/folio"),
        ])
        .unwrap();
        assert_eq!(config.database.backend_type, "cloud");
        assert_eq!(config.rate_limit.max_requests, 100);
        assert!(config.telemetry.json_logs);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_collects_every_issue() {
        let err = load(&[
            ("APP_ENV", "staging"),
            ("PORT", "eighty"),
            ("DATABASE_TYPE", "mysql"),
            ("AUTO_MIGRATE", "maybe"),
        ])
        .unwrap_err();
        assert_eq!(err.issues.len(), 4, "{:?}", err.issues);
        assert!(err.issues.iter().any(|i| i.contains("PORT")));
        assert!(err.issues.iter().any(|i| i.contains("Unknown database type")));
    }

    #[test]
    fn test_cloud_without_url_is_rejected() {
        let err = load(&[("DATABASE_TYPE", "neon")]).unwrap_err();
        assert!(err.issues[0].contains("DATABASE_URL"));
    }
}
