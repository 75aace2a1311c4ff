//! # Folio API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::process;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use folio_infra::database::{DatabaseAdapter, create_adapter};
use folio_infra::rate_limit::InMemoryRateLimiter;
use migration::{Migrator, MigratorTrait};

mod config;
mod graphql;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::error::expose_error_details;
use middleware::rate_limit::RateLimitMiddleware;
use middleware::security;
use observability::RequestIdMiddleware;
use state::AppState;

/// How often idle rate-limit keys are dropped.
const RATE_LIMIT_SWEEP: Duration = Duration::from_secs(60);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid environment configuration:");
            for issue in &err.issues {
                eprintln!("  - {issue}");
            }
            process::exit(1);
        }
    };

    telemetry::init_telemetry(&config.telemetry);
    expose_error_details(config.environment.is_development());

    tracing::info!(
        environment = %config.environment,
        "Starting Folio API Server on {}:{}",
        config.host,
        config.port
    );

    let database = match connect(&config).await {
        Ok(database) => database,
        Err(err) => {
            tracing::error!(error = %err, "Database startup failed");
            process::exit(1);
        }
    };

    let state = match AppState::new(Arc::new(database), config.environment) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "Failed to build application state");
            process::exit(1);
        }
    };

    let limiter = match InMemoryRateLimiter::new(config.rate_limit.clone()) {
        Ok(limiter) => Arc::new(limiter),
        Err(err) => {
            tracing::error!(error = %err, "Invalid rate limit configuration");
            process::exit(1);
        }
    };
    tracing::info!(
        max_requests = limiter.config().max_requests,
        window_secs = limiter.config().window.as_secs(),
        "Rate limiting enabled"
    );

    let sweeper = limiter.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_SWEEP);
        loop {
            interval.tick().await;
            sweeper.retain_recent();
        }
    });

    tracing::info!("REST API: http://{}:{}/api", config.host, config.port);
    tracing::info!("GraphQL: http://{}:{}/graphql", config.host, config.port);

    let environment = config.environment;
    let server_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(RateLimitMiddleware::new(limiter.clone()))
            .wrap(security::cors(environment))
            .wrap(security::security_headers(environment))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(server_state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped, closing database");
    shutdown(state).await;
    Ok(())
}

/// Create and initialize the configured adapter, then apply pending migrations.
async fn connect(config: &AppConfig) -> Result<DatabaseAdapter, Box<dyn std::error::Error>> {
    let mut database = create_adapter(&config.database)?;
    database.initialize().await?;

    if config.auto_migrate {
        Migrator::up(database.db()?, None).await?;
        tracing::info!("Migrations applied");
    }

    Ok(database)
}

async fn shutdown(state: AppState) {
    let AppState { database, .. } = state;
    match Arc::try_unwrap(database) {
        Ok(mut database) => {
            if let Err(err) = database.close().await {
                tracing::error!(error = %err, "Failed to close database");
            }
        }
        Err(_) => tracing::warn!("Database still in use at shutdown, leaving pool to drop"),
    }
}
