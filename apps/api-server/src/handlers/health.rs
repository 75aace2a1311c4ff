//! Health check endpoints.

use std::time::Instant;

use actix_web::{HttpResponse, http::StatusCode, web};
use serde::Serialize;
use serde_json::json;

use folio_shared::ApiResponse;
use folio_shared::dto::{DatabaseInfo, HealthReport, ServiceStatus};

use crate::state::AppState;

#[derive(Serialize)]
pub struct ApiHealth {
    pub status: &'static str,
    pub api: &'static str,
    pub version: &'static str,
}

/// Service health including database connectivity.
///
/// GET /health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let started = Instant::now();
    let healthy = state.database.health().await;
    let uptime = state.started_at.elapsed().as_secs_f64();
    let response_time = format!("{}ms", started.elapsed().as_millis());

    if !healthy {
        let error = if state.environment.is_development() {
            "Database health check failed"
        } else {
            "Database connection failed"
        };
        let details = json!({
            "services": ServiceStatus {
                database: "disconnected".to_string(),
                api: "operational".to_string(),
            },
            "uptime": uptime,
            "responseTime": response_time,
            "error": error,
        });
        return HttpResponse::build(StatusCode::SERVICE_UNAVAILABLE)
            .json(ApiResponse::error_with_details("Service unhealthy", details));
    }

    HttpResponse::Ok().json(ApiResponse::ok(HealthReport {
        status: "healthy".to_string(),
        services: ServiceStatus {
            database: "connected".to_string(),
            api: "operational".to_string(),
        },
        database: Some(DatabaseInfo {
            backend: state.database.backend().to_string(),
            dialect: state.database.dialect().to_string(),
            healthy,
        }),
        uptime,
        response_time,
        environment: state.environment.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET /api/health
pub async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(ApiHealth {
        status: "ok",
        api: "REST API operational",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
