//! Security headers and CORS policy.

use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use actix_web::middleware::DefaultHeaders;

use crate::config::Environment;

/// Development allows inline scripts and CDN assets for the GraphiQL page.
const DEV_CSP: &str = "default-src 'self'; \
    script-src 'self' 'unsafe-inline' 'unsafe-eval' https:; \
    style-src 'self' 'unsafe-inline' https:; \
    img-src 'self' data: https:; \
    font-src 'self' data: https:; \
    connect-src 'self' https:; \
    object-src 'none'; \
    worker-src 'self' blob:; \
    frame-ancestors 'none'; \
    base-uri 'none'; \
    form-action 'self'";

const PROD_CSP: &str = "default-src 'self'; \
    script-src 'self'; \
    style-src 'self' 'unsafe-inline'; \
    img-src 'self' data: https:; \
    font-src 'self'; \
    connect-src 'self'; \
    object-src 'none'; \
    worker-src 'none'; \
    frame-ancestors 'none'; \
    base-uri 'none'; \
    form-action 'self'";

/// Frontend dev servers allowed to call the API.
const DEV_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:4173",
];

/// Response headers added to every response.
pub fn security_headers(environment: Environment) -> DefaultHeaders {
    let csp = if environment.is_development() { DEV_CSP } else { PROD_CSP };
    let headers = DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "DENY"))
        .add((header::X_XSS_PROTECTION, "1; mode=block"))
        .add((header::REFERRER_POLICY, "strict-origin-when-cross-origin"))
        .add((header::CONTENT_SECURITY_POLICY, csp));

    if environment.is_development() {
        headers
    } else {
        headers.add((
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=31536000; includeSubDomains",
        ))
    }
}

/// Cross-origin policy. Outside development no origin is allowed.
pub fn cors(environment: Environment) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .supports_credentials()
        .block_on_origin_mismatch(false)
        .max_age(3600);

    if environment.is_development() {
        for origin in DEV_ORIGINS {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}
