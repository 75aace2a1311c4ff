//! Rate limiting middleware.

use std::future::{Ready, ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use futures::future::LocalBoxFuture;

use folio_core::ports::RateLimiter;

use super::error::AppError;

/// Paths that are never limited, so probes keep working under load.
const EXEMPT_PATHS: [&str; 2] = ["/health", "/api/health"];

/// Rate limiting middleware factory.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();

        Box::pin(async move {
            if EXEMPT_PATHS.contains(&req.path()) {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            let key = client_key(&req);
            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    tracing::warn!(client = %key, path = %req.path(), "Rate limit exceeded");

                    let mut response = AppError::TooManyRequests {
                        retry_after_secs: result.reset_after.as_secs().max(1),
                    }
                    .error_response();
                    response.headers_mut().insert(
                        HeaderName::from_static("x-ratelimit-limit"),
                        HeaderValue::from(result.limit),
                    );
                    response.headers_mut().insert(
                        HeaderName::from_static("x-ratelimit-remaining"),
                        HeaderValue::from_static("0"),
                    );

                    let (http_req, _payload) = req.into_parts();
                    return Ok(ServiceResponse::new(http_req, response).map_into_right_body());
                }
                Ok(_) => {}
                // Fail open
                Err(e) => tracing::error!(error = %e, "Rate limiter error"),
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Identify the client: first proxy hop, then the real-ip header, then the socket peer.
fn client_key(req: &ServiceRequest) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "anonymous".to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::{App, HttpResponse, http::StatusCode, test, web};
    use folio_infra::rate_limit::{InMemoryRateLimiter, RateLimitConfig};

    use super::*;

    #[actix_web::test]
    async fn test_blocks_after_quota_and_skips_health() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        })
        .unwrap();
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(Arc::new(limiter)))
                .route("/api/users", web::get().to(HttpResponse::Ok))
                .route("/health", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let request = || {
            test::TestRequest::get()
                .uri("/api/users")
                .insert_header(("x-forwarded-for", "203.0.113.9"))
                .to_request()
        };
        assert_eq!(test::call_service(&app, request()).await.status(), StatusCode::OK);

        let blocked = test::call_service(&app, request()).await;
        assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(blocked.headers().contains_key("retry-after"));
        let body: serde_json::Value = test::read_body_json(blocked).await;
        assert_eq!(body["error"]["message"], "Too many requests, please try again later");

        for _ in 0..3 {
            let health = test::TestRequest::get()
                .uri("/health")
                .insert_header(("x-forwarded-for", "203.0.113.9"))
                .to_request();
            assert_eq!(test::call_service(&app, health).await.status(), StatusCode::OK);
        }
    }
}
