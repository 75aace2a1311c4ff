//! HTTP handlers and route configuration.

mod categories;
mod comments;
mod health;
mod posts;
mod users;


use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use folio_core::pagination::PageInfo;
use folio_core::validation::{self, ValidationErrors};
use folio_shared::{ApiResponse, Pagination};
use folio_shared::dto::{Endpoints, ServiceInfo};

use crate::graphql;
use crate::middleware::error::{
    AppError, AppResult, json_error_handler, path_error_handler, query_error_handler,
};
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .route("/", web::get().to(service_info))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::resource("/graphql")
                .route(web::post().to(graphql::graphql_handler))
                .route(web::get().to(graphql::graphiql)),
        )
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::api_health))
                .service(
                    web::scope("/users")
                        .route("", web::get().to(users::list_users))
                        .route("", web::post().to(users::create_user))
                        .route("/{id}", web::get().to(users::get_user))
                        .route("/{id}", web::put().to(users::update_user))
                        .route("/{id}", web::delete().to(users::delete_user)),
                )
                .service(
                    web::scope("/categories")
                        .route("", web::get().to(categories::list_categories))
                        .route("", web::post().to(categories::create_category))
                        .route("/slug/{slug}", web::get().to(categories::get_category_by_slug))
                        .route("/{id}/posts", web::get().to(categories::list_category_posts))
                        .route("/{id}", web::get().to(categories::get_category))
                        .route("/{id}", web::put().to(categories::update_category))
                        .route("/{id}", web::delete().to(categories::delete_category)),
                )
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::post().to(posts::create_post))
                        .route("/{id}", web::get().to(posts::get_post))
                        .route("/{id}", web::put().to(posts::update_post))
                        .route("/{id}", web::delete().to(posts::delete_post)),
                )
                .service(
                    web::scope("/comments")
                        .route("", web::get().to(comments::list_comments))
                        .route("", web::post().to(comments::create_comment))
                        .route("/{id}", web::get().to(comments::get_comment))
                        .route("/{id}", web::put().to(comments::update_comment))
                        .route("/{id}", web::delete().to(comments::delete_comment)),
                ),
        )
        .default_service(web::to(endpoint_not_found));
}

/// GET /
async fn service_info(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(ServiceInfo {
        message: "Folio API Server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment.to_string(),
        endpoints: Endpoints {
            rest: "/api".to_string(),
            graphql: "/graphql".to_string(),
            health: "/health".to_string(),
        },
    }))
}

async fn endpoint_not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::RouteNotFound {
        method: req.method().to_string(),
        path: req.path().to_string(),
    })
}

/// Parse an `{id}` path segment.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    validation::parse_id(raw)
        .ok_or_else(|| AppError::Validation(ValidationErrors::single("id", "Invalid ID format")))
}

fn pagination(info: PageInfo) -> Pagination {
    Pagination {
        page: info.page,
        limit: info.limit,
        has_more: info.has_more,
    }
}
