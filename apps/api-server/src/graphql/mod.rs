//! GraphQL API served at `/graphql`.

mod context;
mod error;
mod loader;
mod mutation;
mod query;
mod scalar;
mod types;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, http::StatusCode, web};
use juniper::http::GraphQLRequest;
use juniper::http::graphiql::graphiql_source;
use juniper::{EmptySubscription, RootNode};

pub use context::GraphQLContext;
pub use mutation::MutationRoot;
pub use query::QueryRoot;

use crate::observability::RequestId;
use crate::state::AppState;

pub type Schema = RootNode<'static, QueryRoot, MutationRoot, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(QueryRoot, MutationRoot, EmptySubscription::<GraphQLContext>::new())
}

/// POST /graphql
///
/// Every request gets a fresh context, so relation caches never outlive it.
pub async fn graphql_handler(
    state: web::Data<AppState>,
    request_id: RequestId,
    request: web::Json<GraphQLRequest>,
) -> HttpResponse {
    let context = GraphQLContext::new(state.repos.clone());
    let response = request.execute(&state.schema, &context).await;

    tracing::debug!(
        request_id = %request_id.as_str(),
        operation = request.operation_name().unwrap_or("anonymous"),
        batches = context.loader.batches(),
        ok = response.is_ok(),
        "GraphQL request executed"
    );

    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    HttpResponse::build(status).json(response)
}

/// GET /graphql
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(graphiql_source("/graphql", None))
}
