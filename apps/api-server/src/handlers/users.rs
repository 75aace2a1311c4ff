//! `/api/users` handlers.

use actix_web::{HttpResponse, web};

use folio_core::domain::{UserChanges, UserDraft};
use folio_core::pagination::PageRequest;
use folio_core::ports::{BaseRepository, UserRepository};
use folio_shared::ApiResponse;
use folio_shared::dto::{MessageResponse, PaginationQuery};

use super::{pagination, parse_id};
use crate::middleware::error::{AppResult, OrNotFound};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::new(query.page, query.limit)?;
    let users = state.repos.users.list(page).await?;
    let meta = pagination(page.info(users.len()));

    Ok(HttpResponse::Ok().json(ApiResponse::paginated(users, meta)))
}

/// GET /api/users/{id}
pub async fn get_user(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let user = state.repos.users.find_by_id(id).await.or_not_found("User")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

/// POST /api/users
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<UserDraft>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner().validate()?;
    let user = state.repos.users.create(input).await?;
    tracing::info!(user_id = %user.id, "User created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(user)))
}

/// PUT /api/users/{id}
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UserChanges>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let patch = body.into_inner().validate()?;
    let user = state.repos.users.update(id, patch).await.or_not_found("User")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.repos.users.delete(id).await.or_not_found("User")?;
    tracing::info!(user_id = %id, "User deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MessageResponse::new("User deleted successfully"))))
}
