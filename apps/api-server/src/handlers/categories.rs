//! `/api/categories` handlers.

use actix_web::{HttpResponse, web};

use folio_core::domain::{CategoryChanges, CategoryDraft, PostFilter};
use folio_core::error::RepoError;
use folio_core::pagination::PageRequest;
use folio_core::ports::{BaseRepository, CategoryRepository, PostRepository};
use folio_shared::ApiResponse;
use folio_shared::dto::{MessageResponse, PaginationQuery};

use super::{pagination, parse_id};
use crate::middleware::error::{AppError, AppResult, OrNotFound};
use crate::state::AppState;

fn slug_conflict(err: RepoError) -> AppError {
    match err {
        RepoError::Constraint(_) => AppError::Conflict("Category with this slug already exists".to_string()),
        other => other.into(),
    }
}

/// GET /api/categories
pub async fn list_categories(
    state: web::Data<AppState>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::new(query.page, query.limit)?;
    let categories = state.repos.categories.list(page).await?;
    let meta = pagination(page.info(categories.len()));

    Ok(HttpResponse::Ok().json(ApiResponse::paginated(categories, meta)))
}

/// GET /api/categories/{id}
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let category = state
        .repos
        .categories
        .find_by_id(id)
        .await
        .or_not_found("Category")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// GET /api/categories/slug/{slug}
pub async fn get_category_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let category = state
        .repos
        .categories
        .find_by_slug(&path)
        .await
        .or_not_found("Category")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// GET /api/categories/{id}/posts
pub async fn list_category_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let page = PageRequest::new(query.page, query.limit)?;

    // A missing category is a 404, not an empty page.
    state
        .repos
        .categories
        .find_by_id(id)
        .await
        .or_not_found("Category")?;

    let posts = state
        .repos
        .posts
        .list_with_relations(&PostFilter::by_category(id), page)
        .await?;
    let meta = pagination(page.info(posts.len()));

    Ok(HttpResponse::Ok().json(ApiResponse::paginated(posts, meta)))
}

/// POST /api/categories
pub async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<CategoryDraft>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner().validate()?;
    let category = state
        .repos
        .categories
        .create(input)
        .await
        .map_err(slug_conflict)?;
    tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(category)))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CategoryChanges>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let patch = body.into_inner().validate()?;
    let category = state
        .repos
        .categories
        .update(id, patch)
        .await
        .map_err(slug_conflict)?
        .ok_or(AppError::NotFound("Category"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    state
        .repos
        .categories
        .delete(id)
        .await
        .or_not_found("Category")?;
    tracing::info!(category_id = %id, "Category deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MessageResponse::new(
        "Category deleted successfully",
    ))))
}
