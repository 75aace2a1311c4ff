//! `/api/posts` handlers.

use actix_web::{HttpResponse, web};

use folio_core::domain::{PostChanges, PostDraft, PostFilter};
use folio_core::pagination::PageRequest;
use folio_core::ports::{BaseRepository, PostRepository};
use folio_shared::ApiResponse;
use folio_shared::dto::{MessageResponse, PostListQuery};

use super::{pagination, parse_id};
use crate::middleware::error::{AppResult, OrNotFound};
use crate::state::AppState;

/// GET /api/posts
///
/// Filters: `published`, `authorId`, `categoryId`, `categorySlug`. Authors and
/// categories are embedded in each item.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.limit)?;
    let filter = PostFilter::parse(
        query.published,
        query.author_id.as_deref(),
        query.category_id.as_deref(),
        query.category_slug,
    )?;

    let posts = state.repos.posts.list_with_relations(&filter, page).await?;
    let meta = pagination(page.info(posts.len()));

    Ok(HttpResponse::Ok().json(ApiResponse::paginated(posts, meta)))
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let post = state.repos.posts.find_detail(id).await.or_not_found("Post")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<PostDraft>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner().validate()?;
    let post = state.repos.posts.create(input).await?;
    tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostChanges>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let patch = body.into_inner().validate()?;
    let post = state.repos.posts.update(id, patch).await.or_not_found("Post")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.repos.posts.delete(id).await.or_not_found("Post")?;
    tracing::info!(post_id = %id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MessageResponse::new("Post deleted successfully"))))
}
