//! `/api/comments` handlers.

use actix_web::{HttpResponse, web};

use folio_core::domain::{CommentChanges, CommentDraft};
use folio_core::pagination::PageRequest;
use folio_core::ports::{BaseRepository, CommentRepository};
use folio_shared::ApiResponse;
use folio_shared::dto::{MessageResponse, PaginationQuery};

use super::{pagination, parse_id};
use crate::middleware::error::{AppResult, OrNotFound};
use crate::state::AppState;

/// GET /api/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    query: web::Query<PaginationQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::new(query.page, query.limit)?;
    let comments = state.repos.comments.list_with_author(page).await?;
    let meta = pagination(page.info(comments.len()));

    Ok(HttpResponse::Ok().json(ApiResponse::paginated(comments, meta)))
}

/// GET /api/comments/{id}
pub async fn get_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let comment = state
        .repos
        .comments
        .find_with_author(id)
        .await
        .or_not_found("Comment")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment)))
}

/// POST /api/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    body: web::Json<CommentDraft>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner().validate()?;
    let comment = state.repos.comments.create(input).await?;
    tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "Comment created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(comment)))
}

/// PUT /api/comments/{id}
pub async fn update_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CommentChanges>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let patch = body.into_inner().validate()?;
    let comment = state
        .repos
        .comments
        .update(id, patch)
        .await
        .or_not_found("Comment")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment)))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.repos.comments.delete(id).await.or_not_found("Comment")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MessageResponse::new(
        "Comment deleted successfully",
    ))))
}
