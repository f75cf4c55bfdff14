// src/handlers/community.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    backend::Backend,
    error::AppError,
    models::{
        comment::CreateCommentRequest,
        post::{CreatePostRequest, PostListParams, ReportRequest},
    },
    session::Session,
    utils::html::clean_html,
};

/// Sanitizes user-written content. Content that sanitizes to nothing is rejected.
fn sanitize(content: &str) -> Result<String, AppError> {
    let cleaned = clean_html(content);
    if cleaned.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Content is empty after removing unsafe markup".to_string(),
        ));
    }
    Ok(cleaned)
}

/// Create a new post.
pub async fn create_post(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Json(mut payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Validate payload
    payload.validate()?;

    // 2. Sanitize and normalize
    payload.content = sanitize(&payload.content)?;
    payload.tags = payload.tags.iter().map(|t| t.trim().to_string()).collect();

    // 3. Forward
    let post = backend.create_post(&session.token, &payload).await.map_err(|e| {
        tracing::error!("Failed to create post: {:?}", e);
        e
    })?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// List posts (Recent first).
/// Supports page-based pagination.
pub async fn list_posts(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Query(mut params): Query<PostListParams>,
) -> Result<impl IntoResponse, AppError> {
    params.limit = Some(params.limit.unwrap_or(20).min(100)); // Default 20, max 100
    Ok(Json(backend.list_posts(&session.token, &params).await?))
}

/// Get a single post by ID, comments included.
pub async fn get_post(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(backend.get_post(&session.token, id).await?))
}

/// Delete a post.
/// The backend enforces author-or-admin; this only short-circuits obvious denials.
pub async fn delete_post(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Fetch Post to check ownership
    let post = backend.get_post(&session.token, id).await?;

    // 2. Check Permission
    if post.author.id != session.user.id && !session.user.is_admin() {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this post".to_string(),
        ));
    }

    // 3. Delete
    backend.delete_post(&session.token, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List comments of a post, oldest first.
pub async fn list_comments(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(backend.list_comments(&session.token, post_id).await?))
}

/// Add a comment to a post.
pub async fn create_comment(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(post_id): Path<i64>,
    Json(mut payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.content = sanitize(&payload.content)?;

    let comment = backend
        .create_comment(&session.token, post_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Toggle Like on a post.
pub async fn toggle_like(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let liked = backend.toggle_like(&session.token, post_id).await?;
    Ok(Json(serde_json::json!({ "liked": liked })))
}

/// Report a post to moderators.
pub async fn report_post(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(post_id): Path<i64>,
    Json(payload): Json<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    backend.report_post(&session.token, post_id, &payload).await?;
    tracing::info!("Post {} reported by user {}", post_id, session.user.id);
    Ok(StatusCode::ACCEPTED)
}
