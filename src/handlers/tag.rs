// src/handlers/tag.rs

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
    models::tag::{CreateTagRequest, TagListParams},
    session::Session,
};

/// List tags, optionally for one dimension.
pub async fn list_tags(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Query(params): Query<TagListParams>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(backend.list_tags(&session.token, &params).await?))
}

/// Create a tag value. Admin only.
pub async fn create_tag(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Json(mut payload): Json<CreateTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.name = payload.name.trim().to_string();
    payload.validate()?;
    let tag = backend.create_tag(&session.token, &payload).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Delete a tag value. Admin only.
pub async fn delete_tag(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    backend.delete_tag(&session.token, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
