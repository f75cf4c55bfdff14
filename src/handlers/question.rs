// src/handlers/question.rs

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
    models::question::{CreateQuestionRequest, QuestionListParams},
    session::Session,
};

/// Browse the question bank.
pub async fn list_questions(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Query(mut params): Query<QuestionListParams>,
) -> Result<impl IntoResponse, AppError> {
    params.limit = Some(params.limit.unwrap_or(20).min(100));
    Ok(Json(backend.list_questions(&session.token, &params).await?))
}

/// Adds a question to the bank.
/// Admin only.
pub async fn create_question(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let question = backend.create_question(&session.token, &payload).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// Updates a question.
/// Admin only.
pub async fn update_question(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(backend.update_question(&session.token, id, &payload).await?))
}

/// Deletes a question.
/// Admin only.
pub async fn delete_question(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    backend.delete_question(&session.token, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
