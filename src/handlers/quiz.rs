// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    backend::Backend,
    composer::QuizComposer,
    error::AppError,
    models::quiz::{Quiz, QuizDraft},
    session::Session,
};

/// Runs a draft through the composer.
///
/// * Validates the form payload.
/// * Fetches the referenced questions in one batch.
/// * Returns the composed quiz, totals included.
async fn compose(
    backend: &dyn Backend,
    session: &Session,
    draft: &QuizDraft,
) -> Result<Quiz, AppError> {
    draft.validate()?;
    let questions = backend
        .fetch_questions(&session.token, &draft.question_ids())
        .await?;
    QuizComposer::from_draft(draft, &questions)?.build()
}

/// Composes a quiz without submitting it, so the form can show totals.
pub async fn preview_quiz(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Json(draft): Json<QuizDraft>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = compose(backend.as_ref(), &session, &draft).await?;
    Ok(Json(quiz))
}

/// Composes and submits a new quiz.
pub async fn create_quiz(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Json(draft): Json<QuizDraft>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = compose(backend.as_ref(), &session, &draft).await?;
    let created = backend.create_quiz(&session.token, &quiz).await?;
    tracing::info!(
        "Quiz '{}' created with {} marks over {} minutes",
        created.title,
        created.total_marks,
        created.total_duration
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// Composes a draft and replaces an existing quiz with it.
pub async fn update_quiz(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
    Json(draft): Json<QuizDraft>,
) -> Result<impl IntoResponse, AppError> {
    let mut quiz = compose(backend.as_ref(), &session, &draft).await?;
    quiz.id = Some(id);
    let updated = backend.update_quiz(&session.token, id, &quiz).await?;
    Ok(Json(updated))
}

pub async fn list_quizzes(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(backend.list_quizzes(&session.token).await?))
}

/// Fetches a quiz. Totals are recomputed from its sections before returning.
pub async fn get_quiz(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = backend.get_quiz(&session.token, id).await?;
    let composer = QuizComposer::from_quiz(quiz);
    Ok(Json(composer.quiz().clone()))
}

pub async fn delete_quiz(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    backend.delete_quiz(&session.token, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
