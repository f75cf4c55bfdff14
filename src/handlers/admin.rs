// src/handlers/admin.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, State},
    response::IntoResponse,
};

use crate::{backend::Backend, error::AppError, session::Session};

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(
    State(backend): State<Arc<dyn Backend>>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let users = backend.list_users(&session.token).await.map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        e
    })?;

    Ok(Json(users))
}
