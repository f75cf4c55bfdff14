// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    analytics::Dashboard,
    backend::Backend,
    error::AppError,
    models::user::LoginRequest,
    session::{Session, SessionManager},
    state::LatestSlot,
};

/// Authenticates against the backend and stores the resulting session.
///
/// The backend token's claims provide the user id, role and expiry.
/// Switching to a different user drops the previous user's dashboard.
pub async fn login(
    State(backend): State<Arc<dyn Backend>>,
    State(sessions): State<Arc<SessionManager>>,
    State(dashboard): State<Arc<LatestSlot<Dashboard>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resp = backend.login(&payload).await?;
    let session = Session::from_token(resp.token, &payload.username, resp.is_verified)?;
    let user = session.user.clone();

    let previous = sessions.current().map(|s| s.user.id);
    if previous != Some(user.id) {
        dashboard.clear();
    }
    sessions.sign_in(session)?;

    Ok(Json(json!({
        "user": user,
        "is_verified": user.is_verified
    })))
}

/// Ends the session, clears it from storage and drops the cached dashboard.
pub async fn logout(
    State(sessions): State<Arc<SessionManager>>,
    State(dashboard): State<Arc<LatestSlot<Dashboard>>>,
) -> Result<impl IntoResponse, AppError> {
    sessions.sign_out()?;
    dashboard.clear();
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the signed-in user.
pub async fn me(Extension(session): Extension<Session>) -> impl IntoResponse {
    Json(json!({
        "user": session.user,
        "expires_at": session.expires_at
    }))
}
