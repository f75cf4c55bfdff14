// src/handlers/analytics.rs

use std::collections::HashSet;

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::{
    analytics::{self, Dashboard, Dimension, Timeframe},
    error::AppError,
    session::Session,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub dimension: Option<Dimension>,
    #[serde(default)]
    pub timeframe: Timeframe,
}

/// Computes the analytics dashboard for the signed-in student.
///
/// * Fetches attempts in the timeframe, then the questions they reference.
/// * Any fetch failure fails the whole request; no partial dashboard is built.
/// * The result is also kept as the "latest" dashboard unless a newer
///   request started in the meantime.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(params): Query<DashboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let dimension = params.dimension.unwrap_or(Dimension::Subject);
    let ticket = state.dashboard.begin();

    let window = params.timeframe.window(Utc::now());
    let attempts = state
        .backend
        .fetch_attempts(&session.token, window)
        .await
        .map_err(|e| {
            tracing::debug!("Failed to fetch attempts: {:?}", e);
            e
        })?;

    let mut seen = HashSet::new();
    let ids: Vec<i64> = attempts
        .iter()
        .flat_map(|a| a.answers.iter().map(|r| r.question_id))
        .filter(|id| seen.insert(*id))
        .collect();

    let questions = state
        .backend
        .fetch_questions(&session.token, &ids)
        .await
        .map_err(|e| {
            tracing::debug!("Failed to fetch question metadata: {:?}", e);
            e
        })?;

    let dashboard = analytics::build_dashboard(&attempts, &questions, dimension);

    if !state.dashboard.publish(ticket, dashboard.clone()) {
        tracing::debug!("Dashboard for {} superseded by a newer request", dimension);
    }

    Ok(Json(dashboard))
}

/// The most recent dashboard computed by a non-superseded request.
pub async fn latest_dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    state
        .dashboard
        .get()
        .map(Json)
        .ok_or(AppError::NotFound("No dashboard computed yet".to_string()))
}

/// Lists the dimensions the dashboard can be grouped by.
pub async fn list_dimensions() -> impl IntoResponse {
    let dimensions: Vec<_> = Dimension::ALL
        .iter()
        .map(|d| json!({ "key": d.key(), "label": d.label() }))
        .collect();
    Json(dimensions)
}
