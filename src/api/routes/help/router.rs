//! Router for the help API

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};

use super::public::{HelpRequest, HelpResponse};
use crate::ai::prompt;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

/// Shown when the model answers without any text.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn’t generate guidance this time.";

/// Forward the student's code, question, and images to the model and
/// relay its coaching reply
async fn help_handler(
    State(state): State<SharedState>,
    payload: Result<Json<HelpRequest>, JsonRejection>,
) -> Result<Json<HelpResponse>, ApiError> {
    // Malformed bodies get the same error shape as everything else
    let Json(payload) = payload.map_err(|rejection| anyhow!(rejection.body_text()))?;

    let request = prompt::help_request(&payload, &state.config)?;
    let ai_text = state
        .model
        .respond(&request)
        .await?
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| {
            tracing::warn!("Model returned no text, sending fallback reply");
            FALLBACK_REPLY.to_string()
        });

    Ok(Json(HelpResponse::new(&ai_text)))
}

/// Create the help router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(help_handler))
}
