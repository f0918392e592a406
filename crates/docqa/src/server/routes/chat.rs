//! Question endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse};

/// POST /api/sessions/:id/ask - Answer a question about the session's document
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let handle = state.sessions().get(id)?;
    let mut session = handle.lock().await;

    tracing::debug!("Session {} question: {}", id, request.question);
    let response = state.assistant().ask(&mut session, &request.question).await?;
    Ok(Json(response))
}
