//! Session lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::SessionInfo;

/// POST /api/sessions - Create an empty session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (id, _) = state.sessions().create();
    (StatusCode::CREATED, Json(json!({ "session_id": id })))
}

/// GET /api/sessions/:id - Session state
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionInfo>> {
    let handle = state.sessions().get(id)?;
    let session = handle.lock().await;
    Ok(Json(session.info()))
}

/// POST /api/sessions/:id/clear - Clear conversation, keep the document
pub async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionInfo>> {
    let handle = state.sessions().get(id)?;
    let mut session = handle.lock().await;
    state.assistant().clear_conversation(&mut session);
    Ok(Json(session.info()))
}

/// DELETE /api/sessions/:id - Full reset; the session is removed
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let handle = state.sessions().remove(id)?;
    let mut session = handle.lock().await;
    state.assistant().reset(&mut session).await?;
    Ok(StatusCode::NO_CONTENT)
}
