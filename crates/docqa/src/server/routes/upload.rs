//! Document upload endpoint

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::DocumentSummary;

/// POST /api/sessions/:id/document - Upload and index a PDF
pub async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<DocumentSummary>> {
    let handle = state.sessions().get(id)?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        Error::Internal(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::UnsupportedFileType("upload has no filename".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("Failed to read file: {}", e)))?;

        tracing::info!("Processing file: {} ({} bytes)", filename, data.len());
        let start = Instant::now();

        let mut session = handle.lock().await;
        let summary = state
            .assistant()
            .load_document(&mut session, &filename, data.to_vec())
            .await?;

        tracing::info!(
            "Loaded {} into session {} in {:.1}s",
            filename,
            id,
            start.elapsed().as_secs_f64()
        );
        return Ok(Json(summary));
    }

    Err(Error::UnsupportedFileType(
        "no 'file' field in upload".to_string(),
    ))
}
