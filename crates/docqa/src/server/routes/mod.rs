//! API routes for the HTTP shell

pub mod chat;
pub mod sessions;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/sessions", post(sessions::create_session))
        .route(
            "/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        // Upload with larger body limit
        .route(
            "/sessions/:id/document",
            post(upload::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/sessions/:id/ask", post(chat::ask))
        .route("/sessions/:id/clear", post(sessions::clear_session))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docqa",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Ask grounded questions about one uploaded PDF",
        "endpoints": {
            "POST /api/sessions": "Create a session",
            "GET /api/sessions/:id": "Session state and chat log",
            "POST /api/sessions/:id/document": "Upload a PDF (multipart field 'file')",
            "POST /api/sessions/:id/ask": "Ask a question about the document",
            "POST /api/sessions/:id/clear": "Clear conversation history, keep the document",
            "DELETE /api/sessions/:id": "Discard document, history and storage"
        }
    }))
}
