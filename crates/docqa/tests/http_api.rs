//! HTTP shell exercised over a real socket

mod common;

use std::sync::Arc;

use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use common::{pdf_with_lines, Harness, ScriptedLlm};
use docqa::server::{state::AppState, DocQaServer};

struct Running {
    base: String,
    llm: Arc<ScriptedLlm>,
    _dir: TempDir,
}

async fn spawn(answer: &str) -> Running {
    let Harness {
        dir, llm, assistant, ..
    } = Harness::new(answer);
    let state = AppState::with_assistant(assistant).unwrap();
    let router = DocQaServer::with_state(state).build_router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Running {
        base: format!("http://{}", addr),
        llm,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_session_flow() {
    let server = spawn("The invoice total is $450.").await;
    let base = &server.base;
    let client = reqwest::Client::new();

    let health = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let created = client
        .post(format!("{}/api/sessions", base))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = created.json::<Value>().await.unwrap()["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    // Asking before upload
    let early = client
        .post(format!("{}/api/sessions/{}/ask", base, id))
        .json(&json!({ "question": "What is the invoice total?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(early.status(), StatusCode::CONFLICT);
    let body: Value = early.json().await.unwrap();
    assert_eq!(body["error"]["type"], "no_document_loaded");

    let pdf = pdf_with_lines(&["ACME Corp invoice.", "The invoice total is $450."]);
    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(pdf)
            .file_name("invoice.pdf")
            .mime_str("application/pdf")
            .unwrap(),
    );
    let uploaded = client
        .post(format!("{}/api/sessions/{}/document", base, id))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(uploaded.status(), StatusCode::OK);
    let summary: Value = uploaded.json().await.unwrap();
    assert_eq!(summary["filename"], "invoice.pdf");

    let answer: Value = client
        .post(format!("{}/api/sessions/{}/ask", base, id))
        .json(&json!({ "question": "What is the invoice total?" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(answer["answer"], "The invoice total is $450.");
    assert_eq!(answer["classification"], "document");
    assert_eq!(answer["accepted"], true);
    assert_eq!(server.llm.calls(), 1);

    let info: Value = client
        .get(format!("{}/api/sessions/{}", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(info["turns"], 1);
    assert_eq!(info["document"]["filename"], "invoice.pdf");
    assert_eq!(info["transcript"].as_array().unwrap().len(), 2);

    let cleared: Value = client
        .post(format!("{}/api/sessions/{}/clear", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared["turns"], 0);
    assert_eq!(cleared["document"]["filename"], "invoice.pdf");

    let deleted = client
        .delete(format!("{}/api/sessions/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = client
        .get(format!("{}/api/sessions/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_and_info() {
    let server = spawn("unused").await;
    let base = &server.base;
    let client = reqwest::Client::new();

    let missing = client
        .post(format!(
            "{}/api/sessions/00000000-0000-0000-0000-000000000000/ask",
            base
        ))
        .json(&json!({ "question": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let info: Value = client
        .get(format!("{}/api/info", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(info["name"], "docqa");
}
