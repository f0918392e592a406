//! Upload, replacement and reset of a session's document

mod common;

use common::{pdf_with_lines, Harness};
use docqa::retrieval::{session_index_dir, session_upload_dir, DocumentIndex};
use docqa::Error;

const INVOICE_LINES: &[&str] = &[
    "ACME Corp invoice number 1042.",
    "The invoice total is $450.",
    "Payment is due within 30 days of the invoice date.",
];

const WARRANTY_LINES: &[&str] = &[
    "Limited warranty statement.",
    "The warranty lasts two years from the date of purchase.",
];

#[tokio::test]
async fn test_load_document_indexes_and_persists() {
    let harness = Harness::new("The invoice total is $450.");
    let mut session = harness.assistant.new_session();

    let summary = harness
        .assistant
        .load_document(&mut session, "invoice.pdf", pdf_with_lines(INVOICE_LINES))
        .await
        .unwrap();

    assert_eq!(summary.filename, "invoice.pdf");
    assert_eq!(summary.page_count, Some(1));
    assert!(summary.chunk_count >= 1);
    assert_eq!(summary.content_hash.len(), 64);
    assert!(session.has_document());

    let storage = &harness.assistant.config().storage;
    assert!(storage
        .upload_dir
        .join(session.id().to_string())
        .join("invoice.pdf")
        .exists());
    let snapshot = DocumentIndex::load(&session_index_dir(&storage.index_dir, session.id()))
        .await
        .unwrap();
    assert_eq!(snapshot.len(), summary.chunk_count);
    assert_eq!(snapshot.metadata().source, "invoice.pdf");

    let response = harness
        .assistant
        .ask(&mut session, "What is the invoice total?")
        .await
        .unwrap();
    assert!(response.accepted);
    assert_eq!(response.sources[0].source, "invoice.pdf");
}

#[tokio::test]
async fn test_replacing_document_clears_history() {
    let harness = Harness::new("The invoice total is $450.");
    let mut session = harness.assistant.new_session();

    harness
        .assistant
        .load_document(&mut session, "invoice.pdf", pdf_with_lines(INVOICE_LINES))
        .await
        .unwrap();
    harness
        .assistant
        .ask(&mut session, "What is the invoice total?")
        .await
        .unwrap();
    assert_eq!(session.memory().len(), 1);

    harness
        .assistant
        .load_document(&mut session, "warranty.pdf", pdf_with_lines(WARRANTY_LINES))
        .await
        .unwrap();

    assert_eq!(session.document().unwrap().filename, "warranty.pdf");
    assert!(session.memory().is_empty());
    assert!(session.transcript().is_empty());

    let uploads = harness
        .assistant
        .config()
        .storage
        .upload_dir
        .join(session.id().to_string());
    assert!(!uploads.join("invoice.pdf").exists());
    assert!(uploads.join("warranty.pdf").exists());
}

#[tokio::test]
async fn test_identical_reupload_keeps_history() {
    let harness = Harness::new("The invoice total is $450.");
    let mut session = harness.assistant.new_session();
    let pdf = pdf_with_lines(INVOICE_LINES);

    let first = harness
        .assistant
        .load_document(&mut session, "invoice.pdf", pdf.clone())
        .await
        .unwrap();
    harness
        .assistant
        .ask(&mut session, "What is the invoice total?")
        .await
        .unwrap();

    let second = harness
        .assistant
        .load_document(&mut session, "invoice.pdf", pdf)
        .await
        .unwrap();

    assert_eq!(first.content_hash, second.content_hash);
    assert_eq!(first.indexed_at, second.indexed_at);
    assert_eq!(session.memory().len(), 1);
}

#[tokio::test]
async fn test_unsupported_and_unreadable_uploads() {
    let harness = Harness::new("unused");
    let mut session = harness.assistant.new_session();

    let err = harness
        .assistant
        .load_document(&mut session, "notes.txt", b"plain text".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFileType(_)));

    let err = harness
        .assistant
        .load_document(&mut session, "broken.pdf", b"not really a pdf".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DocumentUnreadable(_)));

    assert!(!session.has_document());
}

#[tokio::test]
async fn test_failed_replacement_keeps_previous_document() {
    let harness = Harness::new("The invoice total is $450.");
    let mut session = harness.assistant.new_session();

    harness
        .assistant
        .load_document(&mut session, "invoice.pdf", pdf_with_lines(INVOICE_LINES))
        .await
        .unwrap();
    harness
        .assistant
        .ask(&mut session, "What is the invoice total?")
        .await
        .unwrap();

    let err = harness
        .assistant
        .load_document(&mut session, "broken.pdf", b"%PDF-1.5 garbage".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DocumentUnreadable(_)));

    assert_eq!(session.document().unwrap().filename, "invoice.pdf");
    assert_eq!(session.memory().len(), 1);
}

#[tokio::test]
async fn test_storage_failure_keeps_previous_upload_on_disk() {
    let harness = Harness::new("The invoice total is $450.");
    let mut session = harness.assistant.new_session();

    harness
        .assistant
        .load_document(&mut session, "invoice.pdf", pdf_with_lines(INVOICE_LINES))
        .await
        .unwrap();

    let storage = &harness.assistant.config().storage;
    let upload_dir = session_upload_dir(&storage.upload_dir, session.id());
    let blocker = upload_dir.with_file_name(format!("{}.staging", session.id()));
    std::fs::write(&blocker, b"not a directory").unwrap();

    let result = harness
        .assistant
        .load_document(&mut session, "warranty.pdf", pdf_with_lines(WARRANTY_LINES))
        .await;
    assert!(result.is_err());

    assert_eq!(session.document().unwrap().filename, "invoice.pdf");
    assert!(upload_dir.join("invoice.pdf").exists());
    assert!(!upload_dir.join("warranty.pdf").exists());
    let snapshot = DocumentIndex::load(&session_index_dir(&storage.index_dir, session.id()))
        .await
        .unwrap();
    assert_eq!(snapshot.metadata().source, "invoice.pdf");
}

#[tokio::test]
async fn test_reset_discards_document_and_storage() {
    let harness = Harness::new("The invoice total is $450.");
    let mut session = harness.assistant.new_session();

    harness
        .assistant
        .load_document(&mut session, "invoice.pdf", pdf_with_lines(INVOICE_LINES))
        .await
        .unwrap();
    harness
        .assistant
        .ask(&mut session, "What is the invoice total?")
        .await
        .unwrap();

    harness.assistant.reset(&mut session).await.unwrap();

    assert!(!session.has_document());
    assert!(session.memory().is_empty());
    let storage = &harness.assistant.config().storage;
    assert!(!session_index_dir(&storage.index_dir, session.id()).exists());
    assert!(!storage.upload_dir.join(session.id().to_string()).exists());

    let err = harness
        .assistant
        .ask(&mut session, "What is the invoice total?")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoDocumentLoaded));
}

#[tokio::test]
async fn test_clear_conversation_keeps_document() {
    let harness = Harness::new("The invoice total is $450.");
    let mut session = harness.assistant.new_session();

    harness
        .assistant
        .load_document(&mut session, "invoice.pdf", pdf_with_lines(INVOICE_LINES))
        .await
        .unwrap();
    harness
        .assistant
        .ask(&mut session, "What is the invoice total?")
        .await
        .unwrap();

    harness.assistant.clear_conversation(&mut session);

    assert!(session.has_document());
    assert!(session.memory().is_empty());
    assert!(harness
        .assistant
        .ask(&mut session, "What is the invoice total?")
        .await
        .is_ok());
}
