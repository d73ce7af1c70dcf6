//! Batch upload over multipart

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use common::*;
use gw_server::config::BatchConfig;
use gw_server::store::memory::MemoryStore;

const BOUNDARY: &str = "gw-test-boundary";

const BATCH: &str = "\
# Example batch
! Q-Value < 0.1
@ Homo sapiens
% Entrez
A Public

: first
= DNA repair genes
4155\t0.02
672\t0.07

: second
@ Mus musculus
= Missing values
";

fn multipart_body(field: &str, contents: &[u8]) -> Body {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"; filename=\"batch.txt\"\r\n", field).as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    Body::from(body)
}

fn upload(uri: &str, field: &str, contents: &[u8], identified: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY));
    if identified {
        builder = builder
            .header("x-auth-sub", OWNER_SUB)
            .header("x-auth-email", OWNER_EMAIL);
    }
    builder.body(multipart_body(field, contents)).unwrap()
}

fn store() -> MemoryStore {
    MemoryStore::new().with_user(1, OWNER_EMAIL, Some(OWNER_SUB))
}

#[tokio::test]
async fn test_upload_returns_genesets_and_messages() {
    let response = app(store())
        .oneshot(upload("/api/batch", "batch_file", BATCH.as_bytes(), true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let genesets = body["data"]["genesets"].as_array().unwrap();
    assert_eq!(genesets.len(), 1);
    assert_eq!(genesets[0]["name"], "DNA repair genes");
    assert_eq!(genesets[0]["values"].as_array().unwrap().len(), 2);
    assert_eq!(genesets[0]["access"], "public");

    let user_messages = body["data"]["messages"]["user_messages"].as_array().unwrap();
    assert_eq!(user_messages.len(), 1);
    assert_eq!(user_messages[0]["message_type"], "error");
}

#[tokio::test]
async fn test_upload_requires_identity() {
    let response = app(store())
        .oneshot(upload("/api/batch", "batch_file", BATCH.as_bytes(), false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_validate_is_anonymous_and_summarizes() {
    let response = app(store())
        .oneshot(upload("/api/batch/validate", "batch_file", BATCH.as_bytes(), false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let summary = &body["data"]["genesets"][0];
    assert_eq!(summary["label"], "first");
    assert_eq!(summary["gene_count"], 2);
    assert!(summary.get("values").is_none());
}

#[tokio::test]
async fn test_bad_uploads() {
    let response = app(store())
        .oneshot(upload("/api/batch/validate", "file", BATCH.as_bytes(), false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app(store())
        .oneshot(upload("/api/batch/validate?encoding=utf-16", "batch_file", BATCH.as_bytes(), false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let small = BatchConfig {
        max_upload_bytes: 16,
        ..BatchConfig::default()
    };
    let response = app_with(store(), small)
        .oneshot(upload("/api/batch/validate", "batch_file", BATCH.as_bytes(), false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
