//! Shared helpers for router tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;

use gw_server::{
    api,
    config::{BatchConfig, Config},
    features::FeatureState,
    pubmed::{PubmedClient, PubmedError},
    store::{memory::MemoryStore, NewPublication},
};

pub const OWNER_SUB: &str = "auth0|owner";
pub const OWNER_EMAIL: &str = "owner@example.org";

/// PubMed stand-in that knows one record.
pub struct FakePubmed;

#[async_trait]
impl PubmedClient for FakePubmed {
    async fn fetch(&self, pubmed_id: &str) -> Result<NewPublication, PubmedError> {
        if pubmed_id == "19958391" {
            Ok(NewPublication {
                title: Some("GeneWeaver: a web-based system for integrative functional genomics".into()),
                journal: Some("Nucleic Acids Res".into()),
                year: Some("2010".into()),
                ..NewPublication::default()
            })
        } else {
            Err(PubmedError::NotFound(pubmed_id.to_string()))
        }
    }
}

pub fn app(store: MemoryStore) -> Router {
    app_with(store, BatchConfig::default())
}

pub fn app_with(store: MemoryStore, batch: BatchConfig) -> Router {
    let state = FeatureState {
        store: Arc::new(store),
        pubmed: Arc::new(FakePubmed),
        batch,
    };
    api::create_router(state, &Config::default())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Request carrying the gateway identity headers.
pub fn as_user(method: &str, uri: &str, sub: &str, email: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-auth-sub", sub)
        .header("x-auth-email", email)
        .header("content-type", "application/json")
        .body(body)
        .unwrap()
}

pub fn as_owner(method: &str, uri: &str) -> Request<Body> {
    as_user(method, uri, OWNER_SUB, OWNER_EMAIL, Body::empty())
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
