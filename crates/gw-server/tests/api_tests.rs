//! Router-level tests over the in-memory store

mod common;

use axum::{body::Body, http::StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::*;
use gw_common::types::{GeneIdentifier, GenesetTier, Species};
use gw_server::store::memory::{sample_geneset, MemoryStore};

fn seeded() -> MemoryStore {
    let mut private = sample_geneset(2, 1, GenesetTier::Tier5, Species::MusMusculus);
    private.name = "Private striatum set".into();

    MemoryStore::new()
        .with_user(1, OWNER_EMAIL, Some(OWNER_SUB))
        .with_user(2, "other@example.org", Some("auth0|other"))
        .with_geneset(sample_geneset(1, 1, GenesetTier::Tier2, Species::MusMusculus))
        .with_geneset(private)
        .with_gene(10, "17237", GeneIdentifier::Entrez, Species::MusMusculus, Some(100))
        .with_gene(11, "ENSG00000002", GeneIdentifier::EnsemblGene, Species::HomoSapiens, Some(100))
        .with_value(1, 10, "Gnai3", 0.01, true)
        .with_term(300, "GO:0007611", "learning or memory")
        .with_publication(5, "123", "Alcohol and the mouse genome")
        .with_species(Species::MusMusculus, 10090, Some(GeneIdentifier::Mgi))
}

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_homolog_mapping_across_species() {
    let request = post_json(
        "/api/genes/homologs",
        json!({
            "source_ids": ["17237", "17237"],
            "target_gene_id_type": 2,
            "source_species": 1,
            "target_species": 2
        }),
    );
    let response = app(seeded()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let ids_map = body["data"]["ids_map"].as_array().unwrap();
    assert_eq!(ids_map.len(), 2);
    assert_eq!(ids_map[0]["mapped_ids"], json!(["ENSG00000002"]));
}

#[tokio::test]
async fn test_homolog_mapping_rejects_empty_input() {
    let request = post_json(
        "/api/genes/homologs",
        json!({"source_ids": [], "target_gene_id_type": 2}),
    );
    let response = app(seeded()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_geneset_listing_depends_on_caller() {
    let response = app(seeded()).oneshot(get("/api/genesets")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(ids(&body), vec![1]);
    assert_eq!(body["meta"]["limit"], 10);

    let response = app(seeded())
        .oneshot(as_owner("GET", "/api/genesets?curation_tier=2,5"))
        .await
        .unwrap();
    assert_eq!(ids(&body_json(response).await), vec![1, 2]);
}

#[tokio::test]
async fn test_geneset_listing_accepts_repeated_codes() {
    let response = app(seeded())
        .oneshot(as_owner("GET", "/api/genesets?curation_tier=2&curation_tier=5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ids(&body_json(response).await), vec![1, 2]);

    let response = app(seeded())
        .oneshot(get("/api/genesets?curation_tier=5&score_type=1&score_type=2,3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_anonymous_private_only_listing_is_forbidden() {
    let response = app(seeded())
        .oneshot(get("/api/genesets?curation_tier=5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app(seeded())
        .oneshot(get("/api/genesets?only_my_genesets=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_geneset_detail_requires_identity() {
    let response = app(seeded()).oneshot(get("/api/genesets/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app(seeded()).oneshot(as_owner("GET", "/api/genesets/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["geneset"]["id"], 1);
    assert_eq!(body["data"]["geneset_values"][0]["ode_ref_id"], "Gnai3");
}

#[tokio::test]
async fn test_private_and_missing_genesets_both_answer_404() {
    let other = |uri: &str| as_user("GET", uri, "auth0|other", "other@example.org", Body::empty());

    let response = app(seeded()).oneshot(other("/api/genesets/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "INACCESSIBLE_OR_FORBIDDEN");

    let response = app(seeded()).oneshot(other("/api/genesets/99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "RECORD_NOT_FOUND");
}

#[tokio::test]
async fn test_new_identity_is_provisioned() {
    let store = seeded();
    let request = as_user("GET", "/api/genesets/1", "auth0|new", "new@example.org", Body::empty());
    let response = app(store).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_threshold_update() {
    let body = Body::from(json!({"score_type": 1, "threshold": 0.01}).to_string());
    let request = as_user("PUT", "/api/genesets/1/threshold", OWNER_SUB, OWNER_EMAIL, body);
    let response = app(seeded()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = Body::from(json!({"score_type": 1, "threshold": 0.01}).to_string());
    let request = as_user("PUT", "/api/genesets/1/threshold", "auth0|other", "other@example.org", body);
    let response = app(seeded()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = Body::from(json!({"score_type": 2, "threshold": 3.0}).to_string());
    let request = as_user("PUT", "/api/genesets/1/threshold", OWNER_SUB, OWNER_EMAIL, body);
    let response = app(seeded()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ontology_term_lifecycle() {
    let app = app(seeded());

    let response = app
        .clone()
        .oneshot(as_owner("PUT", "/api/genesets/1/ontologies?ontology_id=GO:0007611"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(as_owner("PUT", "/api/genesets/1/ontologies?ontology_id=GO:0007611"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(as_owner("GET", "/api/genesets/1/ontologies"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["ref_id"], "GO:0007611");

    let response = app
        .clone()
        .oneshot(as_owner("DELETE", "/api/genesets/1/ontologies/GO:0007611"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(as_owner("DELETE", "/api/genesets/1/ontologies/GO:0007611"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_publication_lookup_and_import() {
    let response = app(seeded()).oneshot(get("/api/publications/123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], 5);

    let response = app(seeded())
        .oneshot(get("/api/publications/5?as_pubmed_id=false"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["pubmed_id"], "123");

    let response = app(seeded())
        .oneshot(as_owner("POST", "/api/publications/pubmed/19958391"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], json!({"pubmed_id": "19958391", "pub_id": 6}));

    let response = app(seeded())
        .oneshot(as_owner("POST", "/api/publications/pubmed/123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/publications/pubmed/19958391")
        .body(Body::empty())
        .unwrap();
    let response = app(seeded()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_species_endpoints() {
    let response = app(seeded())
        .oneshot(get("/api/species?taxonomy_id=10090"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["common_name"], "mouse");
    assert_eq!(body["data"][0]["reference_gene_id_type"], 10);

    let response = app(seeded()).oneshot(get("/api/species/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_combined_search() {
    let response = app(seeded())
        .oneshot(get("/api/search?entities=genesets,publications&search_text=alcohol"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["genesets"], json!([]));
    assert_eq!(body["data"]["publications"][0]["id"], 5);
}

#[tokio::test]
async fn test_health_monitor() {
    let response = app(MemoryStore::new().unhealthy())
        .oneshot(get("/api/monitors/servers/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "UP");
    assert!(body["data"].get("DB_status").is_none());

    let response = app(MemoryStore::new().unhealthy())
        .oneshot(get("/api/monitors/servers/health?db_health_check=true"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["DB_status"]["status"], "DOWN");
}

#[tokio::test]
async fn test_cors_allows_identity_headers() {
    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/api/genesets")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "x-auth-sub")
        .body(Body::empty())
        .unwrap();
    let response = app(seeded()).oneshot(request).await.unwrap();

    let allowed = response
        .headers()
        .get("access-control-allow-headers")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(allowed.contains("x-auth-sub"));
}
