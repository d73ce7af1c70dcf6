//! Feature slices of the GeneWeaver API
//!
//! Each feature is a vertical slice with its own `queries/` (reads),
//! `commands/` (writes) and `routes.rs`. Handlers are generic over the
//! store traits they need and are handed `state.store` at the route.
//!
//! # Features
//!
//! - **genes**: gene listing and identifier mapping across species
//! - **genesets**: geneset listing, detail, values, threshold and terms
//! - **publications**: publication lookup and PubMed import
//! - **species**: species metadata
//! - **search**: combined geneset and publication search
//! - **monitors**: service health
//! - **batch**: batch file upload and validation

pub mod batch;
pub mod genes;
pub mod genesets;
pub mod monitors;
pub mod publications;
pub mod search;
pub mod shared;
pub mod species;

use axum::Router;
use std::sync::Arc;

use crate::config::BatchConfig;
use crate::pubmed::PubmedClient;
use crate::store::Store;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    pub store: Arc<dyn Store>,
    pub pubmed: Arc<dyn PubmedClient>,
    pub batch: BatchConfig,
}

/// Every feature router, each under its own path prefix.
pub fn router(state: FeatureState) -> Router<()> {
    let max_upload_bytes = state.batch.max_upload_bytes;

    Router::new()
        .nest("/genes", genes::genes_routes())
        .nest("/genesets", genesets::genesets_routes())
        .nest("/publications", publications::publications_routes())
        .nest("/species", species::species_routes())
        .nest("/search", search::search_routes())
        .nest("/monitors", monitors::monitors_routes())
        .nest("/batch", batch::batch_routes(max_upload_bytes))
        .with_state(state)
}
