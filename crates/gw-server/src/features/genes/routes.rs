use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use super::queries::{
    self, GeneIdMappingResponse, GeneMappingQuery, HomologMappingQuery, ListGenesQuery,
    ReferenceMappingQuery,
};
use crate::api::response::ApiResponse;
use crate::error::ServiceError;
use crate::features::FeatureState;
use crate::store::Gene;

pub fn genes_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_genes))
        .route("/homologs", post(map_homologs))
        .route("/mapping", post(map_genes))
        .route("/mapping/aon", post(map_to_reference))
}

#[tracing::instrument(skip(state, query))]
async fn list_genes(
    State(state): State<FeatureState>,
    Query(query): Query<ListGenesQuery>,
) -> Result<ApiResponse<Vec<Gene>>, ServiceError> {
    let response = queries::list::handle(state.store.as_ref(), query).await?;
    Ok(ApiResponse::success_with_meta(response.items, response.window))
}

async fn map_homologs(
    State(state): State<FeatureState>,
    Json(query): Json<HomologMappingQuery>,
) -> Result<ApiResponse<GeneIdMappingResponse>, ServiceError> {
    let response = queries::homologs::handle(state.store.as_ref(), query).await?;
    Ok(ApiResponse::success(response))
}

async fn map_genes(
    State(state): State<FeatureState>,
    Json(query): Json<GeneMappingQuery>,
) -> Result<ApiResponse<GeneIdMappingResponse>, ServiceError> {
    let response = queries::mapping::handle(state.store.as_ref(), query).await?;
    Ok(ApiResponse::success(response))
}

async fn map_to_reference(
    State(state): State<FeatureState>,
    Json(query): Json<ReferenceMappingQuery>,
) -> Result<ApiResponse<GeneIdMappingResponse>, ServiceError> {
    let response = queries::mapping::handle_reference(state.store.as_ref(), query).await?;
    Ok(ApiResponse::success(response))
}
