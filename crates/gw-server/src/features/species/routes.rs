use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};

use super::queries::{self, ListSpeciesQuery};
use crate::api::response::ApiResponse;
use crate::error::ServiceError;
use crate::features::FeatureState;
use crate::store::SpeciesRecord;

pub fn species_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_species))
        .route("/:species_id", get(get_species))
}

async fn list_species(
    State(state): State<FeatureState>,
    Query(query): Query<ListSpeciesQuery>,
) -> Result<ApiResponse<Vec<SpeciesRecord>>, ServiceError> {
    let species = queries::list::handle(state.store.as_ref(), query).await?;
    Ok(ApiResponse::success(species))
}

async fn get_species(
    State(state): State<FeatureState>,
    Path(species_id): Path<i32>,
) -> Result<ApiResponse<SpeciesRecord>, ServiceError> {
    let species = queries::get::handle(state.store.as_ref(), species_id).await?;
    Ok(ApiResponse::success(species))
}
