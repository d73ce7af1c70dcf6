use gw_common::types::{GeneIdentifier, Species};
use serde::{Deserialize, Serialize};

use super::{align_to_sources, GeneIdMappingResponse};
use crate::error::{ServiceError, ServiceResult};
use crate::features::shared::validate_source_ids;
use crate::store::GeneStore;

/// Body of `POST /genes/mapping`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneMappingQuery {
    pub source_ids: Vec<String>,
    pub species: Species,
    pub target_gene_id_type: GeneIdentifier,
}

/// Body of `POST /genes/mapping/aon`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceMappingQuery {
    pub source_ids: Vec<String>,
    pub species: Species,
}

fn check_ids(ids: &[String]) -> ServiceResult<()> {
    validate_source_ids(ids).map_err(|e| ServiceError::validation(e.to_string()))
}

#[tracing::instrument(skip(store, query), fields(ids = query.source_ids.len(), species = %query.species))]
pub async fn handle<S: GeneStore + ?Sized>(store: &S, query: GeneMappingQuery) -> ServiceResult<GeneIdMappingResponse> {
    check_ids(&query.source_ids)?;
    let rows = store
        .mapping(&query.source_ids, query.species, query.target_gene_id_type)
        .await?;
    Ok(align_to_sources(&query.source_ids, &rows))
}

#[tracing::instrument(skip(store, query), fields(ids = query.source_ids.len(), species = %query.species))]
pub async fn handle_reference<S: GeneStore + ?Sized>(
    store: &S,
    query: ReferenceMappingQuery,
) -> ServiceResult<GeneIdMappingResponse> {
    check_ids(&query.source_ids)?;
    let rows = store.aon_mapping(&query.source_ids, query.species).await?;
    Ok(align_to_sources(&query.source_ids, &rows))
}
