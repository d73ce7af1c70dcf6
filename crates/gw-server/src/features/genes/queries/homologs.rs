use gw_common::types::{GeneIdentifier, Species};
use serde::{Deserialize, Serialize};

use super::{align_to_sources, GeneIdMappingResponse};
use crate::error::{ServiceError, ServiceResult};
use crate::features::shared::validate_source_ids;
use crate::store::{GeneStore, HomologLookup};

/// Body of `POST /genes/homologs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomologMappingQuery {
    pub source_ids: Vec<String>,
    pub target_gene_id_type: GeneIdentifier,
    #[serde(default)]
    pub source_gene_id_type: Option<GeneIdentifier>,
    #[serde(default)]
    pub target_species: Option<Species>,
    #[serde(default)]
    pub source_species: Option<Species>,
}

impl HomologMappingQuery {
    pub fn validate(&self) -> ServiceResult<()> {
        validate_source_ids(&self.source_ids).map_err(|e| ServiceError::validation(e.to_string()))
    }

    /// Both species given and equal: no homology needed.
    fn same_species(&self) -> Option<Species> {
        match (self.source_species, self.target_species) {
            (Some(source), Some(target)) if source == target => Some(source),
            _ => None,
        }
    }
}

#[tracing::instrument(
    skip(store, query),
    fields(ids = query.source_ids.len(), target = %query.target_gene_id_type)
)]
pub async fn handle<S: GeneStore + ?Sized>(store: &S, query: HomologMappingQuery) -> ServiceResult<GeneIdMappingResponse> {
    query.validate()?;

    let rows = match query.same_species() {
        Some(species) => {
            tracing::debug!(%species, "Source and target species match, mapping within species");
            store
                .mapping(&query.source_ids, species, query.target_gene_id_type)
                .await?
        },
        None => {
            let lookup = HomologLookup {
                source_ids: query.source_ids.clone(),
                target_gene_id_type: query.target_gene_id_type,
                source_gene_id_type: query.source_gene_id_type,
                target_species: query.target_species,
                source_species: query.source_species,
            };
            store.get_homolog_ids(&lookup).await?
        },
    };

    Ok(align_to_sources(&query.source_ids, &rows))
}
