//! Geneset values under a requested identifier system
//!
//! When the requested identifier system belongs to a different species
//! than the geneset, values are fetched under the homology pseudo-type and
//! each gene is replaced by its homolog in the requested system.

use gw_common::types::GeneIdentifier;
use std::collections::HashMap;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{GeneStore, Geneset, GenesetStore, GenesetValue};

/// How values for a requested identifier system are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Identifiers as uploaded
    Native,
    /// Fetch directly under the requested system
    Direct(GeneIdentifier),
    /// Fetch under homology, then map to the requested system
    Homology(GeneIdentifier),
}

/// Picks the value source for `geneset` and `requested`.
pub async fn value_source<S: GeneStore + ?Sized>(
    store: &S,
    geneset: &Geneset,
    requested: Option<GeneIdentifier>,
) -> ServiceResult<ValueSource> {
    let Some(requested) = requested else {
        return Ok(ValueSource::Native);
    };

    let database = store
        .gene_database_by_id(requested)
        .await?
        .ok_or_else(|| ServiceError::not_found("Gene database", requested))?;

    Ok(match database.species {
        Some(species) if Some(species) != geneset.species => ValueSource::Homology(requested),
        _ => ValueSource::Direct(requested),
    })
}

/// Values of `geneset`, rows tagged with the requested identifier system.
#[tracing::instrument(skip(store, geneset), fields(geneset_id = geneset.id))]
pub async fn resolve_values<S>(
    store: &S,
    geneset: &Geneset,
    requested: Option<GeneIdentifier>,
    in_threshold: Option<bool>,
) -> ServiceResult<Vec<GenesetValue>>
where
    S: GeneStore + GenesetStore + ?Sized,
{
    match value_source(store, geneset, requested).await? {
        ValueSource::Native => Ok(store.geneset_values(geneset.id, None, in_threshold).await?),
        ValueSource::Direct(gene_id_type) => Ok(store
            .geneset_values(geneset.id, Some(gene_id_type), in_threshold)
            .await?),
        ValueSource::Homology(gene_id_type) => {
            tracing::debug!(%gene_id_type, "Mapping geneset values across species");
            let values = store
                .geneset_values(geneset.id, Some(GeneIdentifier::Homology), in_threshold)
                .await?;
            let ode_ids: Vec<i64> = values.iter().map(|v| v.ode_gene_id).collect();
            let homologs: HashMap<i64, String> = store
                .get_homolog_ids_by_ode_id(&ode_ids, gene_id_type)
                .await?
                .into_iter()
                .map(|h| (h.ode_gene_id, h.ode_ref_id))
                .collect();
            Ok(remap_values(values, &homologs, gene_id_type))
        },
    }
}

/// Replaces each row's identifier with its homolog, or `None` when there is
/// none. Rows are never dropped.
fn remap_values(
    values: Vec<GenesetValue>,
    homologs: &HashMap<i64, String>,
    gene_id_type: GeneIdentifier,
) -> Vec<GenesetValue> {
    values
        .into_iter()
        .map(|value| GenesetValue {
            ode_ref_id: homologs.get(&value.ode_gene_id).cloned(),
            gene_id_type: Some(gene_id_type),
            ..value
        })
        .collect()
}
