use gw_common::types::GeneIdentifier;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};
use crate::features::genesets::access::readable_geneset;
use crate::features::genesets::values::resolve_values;
use crate::store::{GeneStore, Geneset, GenesetStore, GenesetValue, Publication, PublicationStore, UserRecord};

/// Query string of `GET /genesets/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetGenesetQuery {
    pub gene_id_type: Option<GeneIdentifier>,
    pub in_threshold: Option<bool>,
}

/// Query string of `GET /genesets/:id/metadata`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataQuery {
    #[serde(default)]
    pub include_pub_info: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenesetDetail {
    pub geneset: Geneset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gene_identifier_type: Option<GeneIdentifier>,
    pub geneset_values: Vec<GenesetValue>,
}

#[tracing::instrument(skip(store, user, query), fields(user_id = user.id))]
pub async fn handle<S>(
    store: &S,
    user: &UserRecord,
    geneset_id: i64,
    query: GetGenesetQuery,
) -> ServiceResult<GenesetDetail>
where
    S: GeneStore + GenesetStore + ?Sized,
{
    let mut geneset = readable_geneset(store, geneset_id, user).await?;
    let geneset_values = resolve_values(store, &geneset, query.gene_id_type, query.in_threshold).await?;
    geneset.publication = None;

    Ok(GenesetDetail {
        geneset,
        gene_identifier_type: query.gene_id_type,
        geneset_values,
    })
}

/// Geneset record without values.
pub async fn handle_metadata<S: GenesetStore + ?Sized>(
    store: &S,
    user: &UserRecord,
    geneset_id: i64,
    query: MetadataQuery,
) -> ServiceResult<Geneset> {
    let mut geneset = readable_geneset(store, geneset_id, user).await?;
    if !query.include_pub_info {
        geneset.publication = None;
    }
    Ok(geneset)
}

pub async fn handle_publication<S>(store: &S, user: &UserRecord, geneset_id: i64) -> ServiceResult<Publication>
where
    S: GenesetStore + PublicationStore + ?Sized,
{
    let geneset = readable_geneset(store, geneset_id, user).await?;
    let publication_id = geneset.publication_id.ok_or_else(|| {
        ServiceError::RecordNotFound(format!("Geneset '{}' has no publication", geneset_id))
    })?;

    store
        .publication_by_id(publication_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Publication", publication_id))
}
