use gw_common::types::{GeneIdentifier, Species};
use serde::{Deserialize, Serialize};

use crate::api::response::WindowMeta;
use crate::error::{ServiceError, ServiceResult};
use crate::features::shared::WindowParams;
use crate::store::{Gene, GeneFilter, GeneStore};

pub const DEFAULT_GENE_LIMIT: i64 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListGenesQuery {
    pub reference_id: Option<String>,
    pub gene_database: Option<GeneIdentifier>,
    pub species: Option<Species>,
    pub preferred: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListGenesResponse {
    pub items: Vec<Gene>,
    pub window: WindowMeta,
}

#[tracing::instrument(skip(store))]
pub async fn handle<S: GeneStore + ?Sized>(store: &S, query: ListGenesQuery) -> ServiceResult<ListGenesResponse> {
    let window = WindowParams::new(query.limit, query.offset);
    window.validate().map_err(ServiceError::validation)?;

    let filter = GeneFilter {
        reference_id: query.reference_id,
        gene_database: query.gene_database,
        species: query.species,
        preferred: query.preferred,
        limit: window.limit(DEFAULT_GENE_LIMIT),
        offset: window.offset(),
    };
    let items = store.list_genes(&filter).await?;
    let window = window.meta(DEFAULT_GENE_LIMIT, items.len());

    Ok(ListGenesResponse { items, window })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_list_filters_and_windows() {
        let store = MemoryStore::new()
            .with_gene(1, "Gnai3", GeneIdentifier::GeneSymbol, Species::MusMusculus, None)
            .with_gene(2, "Pbsn", GeneIdentifier::GeneSymbol, Species::MusMusculus, None)
            .with_gene(3, "TP53", GeneIdentifier::GeneSymbol, Species::HomoSapiens, None);

        let response = handle(
            &store,
            ListGenesQuery {
                species: Some(Species::MusMusculus),
                limit: Some(1),
                offset: Some(1),
                ..ListGenesQuery::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].ode_ref_id, "Pbsn");
        assert_eq!(response.window.limit, 1);
        assert_eq!(response.window.offset, 1);
    }

    #[tokio::test]
    async fn test_default_limit() {
        let response = handle(&MemoryStore::new(), ListGenesQuery::default()).await.unwrap();
        assert_eq!(response.window.limit, DEFAULT_GENE_LIMIT);
    }

    #[tokio::test]
    async fn test_invalid_limit() {
        let query = ListGenesQuery {
            limit: Some(0),
            ..ListGenesQuery::default()
        };
        assert!(handle(&MemoryStore::new(), query).await.is_err());
    }
}
