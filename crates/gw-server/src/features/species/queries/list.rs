use gw_common::types::GeneIdentifier;
use serde::{Deserialize, Serialize};

use crate::error::ServiceResult;
use crate::store::{SpeciesFilter, SpeciesRecord, SpeciesStore};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSpeciesQuery {
    pub taxonomy_id: Option<i32>,
    pub reference_gene_id_type: Option<GeneIdentifier>,
}

pub async fn handle<S: SpeciesStore + ?Sized>(store: &S, query: ListSpeciesQuery) -> ServiceResult<Vec<SpeciesRecord>> {
    let filter = SpeciesFilter {
        taxonomy_id: query.taxonomy_id,
        reference_gene_id_type: query.reference_gene_id_type,
    };
    Ok(store.list_species(&filter).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_common::types::Species;
    use crate::store::memory::MemoryStore;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_species(Species::MusMusculus, 10090, Some(GeneIdentifier::Mgi))
            .with_species(Species::HomoSapiens, 9606, Some(GeneIdentifier::Hgnc))
    }

    #[tokio::test]
    async fn test_filters() {
        let all = handle(&store(), ListSpeciesQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let human = handle(&store(), ListSpeciesQuery {
            taxonomy_id: Some(9606),
            ..ListSpeciesQuery::default()
        })
        .await
        .unwrap();
        assert_eq!(human[0].id, Species::HomoSapiens);

        let mgi = handle(&store(), ListSpeciesQuery {
            reference_gene_id_type: Some(GeneIdentifier::Mgi),
            ..ListSpeciesQuery::default()
        })
        .await
        .unwrap();
        assert_eq!(mgi.len(), 1);
        assert_eq!(mgi[0].common_name, "mouse");
    }
}
