use gw_common::types::Species;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{SpeciesRecord, SpeciesStore};

/// Species by its numeric code. Codes outside the vocabulary are a
/// validation error, known codes without a row are not found.
pub async fn handle<S: SpeciesStore + ?Sized>(store: &S, code: i32) -> ServiceResult<SpeciesRecord> {
    let species = Species::try_from(code)?;
    store
        .species_by_id(species)
        .await?
        .ok_or_else(|| ServiceError::not_found("Species", code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_get_species() {
        let store = MemoryStore::new().with_species(Species::RattusNorvegicus, 10116, None);
        assert_eq!(handle(&store, 3).await.unwrap().taxonomy_id, Some(10116));
        assert_eq!(handle(&store, 1).await.unwrap_err().kind(), ErrorKind::RecordNotFound);
        assert_eq!(handle(&store, 7).await.unwrap_err().kind(), ErrorKind::ValidationError);
    }
}
