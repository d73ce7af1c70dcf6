use serde::{Deserialize, Serialize};

use crate::db::DbError;
use crate::error::ServiceError;
use crate::features::shared::validate_pubmed_id;
use crate::pubmed::{PubmedClient, PubmedError};
use crate::store::PublicationStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPubmedResponse {
    pub pubmed_id: String,
    pub pub_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AddPubmedError {
    #[error("Invalid PubMed id: {0}")]
    InvalidId(&'static str),
    #[error("Publication with PubMed id '{0}' already exists")]
    AlreadyExists(String),
    #[error(transparent)]
    Pubmed(#[from] PubmedError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<AddPubmedError> for ServiceError {
    fn from(err: AddPubmedError) -> Self {
        match err {
            AddPubmedError::InvalidId(_) => ServiceError::validation(err.to_string()),
            AddPubmedError::AlreadyExists(_) => ServiceError::RecordExists(err.to_string()),
            AddPubmedError::Pubmed(PubmedError::NotFound(id)) => ServiceError::not_found("PubMed record", id),
            AddPubmedError::Pubmed(e) => ServiceError::External(e.to_string()),
            AddPubmedError::Database(e) => ServiceError::from(e),
        }
    }
}

/// Fetches a PubMed record and stores it as a publication.
#[tracing::instrument(skip(store, pubmed))]
pub async fn handle<S, P>(store: &S, pubmed: &P, pubmed_id: &str) -> Result<AddPubmedResponse, AddPubmedError>
where
    S: PublicationStore + ?Sized,
    P: PubmedClient + ?Sized,
{
    let pubmed_id = pubmed_id.trim();
    validate_pubmed_id(pubmed_id).map_err(AddPubmedError::InvalidId)?;

    if store.publication_by_pubmed_id(pubmed_id).await?.is_some() {
        return Err(AddPubmedError::AlreadyExists(pubmed_id.to_string()));
    }

    let mut publication = pubmed.fetch(pubmed_id).await?;
    publication.pubmed_id = Some(pubmed_id.to_string());

    let pub_id = match store.add_publication(&publication).await {
        Ok(id) => id,
        Err(DbError::Duplicate(_)) => return Err(AddPubmedError::AlreadyExists(pubmed_id.to_string())),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(pub_id, "Publication imported from PubMed");

    Ok(AddPubmedResponse {
        pubmed_id: pubmed_id.to_string(),
        pub_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::memory::MemoryStore;
    use crate::store::NewPublication;
    use async_trait::async_trait;

    struct StaticPubmed;

    #[async_trait]
    impl PubmedClient for StaticPubmed {
        async fn fetch(&self, pubmed_id: &str) -> Result<NewPublication, PubmedError> {
            match pubmed_id {
                "404" => Err(PubmedError::NotFound(pubmed_id.to_string())),
                "500" => Err(PubmedError::Status(500)),
                _ => Ok(NewPublication {
                    title: Some("Imported".into()),
                    ..NewPublication::default()
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_imports_new_record() {
        let store = MemoryStore::new().with_publication(1, "100", "Existing");
        let response = handle(&store, &StaticPubmed, "19958391").await.unwrap();
        assert_eq!(response, AddPubmedResponse {
            pubmed_id: "19958391".into(),
            pub_id: 2,
        });
        assert_eq!(store.publication_count(), 2);
    }

    #[tokio::test]
    async fn test_existing_record_is_conflict() {
        let store = MemoryStore::new().with_publication(1, "100", "Existing");
        let err = handle(&store, &StaticPubmed, "100").await.unwrap_err();
        assert_eq!(ServiceError::from(err).kind(), ErrorKind::RecordExists);
        assert_eq!(store.publication_count(), 1);
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let store = MemoryStore::new();
        let kind = |err: AddPubmedError| ServiceError::from(err).kind();

        assert_eq!(kind(handle(&store, &StaticPubmed, "12a").await.unwrap_err()), ErrorKind::ValidationError);
        assert_eq!(kind(handle(&store, &StaticPubmed, "404").await.unwrap_err()), ErrorKind::RecordNotFound);
        assert_eq!(kind(handle(&store, &StaticPubmed, "500").await.unwrap_err()), ErrorKind::ExternalServiceError);
        assert_eq!(store.publication_count(), 0);
    }
}
