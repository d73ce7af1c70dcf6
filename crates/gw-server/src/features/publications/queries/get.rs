use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};
use crate::features::shared::validate_pubmed_id;
use crate::store::{Publication, PublicationStore};

/// Query string of `GET /publications/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetPublicationQuery {
    /// Treat the path id as a PubMed id; defaults to true
    pub as_pubmed_id: Option<bool>,
}

#[tracing::instrument(skip(store))]
pub async fn handle<S: PublicationStore + ?Sized>(
    store: &S,
    id: &str,
    query: GetPublicationQuery,
) -> ServiceResult<Publication> {
    let id = id.trim();

    let found = if query.as_pubmed_id.unwrap_or(true) {
        validate_pubmed_id(id).map_err(ServiceError::validation)?;
        store.publication_by_pubmed_id(id).await?
    } else {
        let internal: i64 = id
            .parse()
            .map_err(|_| ServiceError::validation(format!("'{}' is not a publication id", id)))?;
        store.publication_by_id(internal).await?
    };

    found.ok_or_else(|| ServiceError::not_found("Publication", id))
}
