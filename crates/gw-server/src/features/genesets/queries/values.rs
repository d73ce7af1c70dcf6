use gw_common::types::GeneIdentifier;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};
use crate::features::genesets::access::readable_geneset;
use crate::features::genesets::values::resolve_values;
use crate::store::{GeneStore, GenesetStore, GenesetValue, UserRecord};

/// Query string of `GET /genesets/:id/values`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenesetValuesQuery {
    pub gene_id_type: Option<GeneIdentifier>,
    pub in_threshold: Option<bool>,
}

#[tracing::instrument(skip(store, user, query), fields(user_id = user.id, gene_id_type = ?query.gene_id_type))]
pub async fn handle<S>(
    store: &S,
    user: &UserRecord,
    geneset_id: i64,
    query: GenesetValuesQuery,
) -> ServiceResult<Vec<GenesetValue>>
where
    S: GeneStore + GenesetStore + ?Sized,
{
    let geneset = readable_geneset(store, geneset_id, user).await?;
    let values = resolve_values(store, &geneset, query.gene_id_type, query.in_threshold).await?;

    if values.is_empty() {
        return Err(ServiceError::RecordNotFound(format!(
            "Geneset '{}' has no values for the requested filters",
            geneset_id
        )));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::memory::{sample_geneset, MemoryStore};
    use gw_common::types::{AppRole, GenesetTier, Species};

    fn user() -> UserRecord {
        UserRecord {
            id: 1,
            email: "a@example.org".into(),
            name: None,
            role: AppRole::User,
        }
    }

    #[tokio::test]
    async fn test_no_values_is_not_found() {
        let store = MemoryStore::new()
            .with_geneset(sample_geneset(5, 1, GenesetTier::Tier4, Species::MusMusculus))
            .with_value(5, 1, "Gnai3", 0.2, false);

        let query = GenesetValuesQuery {
            in_threshold: Some(true),
            ..GenesetValuesQuery::default()
        };
        let err = handle(&store, &user(), 5, query).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecordNotFound);

        let values = handle(&store, &user(), 5, GenesetValuesQuery::default()).await.unwrap();
        assert_eq!(values.len(), 1);
    }
}
