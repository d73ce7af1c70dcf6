use serde::{Deserialize, Serialize};

use crate::api::response::WindowMeta;
use crate::error::{ServiceError, ServiceResult};
use crate::features::genesets::access::readable_geneset;
use crate::features::shared::WindowParams;
use crate::store::{GenesetStore, OntologyStore, OntologyTerm, UserRecord};

pub const DEFAULT_TERM_LIMIT: i64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenesetTermsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn handle<S>(
    store: &S,
    user: &UserRecord,
    geneset_id: i64,
    query: GenesetTermsQuery,
) -> ServiceResult<(Vec<OntologyTerm>, WindowMeta)>
where
    S: GenesetStore + OntologyStore + ?Sized,
{
    let window = WindowParams::new(query.limit, query.offset);
    window.validate().map_err(ServiceError::validation)?;

    readable_geneset(store, geneset_id, user).await?;
    let terms = store
        .geneset_terms(geneset_id, window.limit(DEFAULT_TERM_LIMIT), window.offset())
        .await?;
    let meta = window.meta(DEFAULT_TERM_LIMIT, terms.len());
    Ok((terms, meta))
}
