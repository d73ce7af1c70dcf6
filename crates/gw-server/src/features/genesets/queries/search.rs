use gw_common::types::Species;
use serde::{Deserialize, Serialize};

use super::list::{self, ListGenesetsQuery, ListGenesetsResponse};
use crate::error::{ServiceError, ServiceResult};
use crate::features::shared::validate_search_text;
use crate::store::{GenesetStore, UserRecord};

pub const MAX_SEARCH_TEXT_LENGTH: usize = 256;

/// Query string of `GET /genesets/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenesetSearchQuery {
    pub search_text: String,
    pub species: Option<Species>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Full-text search over the genesets visible to `caller`.
pub async fn handle<S: GenesetStore + ?Sized>(
    store: &S,
    caller: Option<&UserRecord>,
    query: GenesetSearchQuery,
) -> ServiceResult<ListGenesetsResponse> {
    validate_search_text(&query.search_text, MAX_SEARCH_TEXT_LENGTH)
        .map_err(|e| ServiceError::validation(e.to_string()))?;

    let list_query = ListGenesetsQuery {
        search_text: Some(query.search_text),
        species: query.species,
        with_publication_info: Some(false),
        limit: query.limit,
        offset: query.offset,
        ..ListGenesetsQuery::default()
    };
    list::handle(store, caller, list_query).await
}
