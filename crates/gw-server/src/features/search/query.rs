use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{ServiceError, ServiceResult};
use crate::features::genesets::queries::list::{self as geneset_list, ListGenesetsQuery};
use crate::features::shared::{validate_search_text, WindowParams};
use crate::store::{Geneset, GenesetStore, Publication, PublicationStore, TextSearch, UserRecord};

pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
pub const MAX_SEARCH_TEXT_LENGTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEntity {
    Genesets,
    Publications,
}

impl std::str::FromStr for SearchEntity {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "genesets" => Ok(SearchEntity::Genesets),
            "publications" => Ok(SearchEntity::Publications),
            other => Err(ServiceError::validation(format!("unknown search entity '{}'", other))),
        }
    }
}

/// Query string of `GET /search`. `entities` is comma separated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub entities: String,
    pub search_text: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genesets: Option<Vec<Geneset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<Publication>>,
}

impl SearchQuery {
    pub fn entities(&self) -> ServiceResult<BTreeSet<SearchEntity>> {
        let entities = self
            .entities
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<ServiceResult<BTreeSet<SearchEntity>>>()?;
        if entities.is_empty() {
            return Err(ServiceError::validation("at least one search entity is required"));
        }
        Ok(entities)
    }
}

#[tracing::instrument(skip(store, caller), fields(caller = ?caller.map(|u| u.id)))]
pub async fn handle<S>(store: &S, caller: Option<&UserRecord>, query: SearchQuery) -> ServiceResult<SearchResults>
where
    S: GenesetStore + PublicationStore + ?Sized,
{
    let entities = query.entities()?;
    validate_search_text(&query.search_text, MAX_SEARCH_TEXT_LENGTH)
        .map_err(|e| ServiceError::validation(e.to_string()))?;
    let window = WindowParams::new(query.limit, query.offset);
    window.validate().map_err(ServiceError::validation)?;

    let mut results = SearchResults::default();

    if entities.contains(&SearchEntity::Genesets) {
        let list_query = ListGenesetsQuery {
            search_text: Some(query.search_text.clone()),
            with_publication_info: Some(false),
            limit: Some(window.limit(DEFAULT_SEARCH_LIMIT)),
            offset: Some(window.offset()),
            ..ListGenesetsQuery::default()
        };
        results.genesets = Some(geneset_list::handle(store, caller, list_query).await?.items);
    }

    if entities.contains(&SearchEntity::Publications) {
        let search = TextSearch {
            text: query.search_text.trim().to_string(),
            limit: window.limit(DEFAULT_SEARCH_LIMIT),
            offset: window.offset(),
        };
        results.publications = Some(store.search_publications(&search).await?);
    }

    Ok(results)
}
