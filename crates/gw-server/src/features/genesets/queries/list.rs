use chrono::NaiveDate;
use gw_common::types::{GeneIdentifier, GenesetTier, ScoreType, Species};
use gw_common::GwError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::api::response::WindowMeta;
use crate::error::{ServiceError, ServiceResult};
use crate::features::genesets::access::determine_access;
use crate::features::shared::WindowParams;
use crate::store::{Geneset, GenesetFilter, GenesetStore, UserRecord};

pub const DEFAULT_GENESET_LIMIT: i64 = 10;

/// Query string of `GET /genesets`.
///
/// `curation_tier` and `score_type` may repeat and may hold comma-separated
/// codes, so `curation_tier=1&curation_tier=2,3` asks for tiers 1 to 3.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListGenesetsQuery {
    pub gs_id: Option<i64>,
    #[serde(default)]
    pub only_my_genesets: bool,
    #[serde(default)]
    pub curation_tier: Vec<String>,
    pub species: Option<Species>,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub publication_id: Option<i64>,
    pub pubmed_id: Option<String>,
    pub gene_id_type: Option<GeneIdentifier>,
    pub ontology_term: Option<String>,
    pub search_text: Option<String>,
    pub with_publication_info: Option<bool>,
    #[serde(default)]
    pub score_type: Vec<String>,
    pub size_less_than: Option<i32>,
    pub size_greater_than: Option<i32>,
    pub created_after: Option<NaiveDate>,
    pub created_before: Option<NaiveDate>,
    pub updated_after: Option<NaiveDate>,
    pub updated_before: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListGenesetsResponse {
    pub items: Vec<Geneset>,
    pub window: WindowMeta,
}

/// `["1, 3", "4"]` -> `{1, 3, 4}` in the target vocabulary
pub fn parse_codes<T>(values: &[String]) -> ServiceResult<BTreeSet<T>>
where
    T: TryFrom<i32, Error = GwError> + Ord,
{
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| -> ServiceResult<T> {
            let code: i32 = part
                .parse()
                .map_err(|_| ServiceError::validation(format!("'{}' is not a numeric code", part)))?;
            Ok(T::try_from(code)?)
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ListGenesetsQuery {
    fn into_filter(self, caller: Option<&UserRecord>) -> ServiceResult<GenesetFilter> {
        let window = WindowParams::new(self.limit, self.offset);
        window.validate().map_err(ServiceError::validation)?;

        let requested_tiers = parse_codes::<GenesetTier>(&self.curation_tier)?;
        let score_types = Some(parse_codes::<ScoreType>(&self.score_type)?)
            .filter(|types| !types.is_empty())
            .map(|types| types.into_iter().collect());

        let scope = determine_access(caller, Some(&requested_tiers), self.only_my_genesets)?;

        Ok(GenesetFilter {
            gs_id: self.gs_id,
            owner: scope.owner,
            readable_by: scope.readable_by,
            curation_tiers: scope.curation_tiers,
            species: self.species,
            name: non_blank(self.name),
            abbreviation: non_blank(self.abbreviation),
            publication_id: self.publication_id,
            pubmed_id: non_blank(self.pubmed_id),
            gene_id_type: self.gene_id_type,
            search_text: non_blank(self.search_text),
            ontology_term: non_blank(self.ontology_term),
            score_types,
            lte_count: self.size_less_than,
            gte_count: self.size_greater_than,
            created_after: self.created_after,
            created_before: self.created_before,
            updated_after: self.updated_after,
            updated_before: self.updated_before,
            with_publication_info: self.with_publication_info.unwrap_or(true),
            limit: window.limit(DEFAULT_GENESET_LIMIT),
            offset: window.offset(),
        })
    }
}

#[tracing::instrument(skip(store, query, caller), fields(caller = ?caller.map(|u| u.id)))]
pub async fn handle<S: GenesetStore + ?Sized>(
    store: &S,
    caller: Option<&UserRecord>,
    query: ListGenesetsQuery,
) -> ServiceResult<ListGenesetsResponse> {
    let filter = query.into_filter(caller)?;
    let items = store.list_genesets(&filter).await?;

    tracing::debug!(count = items.len(), "Genesets listed");

    Ok(ListGenesetsResponse {
        window: WindowMeta {
            limit: filter.limit,
            offset: filter.offset,
            count: items.len(),
        },
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::memory::{sample_geneset, MemoryStore};
    use gw_common::types::AppRole;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_geneset(sample_geneset(1, 10, GenesetTier::Tier1, Species::MusMusculus))
            .with_geneset(sample_geneset(2, 10, GenesetTier::Tier5, Species::MusMusculus))
            .with_geneset(sample_geneset(3, 11, GenesetTier::Tier5, Species::HomoSapiens))
            .with_geneset(sample_geneset(4, 11, GenesetTier::Tier3, Species::HomoSapiens))
    }

    fn user(id: i64) -> UserRecord {
        UserRecord {
            id,
            email: format!("u{}@example.org", id),
            name: None,
            role: AppRole::User,
        }
    }

    fn ids(response: &ListGenesetsResponse) -> Vec<i64> {
        response.items.iter().map(|g| g.id).collect()
    }

    #[test]
    fn test_parse_codes() {
        let tiers = parse_codes::<GenesetTier>(&["1, 3,".to_string(), "4".to_string()]).unwrap();
        assert_eq!(
            tiers,
            BTreeSet::from([GenesetTier::Tier1, GenesetTier::Tier3, GenesetTier::Tier4])
        );
        assert!(parse_codes::<GenesetTier>(&[]).unwrap().is_empty());
        assert!(parse_codes::<GenesetTier>(&["6".to_string()]).is_err());
        assert!(parse_codes::<ScoreType>(&["pvalue".to_string()]).is_err());
    }

    #[tokio::test]
    async fn test_anonymous_sees_public_tiers_only() {
        let response = handle(&store(), None, ListGenesetsQuery::default()).await.unwrap();
        assert_eq!(ids(&response), vec![1, 4]);
        assert_eq!(response.window.limit, DEFAULT_GENESET_LIMIT);
    }

    #[tokio::test]
    async fn test_anonymous_tier_five_only_is_forbidden() {
        let query = ListGenesetsQuery {
            curation_tier: vec!["5".into()],
            ..ListGenesetsQuery::default()
        };
        let err = handle(&store(), None, query).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessForbidden);
    }

    #[tokio::test]
    async fn test_caller_sees_own_private_genesets() {
        let caller = user(10);
        let response = handle(&store(), Some(&caller), ListGenesetsQuery::default()).await.unwrap();
        assert_eq!(ids(&response), vec![1, 2, 4]);

        let query = ListGenesetsQuery {
            only_my_genesets: true,
            ..ListGenesetsQuery::default()
        };
        let response = handle(&store(), Some(&caller), query).await.unwrap();
        assert_eq!(ids(&response), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_filters_and_window() {
        let caller = user(11);
        let query = ListGenesetsQuery {
            species: Some(Species::HomoSapiens),
            limit: Some(1),
            offset: Some(1),
            ..ListGenesetsQuery::default()
        };
        let response = handle(&store(), Some(&caller), query).await.unwrap();
        assert_eq!(ids(&response), vec![4]);
        assert_eq!(response.window.offset, 1);
    }

    #[tokio::test]
    async fn test_invalid_score_type() {
        let query = ListGenesetsQuery {
            score_type: vec!["9".into()],
            ..ListGenesetsQuery::default()
        };
        let err = handle(&store(), None, query).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }
}
