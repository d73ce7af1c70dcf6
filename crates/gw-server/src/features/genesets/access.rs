//! Which genesets a caller may see

use gw_common::types::GenesetTier;
use std::collections::BTreeSet;

use crate::error::{ServiceError, ServiceResult};
use crate::store::{Geneset, GenesetStore, UserRecord};

/// Filters derived from the caller and the requested scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessScope {
    /// `None` leaves tiers unfiltered
    pub curation_tiers: Option<BTreeSet<GenesetTier>>,
    pub owner: Option<i64>,
    pub readable_by: Option<i64>,
}

/// Anonymous callers only see public tiers and cannot ask for their own
/// genesets. Identified callers see what they can read, optionally only
/// what they own.
pub fn determine_access(
    caller: Option<&UserRecord>,
    requested_tiers: Option<&BTreeSet<GenesetTier>>,
    only_caller_owned: bool,
) -> ServiceResult<AccessScope> {
    let requested = requested_tiers.filter(|tiers| !tiers.is_empty());

    let Some(user) = caller else {
        if only_caller_owned {
            return Err(ServiceError::AccessForbidden);
        }
        let curation_tiers = match requested {
            None => GenesetTier::public(),
            Some(tiers) if tiers.len() == 1 && tiers.contains(&GenesetTier::Tier5) => {
                return Err(ServiceError::AccessForbidden);
            },
            Some(tiers) => tiers - &BTreeSet::from([GenesetTier::Tier5]),
        };
        return Ok(AccessScope {
            curation_tiers: Some(curation_tiers),
            owner: None,
            readable_by: None,
        });
    };

    Ok(AccessScope {
        curation_tiers: requested.cloned(),
        owner: only_caller_owned.then_some(user.id),
        readable_by: Some(user.id),
    })
}

/// The geneset if `user` may read it.
///
/// A missing geneset is `RecordNotFound`; one that exists but is not
/// readable is `InaccessibleOrForbidden`.
pub async fn readable_geneset<S: GenesetStore + ?Sized>(
    store: &S,
    geneset_id: i64,
    user: &UserRecord,
) -> ServiceResult<Geneset> {
    if let Some(geneset) = store.get_geneset(geneset_id, Some(user.id)).await? {
        return Ok(geneset);
    }

    if store.geneset_exists(geneset_id).await? {
        tracing::info!(geneset_id, user_id = user.id, "Geneset not readable by caller");
        Err(ServiceError::InaccessibleOrForbidden)
    } else {
        Err(ServiceError::not_found("Geneset", geneset_id))
    }
}
