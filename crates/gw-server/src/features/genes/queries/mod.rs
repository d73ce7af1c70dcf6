pub mod homologs;
pub mod list;
pub mod mapping;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::store::GeneIdMapRow;

pub use homologs::HomologMappingQuery;
pub use list::ListGenesQuery;
pub use mapping::{GeneMappingQuery, ReferenceMappingQuery};

/// Identifiers mapped from one source identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneIdMapping {
    pub source_id: String,
    /// Empty when the source identifier has no mapping
    pub mapped_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneIdMappingResponse {
    pub ids_map: Vec<GeneIdMapping>,
}

/// One entry per source id, in request order.
///
/// Rows whose original id equals the source id are used when present;
/// otherwise the rows matching it after lowercasing are used, folded the
/// same way the database folds ids.
pub fn align_to_sources(source_ids: &[String], rows: &[GeneIdMapRow]) -> GeneIdMappingResponse {
    let mut exact: HashMap<&str, Vec<&GeneIdMapRow>> = HashMap::with_capacity(rows.len());
    let mut folded: HashMap<String, Vec<&GeneIdMapRow>> = HashMap::with_capacity(rows.len());
    for row in rows {
        exact.entry(row.original_ref_id.as_str()).or_default().push(row);
        folded.entry(row.original_ref_id.to_lowercase()).or_default().push(row);
    }

    let ids_map = source_ids
        .iter()
        .map(|source_id| {
            let matched = exact
                .get(source_id.as_str())
                .or_else(|| folded.get(&source_id.to_lowercase()))
                .map(Vec::as_slice)
                .unwrap_or_default();

            let mut seen: HashSet<&str> = HashSet::with_capacity(matched.len());
            let mapped_ids = matched
                .iter()
                .copied()
                .filter(|row| seen.insert(row.mapped_ref_id.as_str()))
                .map(|row| row.mapped_ref_id.clone())
                .collect();

            GeneIdMapping {
                source_id: source_id.clone(),
                mapped_ids,
            }
        })
        .collect();

    GeneIdMappingResponse { ids_map }
}
