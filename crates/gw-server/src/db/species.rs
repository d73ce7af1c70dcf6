//! Species metadata

use async_trait::async_trait;
use gw_common::types::{GeneIdentifier, Species};
use sqlx::{Postgres, QueryBuilder};

use super::{DbResult, PgStore};
use crate::store::{SpeciesFilter, SpeciesRecord, SpeciesStore};

#[derive(Debug, sqlx::FromRow)]
struct SpeciesRow {
    sp_id: i32,
    sp_name: String,
    sp_taxid: Option<i32>,
    sp_ref_gdb_id: Option<i32>,
}

impl SpeciesRow {
    /// `None` for rows outside the species vocabulary.
    fn into_record(self) -> Option<SpeciesRecord> {
        let species = match Species::try_from(self.sp_id) {
            Ok(species) => species,
            Err(e) => {
                tracing::warn!(sp_id = self.sp_id, error = %e, "Skipping unknown species");
                return None;
            },
        };

        Some(SpeciesRecord {
            id: species,
            name: self.sp_name,
            common_name: species.common_name(),
            taxonomy_id: self.sp_taxid,
            reference_gene_id_type: self
                .sp_ref_gdb_id
                .and_then(|code| GeneIdentifier::try_from(code).ok()),
        })
    }
}

#[async_trait]
impl SpeciesStore for PgStore {
    async fn list_species(&self, filter: &SpeciesFilter) -> DbResult<Vec<SpeciesRecord>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT sp_id, sp_name, sp_taxid, sp_ref_gdb_id FROM species WHERE sp_id > 0",
        );
        if let Some(taxonomy_id) = filter.taxonomy_id {
            query.push(" AND sp_taxid = ").push_bind(taxonomy_id);
        }
        if let Some(gene_id_type) = filter.reference_gene_id_type {
            query.push(" AND sp_ref_gdb_id = ").push_bind(gene_id_type.code());
        }
        query.push(" ORDER BY sp_id");

        let rows: Vec<SpeciesRow> = query.build_query_as().fetch_all(self.pool()).await?;
        Ok(rows.into_iter().filter_map(SpeciesRow::into_record).collect())
    }

    async fn species_by_id(&self, species: Species) -> DbResult<Option<SpeciesRecord>> {
        let row = sqlx::query_as::<_, SpeciesRow>(
            "SELECT sp_id, sp_name, sp_taxid, sp_ref_gdb_id FROM species WHERE sp_id = $1",
        )
        .bind(species.code())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.and_then(SpeciesRow::into_record))
    }
}
