//! Gene, gene database and homology queries

use async_trait::async_trait;
use gw_common::types::{GeneIdentifier, Species};
use sqlx::{Postgres, QueryBuilder};

use super::{DbResult, PgStore};
use crate::store::{GeneDatabase, GeneFilter, GeneIdMapRow, GeneStore, Gene, HomologLookup, OdeHomolog};

#[derive(Debug, sqlx::FromRow)]
struct GeneRow {
    ode_gene_id: i64,
    ode_ref_id: String,
    gdb_id: i32,
    sp_id: i32,
    ode_pref: bool,
}

impl TryFrom<GeneRow> for Gene {
    type Error = super::DbError;

    fn try_from(row: GeneRow) -> Result<Self, Self::Error> {
        Ok(Gene {
            ode_gene_id: row.ode_gene_id,
            ode_ref_id: row.ode_ref_id,
            gene_database: GeneIdentifier::try_from(row.gdb_id)?,
            species: Species::from_affinity_code(row.sp_id)?,
            preferred: row.ode_pref,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GeneDatabaseRow {
    gdb_id: i32,
    gdb_name: String,
    sp_id: i32,
}

/// Mapping queries compare identifiers case-insensitively; callers align
/// the returned rows back to the ids they sent.
fn lowered(ids: &[String]) -> Vec<String> {
    ids.iter().map(|id| id.to_lowercase()).collect()
}

#[async_trait]
impl GeneStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn list_genes(&self, filter: &GeneFilter) -> DbResult<Vec<Gene>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT ode_gene_id::bigint AS ode_gene_id, ode_ref_id, gdb_id, sp_id, ode_pref FROM gene WHERE TRUE",
        );

        if let Some(reference_id) = &filter.reference_id {
            query.push(" AND ode_ref_id = ").push_bind(reference_id.clone());
        }
        if let Some(gene_database) = filter.gene_database {
            query.push(" AND gdb_id = ").push_bind(gene_database.code());
        }
        if let Some(species) = filter.species {
            query.push(" AND sp_id = ").push_bind(species.code());
        }
        if let Some(preferred) = filter.preferred {
            query.push(" AND ode_pref = ").push_bind(preferred);
        }

        query
            .push(" ORDER BY ode_gene_id, gdb_id, ode_ref_id LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows: Vec<GeneRow> = query.build_query_as().fetch_all(self.pool()).await?;
        rows.into_iter().map(Gene::try_from).collect()
    }

    #[tracing::instrument(skip(self, lookup), fields(ids = lookup.source_ids.len()))]
    async fn get_homolog_ids(&self, lookup: &HomologLookup) -> DbResult<Vec<GeneIdMapRow>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT DISTINCT src.ode_ref_id AS original_ref_id, tgt.ode_ref_id AS mapped_ref_id \
             FROM gene src \
             JOIN homology hs ON hs.ode_gene_id = src.ode_gene_id \
             JOIN homology ht ON ht.hom_id = hs.hom_id \
             JOIN gene tgt ON tgt.ode_gene_id = ht.ode_gene_id \
             WHERE lower(src.ode_ref_id) = ANY(",
        );
        query
            .push_bind(lowered(&lookup.source_ids))
            .push(") AND tgt.gdb_id = ")
            .push_bind(lookup.target_gene_id_type.code());

        if let Some(source_type) = lookup.source_gene_id_type {
            query.push(" AND src.gdb_id = ").push_bind(source_type.code());
        }
        if let Some(source_species) = lookup.source_species {
            query.push(" AND src.sp_id = ").push_bind(source_species.code());
        }
        if let Some(target_species) = lookup.target_species {
            query.push(" AND tgt.sp_id = ").push_bind(target_species.code());
        }
        query.push(" ORDER BY original_ref_id, mapped_ref_id");

        Ok(query.build_query_as().fetch_all(self.pool()).await?)
    }

    #[tracing::instrument(skip(self, source_ids), fields(ids = source_ids.len()))]
    async fn mapping(
        &self,
        source_ids: &[String],
        species: Species,
        target: GeneIdentifier,
    ) -> DbResult<Vec<GeneIdMapRow>> {
        let rows = sqlx::query_as::<_, GeneIdMapRow>(
            r#"
            SELECT DISTINCT src.ode_ref_id AS original_ref_id, tgt.ode_ref_id AS mapped_ref_id
            FROM gene src
            JOIN gene tgt ON tgt.ode_gene_id = src.ode_gene_id
            WHERE lower(src.ode_ref_id) = ANY($1)
              AND src.sp_id = $2
              AND tgt.gdb_id = $3
            ORDER BY original_ref_id, mapped_ref_id
            "#,
        )
        .bind(lowered(source_ids))
        .bind(species.code())
        .bind(target.code())
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self, source_ids), fields(ids = source_ids.len()))]
    async fn aon_mapping(&self, source_ids: &[String], species: Species) -> DbResult<Vec<GeneIdMapRow>> {
        let rows = sqlx::query_as::<_, GeneIdMapRow>(
            r#"
            SELECT DISTINCT src.ode_ref_id AS original_ref_id, tgt.ode_ref_id AS mapped_ref_id
            FROM gene src
            JOIN species sp ON sp.sp_id = src.sp_id
            JOIN gene tgt ON tgt.ode_gene_id = src.ode_gene_id
            WHERE lower(src.ode_ref_id) = ANY($1)
              AND src.sp_id = $2
              AND tgt.gdb_id = sp.sp_ref_gdb_id
            ORDER BY original_ref_id, mapped_ref_id
            "#,
        )
        .bind(lowered(source_ids))
        .bind(species.code())
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    async fn gene_database_by_id(&self, id: GeneIdentifier) -> DbResult<Option<GeneDatabase>> {
        let row = sqlx::query_as::<_, GeneDatabaseRow>(
            "SELECT gdb_id, gdb_name, sp_id FROM genedb WHERE gdb_id = $1",
        )
        .bind(id.code())
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| -> DbResult<GeneDatabase> {
            Ok(GeneDatabase {
                id: GeneIdentifier::try_from(row.gdb_id)?,
                name: row.gdb_name,
                species: Species::from_affinity_code(row.sp_id)?,
            })
        })
        .transpose()
    }

    #[tracing::instrument(skip(self, ode_ids), fields(ids = ode_ids.len()))]
    async fn get_homolog_ids_by_ode_id(
        &self,
        ode_ids: &[i64],
        target: GeneIdentifier,
    ) -> DbResult<Vec<OdeHomolog>> {
        let rows = sqlx::query_as::<_, OdeHomolog>(
            r#"
            SELECT DISTINCT ON (hs.ode_gene_id) hs.ode_gene_id::bigint AS ode_gene_id, tgt.ode_ref_id
            FROM homology hs
            JOIN homology ht ON ht.hom_id = hs.hom_id
            JOIN gene tgt ON tgt.ode_gene_id = ht.ode_gene_id
            WHERE hs.ode_gene_id = ANY($1)
              AND tgt.gdb_id = $2
            ORDER BY hs.ode_gene_id, tgt.ode_pref DESC, tgt.ode_ref_id
            "#,
        )
        .bind(ode_ids)
        .bind(target.code())
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }
}
