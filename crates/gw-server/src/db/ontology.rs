//! Ontology terms attached to genesets

use async_trait::async_trait;

use super::{map_unique_violation, DbResult, PgStore};
use crate::store::{OntologyStore, OntologyTerm};

#[derive(Debug, sqlx::FromRow)]
struct TermRow {
    onto_id: i64,
    onto_ref_term_id: String,
    onto_name: String,
    onto_description: Option<String>,
    ontdb_name: Option<String>,
    gso_ref_type: Option<String>,
}

impl From<TermRow> for OntologyTerm {
    fn from(row: TermRow) -> Self {
        Self {
            ontology_id: row.onto_id,
            ref_id: row.onto_ref_term_id,
            name: row.onto_name,
            description: row.onto_description,
            ontology_db: row.ontdb_name,
            reference_type: row.gso_ref_type,
        }
    }
}

#[async_trait]
impl OntologyStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn geneset_terms(&self, geneset_id: i64, limit: i64, offset: i64) -> DbResult<Vec<OntologyTerm>> {
        let rows = sqlx::query_as::<_, TermRow>(
            r#"
            SELECT o.onto_id::bigint AS onto_id, o.onto_ref_term_id, o.onto_name, o.onto_description,
                   odb.ontdb_name, gso.gso_ref_type
            FROM geneset_ontology gso
            JOIN ontology o ON o.onto_id = gso.onto_id
            LEFT JOIN ontologydb odb ON odb.ontdb_id = o.ontdb_id
            WHERE gso.gs_id = $1
            ORDER BY o.onto_ref_term_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(geneset_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(OntologyTerm::from).collect())
    }

    async fn term_by_ref_id(&self, ref_id: &str) -> DbResult<Option<OntologyTerm>> {
        let row = sqlx::query_as::<_, TermRow>(
            r#"
            SELECT o.onto_id::bigint AS onto_id, o.onto_ref_term_id, o.onto_name, o.onto_description,
                   odb.ontdb_name, NULL::text AS gso_ref_type
            FROM ontology o
            LEFT JOIN ontologydb odb ON odb.ontdb_id = o.ontdb_id
            WHERE o.onto_ref_term_id = $1
            "#,
        )
        .bind(ref_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(OntologyTerm::from))
    }

    #[tracing::instrument(skip(self))]
    async fn add_geneset_term(&self, geneset_id: i64, ontology_id: i64, reference_type: &str) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO geneset_ontology (gs_id, onto_id, gso_ref_type)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (
                SELECT 1 FROM geneset_ontology WHERE gs_id = $1 AND onto_id = $2
            )
            "#,
        )
        .bind(geneset_id)
        .bind(ontology_id)
        .bind(reference_type)
        .execute(self.pool())
        .await
        .map_err(|e| map_unique_violation(e, "Ontology term association", &ontology_id.to_string()))?;

        // No unique index is guaranteed on the association table
        if result.rows_affected() == 0 {
            return Err(super::DbError::duplicate(
                "Ontology term association",
                &ontology_id.to_string(),
            ));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_geneset_term(&self, geneset_id: i64, ontology_id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM geneset_ontology WHERE gs_id = $1 AND onto_id = $2")
            .bind(geneset_id)
            .bind(ontology_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
