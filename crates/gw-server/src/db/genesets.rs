//! Geneset and geneset value queries

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use gw_common::types::{GeneIdentifier, GenesetScoreType, GenesetTier, Species};
use sqlx::{Postgres, QueryBuilder};

use super::{DbError, DbResult, PgStore};
use crate::store::{Geneset, GenesetFilter, GenesetStore, GenesetValue, NewPublication, Publication};

const GENESET_COLUMNS: &str = "gs.gs_id::bigint AS gs_id, gs.usr_id::bigint AS usr_id, gs.cur_id, gs.sp_id, \
     gs.gs_name, gs.gs_abbreviation, gs.gs_description, gs.pub_id::bigint AS pub_id, \
     gs.gs_threshold_type, gs.gs_threshold, gs.gs_count, gs.gs_gene_id_type, gs.gs_status, \
     gs.gs_created, gs.gs_updated, \
     p.pub_pubmed, p.pub_title, p.pub_authors, p.pub_abstract, p.pub_journal, \
     p.pub_volume, p.pub_pages, p.pub_month, p.pub_year";

/// Deleted genesets are never returned.
const NOT_DELETED: &str = "gs.gs_status NOT LIKE 'de%'";

#[derive(Debug, sqlx::FromRow)]
struct GenesetRow {
    gs_id: i64,
    usr_id: i64,
    cur_id: Option<i32>,
    sp_id: i32,
    gs_name: String,
    gs_abbreviation: String,
    gs_description: Option<String>,
    pub_id: Option<i64>,
    gs_threshold_type: i32,
    gs_threshold: Option<String>,
    gs_count: i32,
    gs_gene_id_type: i32,
    gs_status: String,
    gs_created: Option<NaiveDate>,
    gs_updated: Option<NaiveDateTime>,
    pub_pubmed: Option<String>,
    pub_title: Option<String>,
    pub_authors: Option<String>,
    pub_abstract: Option<String>,
    pub_journal: Option<String>,
    pub_volume: Option<String>,
    pub_pages: Option<String>,
    pub_month: Option<String>,
    pub_year: Option<String>,
}

impl GenesetRow {
    fn into_geneset(self, with_publication: bool) -> DbResult<Geneset> {
        let publication = match (with_publication, self.pub_id) {
            (true, Some(id)) => Some(Publication {
                id,
                details: NewPublication {
                    pubmed_id: self.pub_pubmed,
                    title: self.pub_title,
                    authors: self.pub_authors,
                    abstract_text: self.pub_abstract,
                    journal: self.pub_journal,
                    volume: self.pub_volume,
                    pages: self.pub_pages,
                    month: self.pub_month,
                    year: self.pub_year,
                },
            }),
            _ => None,
        };

        Ok(Geneset {
            id: self.gs_id,
            user_id: self.usr_id,
            curation_tier: self.cur_id.map(GenesetTier::try_from).transpose()?,
            species: Species::from_affinity_code(self.sp_id)?,
            name: self.gs_name,
            abbreviation: self.gs_abbreviation,
            description: self.gs_description,
            publication_id: self.pub_id,
            score: GenesetScoreType::from_stored(self.gs_threshold_type, self.gs_threshold.as_deref())?,
            count: self.gs_count,
            gene_id_type: self.gs_gene_id_type,
            status: self.gs_status,
            created: self.gs_created,
            updated: self.gs_updated,
            publication,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ValueRow {
    ode_gene_id: i64,
    ode_ref_id: Option<String>,
    gsv_value: f64,
    gsv_in_threshold: bool,
}

fn select_genesets() -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query
        .push(GENESET_COLUMNS)
        .push(" FROM geneset gs LEFT JOIN publication p ON p.pub_id = gs.pub_id WHERE ")
        .push(NOT_DELETED);
    query
}

/// Owner, public tier, shared group or administrator.
fn push_readable_by(query: &mut QueryBuilder<'_, Postgres>, user_id: i64) {
    query
        .push(" AND (gs.usr_id = ")
        .push_bind(user_id)
        .push(" OR gs.cur_id < ")
        .push_bind(GenesetTier::Tier5.code())
        .push(
            " OR EXISTS (SELECT 1 FROM usr2grp ug WHERE ug.usr_id = ",
        )
        .push_bind(user_id)
        .push(
            " AND ug.grp_id::text = ANY(string_to_array(gs.gs_groups, ',')))\
             OR EXISTS (SELECT 1 FROM usr u WHERE u.usr_id = ",
        )
        .push_bind(user_id)
        .push(" AND u.usr_admin > 1))");
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &GenesetFilter) {
    if let Some(gs_id) = filter.gs_id {
        query.push(" AND gs.gs_id = ").push_bind(gs_id);
    }
    if let Some(owner) = filter.owner {
        query.push(" AND gs.usr_id = ").push_bind(owner);
    }
    if let Some(user_id) = filter.readable_by {
        push_readable_by(query, user_id);
    }
    if let Some(tiers) = &filter.curation_tiers {
        let codes: Vec<i32> = tiers.iter().map(|tier| tier.code()).collect();
        query.push(" AND gs.cur_id = ANY(").push_bind(codes).push(")");
    }
    if let Some(species) = filter.species {
        query.push(" AND gs.sp_id = ").push_bind(species.code());
    }
    if let Some(name) = &filter.name {
        query.push(" AND gs.gs_name = ").push_bind(name.clone());
    }
    if let Some(abbreviation) = &filter.abbreviation {
        query.push(" AND gs.gs_abbreviation = ").push_bind(abbreviation.clone());
    }
    if let Some(publication_id) = filter.publication_id {
        query.push(" AND gs.pub_id = ").push_bind(publication_id);
    }
    if let Some(pubmed_id) = &filter.pubmed_id {
        query.push(" AND p.pub_pubmed = ").push_bind(pubmed_id.clone());
    }
    if let Some(gene_id_type) = filter.gene_id_type {
        query.push(" AND gs.gs_gene_id_type = ").push_bind(gene_id_type.code());
    }
    if let Some(text) = &filter.search_text {
        query
            .push(" AND gs._searchtext @@ plainto_tsquery('english', ")
            .push_bind(text.clone())
            .push(")");
    }
    if let Some(term) = &filter.ontology_term {
        query
            .push(
                " AND EXISTS (SELECT 1 FROM geneset_ontology gso \
                 JOIN ontology o ON o.onto_id = gso.onto_id \
                 WHERE gso.gs_id = gs.gs_id AND o.onto_ref_term_id = ",
            )
            .push_bind(term.clone())
            .push(")");
    }
    if let Some(score_types) = &filter.score_types {
        let codes: Vec<i32> = score_types.iter().map(|score| score.code()).collect();
        query.push(" AND gs.gs_threshold_type = ANY(").push_bind(codes).push(")");
    }
    if let Some(count) = filter.lte_count {
        query.push(" AND gs.gs_count <= ").push_bind(count);
    }
    if let Some(count) = filter.gte_count {
        query.push(" AND gs.gs_count >= ").push_bind(count);
    }
    if let Some(date) = filter.created_after {
        query.push(" AND gs.gs_created >= ").push_bind(date);
    }
    if let Some(date) = filter.created_before {
        query.push(" AND gs.gs_created <= ").push_bind(date);
    }
    if let Some(date) = filter.updated_after {
        query.push(" AND gs.gs_updated::date >= ").push_bind(date);
    }
    if let Some(date) = filter.updated_before {
        query.push(" AND gs.gs_updated::date <= ").push_bind(date);
    }
}

#[async_trait]
impl GenesetStore for PgStore {
    #[tracing::instrument(skip(self, filter), fields(limit = filter.limit, offset = filter.offset))]
    async fn list_genesets(&self, filter: &GenesetFilter) -> DbResult<Vec<Geneset>> {
        let mut query = select_genesets();
        push_filters(&mut query, filter);
        query
            .push(" ORDER BY gs.gs_id LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows: Vec<GenesetRow> = query.build_query_as().fetch_all(self.pool()).await?;
        rows.into_iter()
            .map(|row| row.into_geneset(filter.with_publication_info))
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn get_geneset(&self, id: i64, readable_by: Option<i64>) -> DbResult<Option<Geneset>> {
        let mut query = select_genesets();
        query.push(" AND gs.gs_id = ").push_bind(id);
        if let Some(user_id) = readable_by {
            push_readable_by(&mut query, user_id);
        }

        let row: Option<GenesetRow> = query.build_query_as().fetch_optional(self.pool()).await?;
        row.map(|row| row.into_geneset(true)).transpose()
    }

    async fn geneset_exists(&self, id: i64) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM geneset gs WHERE gs.gs_id = $1 AND gs.gs_status NOT LIKE 'de%')",
        )
        .bind(id)
        .fetch_one(self.pool())
        .await?;
        Ok(exists)
    }

    #[tracing::instrument(skip(self))]
    async fn geneset_values(
        &self,
        geneset_id: i64,
        gene_id_type: Option<GeneIdentifier>,
        in_threshold: Option<bool>,
    ) -> DbResult<Vec<GenesetValue>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("");
        match gene_id_type {
            // Identifiers exactly as uploaded
            None => {
                query.push(
                    "SELECT gsv.ode_gene_id::bigint AS ode_gene_id, gsv.gsv_source_list[1] AS ode_ref_id, \
                     gsv.gsv_value::float8 AS gsv_value, gsv.gsv_in_threshold \
                     FROM geneset_value gsv WHERE gsv.gs_id = ",
                );
                query.push_bind(geneset_id);
            },
            Some(gene_id_type) => {
                query.push(
                    "SELECT DISTINCT ON (gsv.ode_gene_id) gsv.ode_gene_id::bigint AS ode_gene_id, \
                     g.ode_ref_id, gsv.gsv_value::float8 AS gsv_value, gsv.gsv_in_threshold \
                     FROM geneset_value gsv \
                     LEFT JOIN gene g ON g.ode_gene_id = gsv.ode_gene_id AND g.gdb_id = ",
                );
                query
                    .push_bind(gene_id_type.code())
                    .push(" WHERE gsv.gs_id = ")
                    .push_bind(geneset_id);
            },
        }
        if let Some(in_threshold) = in_threshold {
            query.push(" AND gsv.gsv_in_threshold = ").push_bind(in_threshold);
        }
        query.push(match gene_id_type {
            None => " ORDER BY gsv.ode_gene_id",
            Some(_) => " ORDER BY gsv.ode_gene_id, g.ode_pref DESC NULLS LAST, g.ode_ref_id",
        });

        let rows: Vec<ValueRow> = query.build_query_as().fetch_all(self.pool()).await?;

        let tag = match gene_id_type {
            Some(requested) => Some(requested),
            None => {
                let native: i32 = sqlx::query_scalar("SELECT gs_gene_id_type FROM geneset WHERE gs_id = $1")
                    .bind(geneset_id)
                    .fetch_optional(self.pool())
                    .await?
                    .ok_or_else(|| DbError::not_found("Geneset", &geneset_id.to_string()))?;
                GeneIdentifier::try_from(native).ok()
            },
        };

        Ok(rows
            .into_iter()
            .map(|row| GenesetValue {
                ode_gene_id: row.ode_gene_id,
                ode_ref_id: row.ode_ref_id,
                gene_id_type: tag,
                value: row.gsv_value,
                in_threshold: row.gsv_in_threshold,
            })
            .collect())
    }

    async fn is_owner(&self, geneset_id: i64, user_id: i64) -> DbResult<bool> {
        let owner: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM geneset WHERE gs_id = $1 AND usr_id = $2)",
        )
        .bind(geneset_id)
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;
        Ok(owner)
    }

    #[tracing::instrument(skip(self))]
    async fn update_threshold(&self, geneset_id: i64, score: &GenesetScoreType) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE geneset
            SET gs_threshold_type = $2, gs_threshold = $3, gs_updated = NOW()
            WHERE gs_id = $1
            "#,
        )
        .bind(geneset_id)
        .bind(score.score_type.code())
        .bind(score.stored_threshold())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Geneset", &geneset_id.to_string()));
        }
        Ok(())
    }
}
