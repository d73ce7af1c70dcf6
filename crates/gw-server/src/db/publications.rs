//! Publication records

use async_trait::async_trait;

use super::{map_unique_violation, DbResult, PgStore};
use crate::store::{NewPublication, Publication, PublicationStore, TextSearch};

const PUBLICATION_COLUMNS: &str = "pub_id::bigint AS pub_id, pub_pubmed, pub_title, pub_authors, \
     pub_abstract, pub_journal, pub_volume, pub_pages, pub_month, pub_year";

#[derive(Debug, sqlx::FromRow)]
struct PublicationRow {
    pub_id: i64,
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

impl From<PublicationRow> for Publication {
    fn from(row: PublicationRow) -> Self {
        Self {
            id: row.pub_id,
            details: NewPublication {
                pubmed_id: row.pub_pubmed,
                title: row.pub_title,
                authors: row.pub_authors,
                abstract_text: row.pub_abstract,
                journal: row.pub_journal,
                volume: row.pub_volume,
                pages: row.pub_pages,
                month: row.pub_month,
                year: row.pub_year,
            },
        }
    }
}

#[async_trait]
impl PublicationStore for PgStore {
    async fn publication_by_id(&self, id: i64) -> DbResult<Option<Publication>> {
        let row = sqlx::query_as::<_, PublicationRow>(&format!(
            "SELECT {} FROM publication WHERE pub_id = $1",
            PUBLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Publication::from))
    }

    async fn publication_by_pubmed_id(&self, pubmed_id: &str) -> DbResult<Option<Publication>> {
        let row = sqlx::query_as::<_, PublicationRow>(&format!(
            "SELECT {} FROM publication WHERE pub_pubmed = $1 ORDER BY pub_id LIMIT 1",
            PUBLICATION_COLUMNS
        ))
        .bind(pubmed_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Publication::from))
    }

    #[tracing::instrument(skip(self, publication), fields(pubmed_id = ?publication.pubmed_id))]
    async fn add_publication(&self, publication: &NewPublication) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO publication (pub_pubmed, pub_title, pub_authors, pub_abstract,
                                     pub_journal, pub_volume, pub_pages, pub_month, pub_year)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING pub_id::bigint
            "#,
        )
        .bind(&publication.pubmed_id)
        .bind(&publication.title)
        .bind(&publication.authors)
        .bind(&publication.abstract_text)
        .bind(&publication.journal)
        .bind(&publication.volume)
        .bind(&publication.pages)
        .bind(&publication.month)
        .bind(&publication.year)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            map_unique_violation(e, "Publication", publication.pubmed_id.as_deref().unwrap_or("unknown"))
        })?;

        tracing::info!(publication_id = id, "Publication added");
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn search_publications(&self, search: &TextSearch) -> DbResult<Vec<Publication>> {
        let rows = sqlx::query_as::<_, PublicationRow>(&format!(
            r#"
            SELECT {}
            FROM publication
            WHERE to_tsvector('english', coalesce(pub_title, '') || ' ' || coalesce(pub_abstract, ''))
                  @@ plainto_tsquery('english', $1)
            ORDER BY pub_id
            LIMIT $2 OFFSET $3
            "#,
            PUBLICATION_COLUMNS
        ))
        .bind(&search.text)
        .bind(search.limit)
        .bind(search.offset)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Publication::from).collect())
    }
}
