//! Store traits: the seam between services and the database
//!
//! Services depend on these traits only. [`crate::db::PgStore`] implements
//! them over Postgres; tests substitute in-memory fakes.

pub mod memory;
pub mod models;

use async_trait::async_trait;
use gw_common::types::{GeneIdentifier, GenesetScoreType, Species};

use crate::db::DbResult;
pub use models::*;

#[async_trait]
pub trait GeneStore: Send + Sync {
    async fn list_genes(&self, filter: &GeneFilter) -> DbResult<Vec<Gene>>;

    /// Homolog identifiers for `source_ids`, one row per candidate pair.
    async fn get_homolog_ids(&self, lookup: &HomologLookup) -> DbResult<Vec<GeneIdMapRow>>;

    /// Same-species translation of `source_ids` into `target`.
    async fn mapping(
        &self,
        source_ids: &[String],
        species: Species,
        target: GeneIdentifier,
    ) -> DbResult<Vec<GeneIdMapRow>>;

    /// Translation into the species' reference identifier system.
    async fn aon_mapping(&self, source_ids: &[String], species: Species) -> DbResult<Vec<GeneIdMapRow>>;

    async fn gene_database_by_id(&self, id: GeneIdentifier) -> DbResult<Option<GeneDatabase>>;

    /// Homologs of internal gene ids under `target`, at most one per id.
    async fn get_homolog_ids_by_ode_id(
        &self,
        ode_ids: &[i64],
        target: GeneIdentifier,
    ) -> DbResult<Vec<OdeHomolog>>;
}

#[async_trait]
pub trait GenesetStore: Send + Sync {
    async fn list_genesets(&self, filter: &GenesetFilter) -> DbResult<Vec<Geneset>>;

    /// The geneset if it exists, is not deleted and, when `readable_by` is
    /// given, that user may read it.
    async fn get_geneset(&self, id: i64, readable_by: Option<i64>) -> DbResult<Option<Geneset>>;

    async fn geneset_exists(&self, id: i64) -> DbResult<bool>;

    /// Values of a geneset. `None` for `gene_id_type` returns the values as
    /// uploaded.
    async fn geneset_values(
        &self,
        geneset_id: i64,
        gene_id_type: Option<GeneIdentifier>,
        in_threshold: Option<bool>,
    ) -> DbResult<Vec<GenesetValue>>;

    async fn is_owner(&self, geneset_id: i64, user_id: i64) -> DbResult<bool>;

    async fn update_threshold(&self, geneset_id: i64, score: &GenesetScoreType) -> DbResult<()>;
}

#[async_trait]
pub trait OntologyStore: Send + Sync {
    async fn geneset_terms(&self, geneset_id: i64, limit: i64, offset: i64) -> DbResult<Vec<OntologyTerm>>;

    async fn term_by_ref_id(&self, ref_id: &str) -> DbResult<Option<OntologyTerm>>;

    /// Fails with `DbError::Duplicate` when the term is already attached.
    async fn add_geneset_term(&self, geneset_id: i64, ontology_id: i64, reference_type: &str) -> DbResult<()>;

    /// Returns whether an association was removed.
    async fn remove_geneset_term(&self, geneset_id: i64, ontology_id: i64) -> DbResult<bool>;
}

#[async_trait]
pub trait PublicationStore: Send + Sync {
    async fn publication_by_id(&self, id: i64) -> DbResult<Option<Publication>>;

    async fn publication_by_pubmed_id(&self, pubmed_id: &str) -> DbResult<Option<Publication>>;

    async fn add_publication(&self, publication: &NewPublication) -> DbResult<i64>;

    async fn search_publications(&self, search: &TextSearch) -> DbResult<Vec<Publication>>;
}

#[async_trait]
pub trait SpeciesStore: Send + Sync {
    async fn list_species(&self, filter: &SpeciesFilter) -> DbResult<Vec<SpeciesRecord>>;

    async fn species_by_id(&self, species: Species) -> DbResult<Option<SpeciesRecord>>;
}

/// Lookups behind caller identity resolution.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn user_by_sso_id_and_email(&self, sso_id: &str, email: &str) -> DbResult<Option<UserRecord>>;

    async fn sso_id_exists(&self, sso_id: &str) -> DbResult<bool>;

    async fn user_by_email(&self, email: &str) -> DbResult<Option<UserRecord>>;

    async fn link_sso_id(&self, user_id: i64, sso_id: &str) -> DbResult<()>;

    async fn create_sso_user(&self, name: &str, email: &str, sso_id: &str) -> DbResult<UserRecord>;
}

/// Everything the API needs from the database.
#[async_trait]
pub trait Store:
    GeneStore + GenesetStore + OntologyStore + PublicationStore + SpeciesStore + UserStore
{
    async fn health_check(&self) -> DbResult<()>;
}
