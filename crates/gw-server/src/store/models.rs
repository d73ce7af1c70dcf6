//! Records exchanged between services and the store

use chrono::{NaiveDate, NaiveDateTime};
use gw_common::types::{AppRole, GeneIdentifier, GenesetScoreType, GenesetTier, ScoreType, Species};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Genes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub ode_gene_id: i64,
    pub ode_ref_id: String,
    pub gene_database: GeneIdentifier,
    pub species: Option<Species>,
    pub preferred: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GeneFilter {
    pub reference_id: Option<String>,
    pub gene_database: Option<GeneIdentifier>,
    pub species: Option<Species>,
    pub preferred: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

/// A gene database (identifier system) and the species it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneDatabase {
    pub id: GeneIdentifier,
    pub name: String,
    /// `None` when identifiers in this system are not species specific
    pub species: Option<Species>,
}

/// One `(source id, mapped id)` pair as returned by a mapping query.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GeneIdMapRow {
    pub original_ref_id: String,
    pub mapped_ref_id: String,
}

/// Inputs to the homology lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct HomologLookup {
    pub source_ids: Vec<String>,
    pub target_gene_id_type: GeneIdentifier,
    pub source_gene_id_type: Option<GeneIdentifier>,
    pub target_species: Option<Species>,
    pub source_species: Option<Species>,
}

/// Homolog of an internal gene id under a target identifier system.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OdeHomolog {
    pub ode_gene_id: i64,
    pub ode_ref_id: String,
}

// ============================================================================
// Genesets
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geneset {
    pub id: i64,
    pub user_id: i64,
    pub curation_tier: Option<GenesetTier>,
    pub species: Option<Species>,
    pub name: String,
    pub abbreviation: String,
    pub description: Option<String>,
    pub publication_id: Option<i64>,
    pub score: GenesetScoreType,
    pub count: i32,
    /// Native identifier code; negative codes are microarray platforms
    pub gene_id_type: i32,
    pub status: String,
    pub created: Option<NaiveDate>,
    pub updated: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication: Option<Publication>,
}

impl Geneset {
    /// The native identifier system when it is a gene database.
    pub fn native_gene_id_type(&self) -> Option<GeneIdentifier> {
        GeneIdentifier::try_from(self.gene_id_type).ok()
    }
}

/// Filters for geneset listing. `None` means "do not filter".
#[derive(Debug, Clone, Default)]
pub struct GenesetFilter {
    pub gs_id: Option<i64>,
    pub owner: Option<i64>,
    pub readable_by: Option<i64>,
    pub curation_tiers: Option<BTreeSet<GenesetTier>>,
    pub species: Option<Species>,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub publication_id: Option<i64>,
    pub pubmed_id: Option<String>,
    pub gene_id_type: Option<GeneIdentifier>,
    pub search_text: Option<String>,
    pub ontology_term: Option<String>,
    pub score_types: Option<Vec<ScoreType>>,
    pub lte_count: Option<i32>,
    pub gte_count: Option<i32>,
    pub created_after: Option<NaiveDate>,
    pub created_before: Option<NaiveDate>,
    pub updated_after: Option<NaiveDate>,
    pub updated_before: Option<NaiveDate>,
    pub with_publication_info: bool,
    pub limit: i64,
    pub offset: i64,
}

/// A gene value of a geneset under some identifier system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenesetValue {
    pub ode_gene_id: i64,
    /// `None` when the gene has no identifier under `gene_id_type`
    pub ode_ref_id: Option<String>,
    /// Identifier system of `ode_ref_id`; `None` only for uploaded
    /// identifiers that are not in a gene database (microarray probes)
    pub gene_id_type: Option<GeneIdentifier>,
    pub value: f64,
    pub in_threshold: bool,
}

// ============================================================================
// Publications
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: i64,
    #[serde(flatten)]
    pub details: NewPublication,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPublication {
    pub pubmed_id: Option<String>,
    pub title: Option<String>,
    pub authors: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub pages: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

// ============================================================================
// Ontology
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OntologyTerm {
    pub ontology_id: i64,
    pub ref_id: String,
    pub name: String,
    pub description: Option<String>,
    pub ontology_db: Option<String>,
    /// How the term was attached; set when listed for a geneset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,
}

// ============================================================================
// Species
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesRecord {
    pub id: Species,
    pub name: String,
    pub common_name: &'static str,
    pub taxonomy_id: Option<i32>,
    pub reference_gene_id_type: Option<GeneIdentifier>,
}

#[derive(Debug, Clone, Default)]
pub struct SpeciesFilter {
    pub taxonomy_id: Option<i32>,
    pub reference_gene_id_type: Option<GeneIdentifier>,
}

// ============================================================================
// Users and search
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub role: AppRole,
}

#[derive(Debug, Clone)]
pub struct TextSearch {
    pub text: String,
    pub limit: i64,
    pub offset: i64,
}
