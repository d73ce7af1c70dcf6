//! In-memory store
//!
//! Implements every store trait over plain vectors. Used by the test
//! suites and for running the router without a database.

use async_trait::async_trait;
use gw_common::types::{AppRole, GeneIdentifier, GenesetScoreType, GenesetTier, Species};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use super::*;
use crate::db::{DbError, DbResult};

#[derive(Debug, Clone)]
struct MemoryGene {
    gene: Gene,
    homology_group: Option<i64>,
}

#[derive(Debug, Clone)]
struct MemoryValue {
    geneset_id: i64,
    ode_gene_id: i64,
    source_id: String,
    value: f64,
    in_threshold: bool,
}

#[derive(Debug, Clone)]
struct MemoryUser {
    record: UserRecord,
    sso_id: Option<String>,
}

#[derive(Debug, Default)]
struct MemoryData {
    genes: Vec<MemoryGene>,
    gene_databases: Vec<GeneDatabase>,
    genesets: Vec<Geneset>,
    values: Vec<MemoryValue>,
    terms: Vec<OntologyTerm>,
    geneset_terms: Vec<(i64, i64, String)>,
    publications: Vec<Publication>,
    species: Vec<SpeciesRecord>,
    users: Vec<MemoryUser>,
    unhealthy: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
}

/// A minimal geneset for seeding a store.
pub fn sample_geneset(id: i64, owner: i64, tier: GenesetTier, species: Species) -> Geneset {
    Geneset {
        id,
        user_id: owner,
        curation_tier: Some(tier),
        species: Some(species),
        name: format!("Geneset {}", id),
        abbreviation: format!("GS{}", id),
        description: None,
        publication_id: None,
        score: GenesetScoreType::binary(),
        count: 0,
        gene_id_type: GeneIdentifier::GeneSymbol.code(),
        status: "normal".to_string(),
        created: None,
        updated: None,
        publication: None,
    }
}

fn window<T>(items: impl Iterator<Item = T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .skip(usize::try_from(offset).unwrap_or_default())
        .take(usize::try_from(limit).unwrap_or_default())
        .collect()
}

fn sorted_pairs(mut rows: Vec<GeneIdMapRow>) -> Vec<GeneIdMapRow> {
    rows.sort_by(|a, b| {
        (&a.original_ref_id, &a.mapped_ref_id).cmp(&(&b.original_ref_id, &b.mapped_ref_id))
    });
    rows.dedup();
    rows
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, MemoryData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_gene(
        self,
        ode_gene_id: i64,
        ode_ref_id: &str,
        gene_database: GeneIdentifier,
        species: Species,
        homology_group: Option<i64>,
    ) -> Self {
        self.data().genes.push(MemoryGene {
            gene: Gene {
                ode_gene_id,
                ode_ref_id: ode_ref_id.to_string(),
                gene_database,
                species: Some(species),
                preferred: true,
            },
            homology_group,
        });
        self
    }

    pub fn with_gene_database(self, id: GeneIdentifier, species: Option<Species>) -> Self {
        self.data().gene_databases.push(GeneDatabase {
            id,
            name: id.name().to_string(),
            species,
        });
        self
    }

    pub fn with_geneset(self, geneset: Geneset) -> Self {
        self.data().genesets.push(geneset);
        self
    }

    pub fn with_value(self, geneset_id: i64, ode_gene_id: i64, source_id: &str, value: f64, in_threshold: bool) -> Self {
        self.data().values.push(MemoryValue {
            geneset_id,
            ode_gene_id,
            source_id: source_id.to_string(),
            value,
            in_threshold,
        });
        self
    }

    pub fn with_term(self, ontology_id: i64, ref_id: &str, name: &str) -> Self {
        self.data().terms.push(OntologyTerm {
            ontology_id,
            ref_id: ref_id.to_string(),
            name: name.to_string(),
            description: None,
            ontology_db: None,
            reference_type: None,
        });
        self
    }

    pub fn with_publication(self, id: i64, pubmed_id: &str, title: &str) -> Self {
        self.data().publications.push(Publication {
            id,
            details: NewPublication {
                pubmed_id: Some(pubmed_id.to_string()),
                title: Some(title.to_string()),
                ..NewPublication::default()
            },
        });
        self
    }

    pub fn with_species(self, species: Species, taxonomy_id: i32, reference: Option<GeneIdentifier>) -> Self {
        self.data().species.push(SpeciesRecord {
            id: species,
            name: species.name().to_string(),
            common_name: species.common_name(),
            taxonomy_id: Some(taxonomy_id),
            reference_gene_id_type: reference,
        });
        self
    }

    pub fn with_user(self, id: i64, email: &str, sso_id: Option<&str>) -> Self {
        self.with_role(id, email, sso_id, AppRole::User)
    }

    pub fn with_role(self, id: i64, email: &str, sso_id: Option<&str>, role: AppRole) -> Self {
        self.data().users.push(MemoryUser {
            record: UserRecord {
                id,
                email: email.to_string(),
                name: None,
                role,
            },
            sso_id: sso_id.map(str::to_string),
        });
        self
    }

    pub fn unhealthy(self) -> Self {
        self.data().unhealthy = true;
        self
    }

    pub fn sso_id_of(&self, user_id: i64) -> Option<String> {
        self.data()
            .users
            .iter()
            .find(|u| u.record.id == user_id)
            .and_then(|u| u.sso_id.clone())
    }

    pub fn geneset(&self, id: i64) -> Option<Geneset> {
        self.data().genesets.iter().find(|g| g.id == id).cloned()
    }

    pub fn geneset_term_ids(&self, geneset_id: i64) -> Vec<i64> {
        self.data()
            .geneset_terms
            .iter()
            .filter(|(gs, _, _)| *gs == geneset_id)
            .map(|(_, onto, _)| *onto)
            .collect()
    }

    pub fn publication_count(&self) -> usize {
        self.data().publications.len()
    }
}

impl MemoryData {
    fn is_admin(&self, user_id: i64) -> bool {
        self.users
            .iter()
            .any(|u| u.record.id == user_id && u.record.role == AppRole::Admin)
    }

    fn readable(&self, geneset: &Geneset, user_id: i64) -> bool {
        geneset.user_id == user_id
            || geneset.curation_tier.is_some_and(|tier| tier != GenesetTier::Tier5)
            || self.is_admin(user_id)
    }

    fn pubmed_of(&self, publication_id: Option<i64>) -> Option<&str> {
        let id = publication_id?;
        self.publications
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| p.details.pubmed_id.as_deref())
    }

    fn matches(&self, geneset: &Geneset, filter: &GenesetFilter) -> bool {
        let tiers_match = |tiers: &BTreeSet<GenesetTier>| {
            geneset.curation_tier.is_some_and(|tier| tiers.contains(&tier))
        };
        let text_match = |text: &str| {
            let text = text.to_lowercase();
            geneset.name.to_lowercase().contains(&text)
                || geneset
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&text))
        };
        let term_match = |ref_id: &str| {
            self.terms.iter().any(|t| {
                t.ref_id == ref_id
                    && self
                        .geneset_terms
                        .iter()
                        .any(|(gs, onto, _)| *gs == geneset.id && *onto == t.ontology_id)
            })
        };

        filter.gs_id.map_or(true, |id| geneset.id == id)
            && filter.owner.map_or(true, |owner| geneset.user_id == owner)
            && filter.readable_by.map_or(true, |user| self.readable(geneset, user))
            && filter.curation_tiers.as_ref().map_or(true, tiers_match)
            && filter.species.map_or(true, |s| geneset.species == Some(s))
            && filter.name.as_ref().map_or(true, |n| &geneset.name == n)
            && filter.abbreviation.as_ref().map_or(true, |a| &geneset.abbreviation == a)
            && filter.publication_id.map_or(true, |p| geneset.publication_id == Some(p))
            && filter
                .pubmed_id
                .as_deref()
                .map_or(true, |p| self.pubmed_of(geneset.publication_id) == Some(p))
            && filter.gene_id_type.map_or(true, |t| geneset.gene_id_type == t.code())
            && filter.search_text.as_deref().map_or(true, text_match)
            && filter.ontology_term.as_deref().map_or(true, term_match)
            && filter
                .score_types
                .as_ref()
                .map_or(true, |types| types.contains(&geneset.score.score_type))
            && filter.lte_count.map_or(true, |c| geneset.count <= c)
            && filter.gte_count.map_or(true, |c| geneset.count >= c)
            && filter.created_after.map_or(true, |d| geneset.created.is_some_and(|c| c >= d))
            && filter.created_before.map_or(true, |d| geneset.created.is_some_and(|c| c <= d))
            && filter.updated_after.map_or(true, |d| geneset.updated.is_some_and(|u| u.date() >= d))
            && filter.updated_before.map_or(true, |d| geneset.updated.is_some_and(|u| u.date() <= d))
    }

    fn with_publication(&self, mut geneset: Geneset) -> Geneset {
        geneset.publication = geneset
            .publication_id
            .and_then(|id| self.publications.iter().find(|p| p.id == id).cloned());
        geneset
    }
}

#[async_trait]
impl GeneStore for MemoryStore {
    async fn list_genes(&self, filter: &GeneFilter) -> DbResult<Vec<Gene>> {
        let data = self.data();
        let genes = data
            .genes
            .iter()
            .map(|g| &g.gene)
            .filter(|g| filter.reference_id.as_ref().map_or(true, |r| &g.ode_ref_id == r))
            .filter(|g| filter.gene_database.map_or(true, |d| g.gene_database == d))
            .filter(|g| filter.species.map_or(true, |s| g.species == Some(s)))
            .filter(|g| filter.preferred.map_or(true, |p| g.preferred == p))
            .cloned();
        Ok(window(genes, filter.limit, filter.offset))
    }

    async fn get_homolog_ids(&self, lookup: &HomologLookup) -> DbResult<Vec<GeneIdMapRow>> {
        let data = self.data();
        let wanted: Vec<String> = lookup.source_ids.iter().map(|id| id.to_lowercase()).collect();
        let mut rows = Vec::new();

        for source in data.genes.iter().filter(|g| {
            wanted.contains(&g.gene.ode_ref_id.to_lowercase())
                && lookup.source_gene_id_type.map_or(true, |t| g.gene.gene_database == t)
                && lookup.source_species.map_or(true, |s| g.gene.species == Some(s))
        }) {
            let Some(group) = source.homology_group else {
                continue;
            };
            for target in data.genes.iter().filter(|g| {
                g.homology_group == Some(group)
                    && g.gene.gene_database == lookup.target_gene_id_type
                    && lookup.target_species.map_or(true, |s| g.gene.species == Some(s))
            }) {
                rows.push(GeneIdMapRow {
                    original_ref_id: source.gene.ode_ref_id.clone(),
                    mapped_ref_id: target.gene.ode_ref_id.clone(),
                });
            }
        }

        Ok(sorted_pairs(rows))
    }

    async fn mapping(
        &self,
        source_ids: &[String],
        species: Species,
        target: GeneIdentifier,
    ) -> DbResult<Vec<GeneIdMapRow>> {
        let data = self.data();
        let wanted: Vec<String> = source_ids.iter().map(|id| id.to_lowercase()).collect();
        let rows = data
            .genes
            .iter()
            .filter(|g| wanted.contains(&g.gene.ode_ref_id.to_lowercase()) && g.gene.species == Some(species))
            .flat_map(|source| {
                data.genes
                    .iter()
                    .filter(move |g| g.gene.ode_gene_id == source.gene.ode_gene_id && g.gene.gene_database == target)
                    .map(move |t| GeneIdMapRow {
                        original_ref_id: source.gene.ode_ref_id.clone(),
                        mapped_ref_id: t.gene.ode_ref_id.clone(),
                    })
            })
            .collect();
        Ok(sorted_pairs(rows))
    }

    async fn aon_mapping(&self, source_ids: &[String], species: Species) -> DbResult<Vec<GeneIdMapRow>> {
        let reference = self
            .data()
            .species
            .iter()
            .find(|s| s.id == species)
            .and_then(|s| s.reference_gene_id_type);
        match reference {
            Some(target) => self.mapping(source_ids, species, target).await,
            None => Ok(Vec::new()),
        }
    }

    async fn gene_database_by_id(&self, id: GeneIdentifier) -> DbResult<Option<GeneDatabase>> {
        Ok(self.data().gene_databases.iter().find(|d| d.id == id).cloned())
    }

    async fn get_homolog_ids_by_ode_id(&self, ode_ids: &[i64], target: GeneIdentifier) -> DbResult<Vec<OdeHomolog>> {
        let data = self.data();
        let ids: BTreeSet<i64> = ode_ids.iter().copied().collect();
        let mut rows = Vec::new();

        for id in ids {
            let groups: BTreeSet<i64> = data
                .genes
                .iter()
                .filter(|g| g.gene.ode_gene_id == id)
                .filter_map(|g| g.homology_group)
                .collect();
            let homolog = data
                .genes
                .iter()
                .filter(|g| g.homology_group.is_some_and(|h| groups.contains(&h)) && g.gene.gene_database == target)
                .map(|g| g.gene.ode_ref_id.clone())
                .min();
            if let Some(ode_ref_id) = homolog {
                rows.push(OdeHomolog { ode_gene_id: id, ode_ref_id });
            }
        }

        Ok(rows)
    }
}

#[async_trait]
impl GenesetStore for MemoryStore {
    async fn list_genesets(&self, filter: &GenesetFilter) -> DbResult<Vec<Geneset>> {
        let data = self.data();
        let mut genesets: Vec<Geneset> = data
            .genesets
            .iter()
            .filter(|g| data.matches(g, filter))
            .cloned()
            .collect();
        genesets.sort_by_key(|g| g.id);
        let genesets = genesets.into_iter().map(|g| {
            if filter.with_publication_info {
                data.with_publication(g)
            } else {
                g
            }
        });
        Ok(window(genesets, filter.limit, filter.offset))
    }

    async fn get_geneset(&self, id: i64, readable_by: Option<i64>) -> DbResult<Option<Geneset>> {
        let data = self.data();
        Ok(data
            .genesets
            .iter()
            .find(|g| g.id == id)
            .filter(|g| readable_by.map_or(true, |user| data.readable(g, user)))
            .cloned()
            .map(|g| data.with_publication(g)))
    }

    async fn geneset_exists(&self, id: i64) -> DbResult<bool> {
        Ok(self.data().genesets.iter().any(|g| g.id == id))
    }

    async fn geneset_values(
        &self,
        geneset_id: i64,
        gene_id_type: Option<GeneIdentifier>,
        in_threshold: Option<bool>,
    ) -> DbResult<Vec<GenesetValue>> {
        let data = self.data();
        let geneset = data
            .genesets
            .iter()
            .find(|g| g.id == geneset_id)
            .ok_or_else(|| DbError::not_found("Geneset", &geneset_id.to_string()))?;

        let mut values: Vec<&MemoryValue> = data
            .values
            .iter()
            .filter(|v| v.geneset_id == geneset_id)
            .filter(|v| in_threshold.map_or(true, |t| v.in_threshold == t))
            .collect();
        values.sort_by_key(|v| v.ode_gene_id);

        Ok(values
            .into_iter()
            .map(|v| {
                let (ode_ref_id, tag) = match gene_id_type {
                    None => (Some(v.source_id.clone()), geneset.native_gene_id_type()),
                    Some(requested) => (
                        data.genes
                            .iter()
                            .filter(|g| g.gene.ode_gene_id == v.ode_gene_id && g.gene.gene_database == requested)
                            .map(|g| g.gene.ode_ref_id.clone())
                            .min(),
                        Some(requested),
                    ),
                };
                GenesetValue {
                    ode_gene_id: v.ode_gene_id,
                    ode_ref_id,
                    gene_id_type: tag,
                    value: v.value,
                    in_threshold: v.in_threshold,
                }
            })
            .collect())
    }

    async fn is_owner(&self, geneset_id: i64, user_id: i64) -> DbResult<bool> {
        Ok(self
            .data()
            .genesets
            .iter()
            .any(|g| g.id == geneset_id && g.user_id == user_id))
    }

    async fn update_threshold(&self, geneset_id: i64, score: &GenesetScoreType) -> DbResult<()> {
        let mut data = self.data();
        let geneset = data
            .genesets
            .iter_mut()
            .find(|g| g.id == geneset_id)
            .ok_or_else(|| DbError::not_found("Geneset", &geneset_id.to_string()))?;
        geneset.score = *score;
        Ok(())
    }
}

#[async_trait]
impl OntologyStore for MemoryStore {
    async fn geneset_terms(&self, geneset_id: i64, limit: i64, offset: i64) -> DbResult<Vec<OntologyTerm>> {
        let data = self.data();
        let mut terms: Vec<OntologyTerm> = data
            .geneset_terms
            .iter()
            .filter(|(gs, _, _)| *gs == geneset_id)
            .filter_map(|(_, onto, ref_type)| {
                data.terms.iter().find(|t| t.ontology_id == *onto).map(|t| OntologyTerm {
                    reference_type: Some(ref_type.clone()),
                    ..t.clone()
                })
            })
            .collect();
        terms.sort_by(|a, b| a.ref_id.cmp(&b.ref_id));
        Ok(window(terms.into_iter(), limit, offset))
    }

    async fn term_by_ref_id(&self, ref_id: &str) -> DbResult<Option<OntologyTerm>> {
        Ok(self.data().terms.iter().find(|t| t.ref_id == ref_id).cloned())
    }

    async fn add_geneset_term(&self, geneset_id: i64, ontology_id: i64, reference_type: &str) -> DbResult<()> {
        let mut data = self.data();
        if data
            .geneset_terms
            .iter()
            .any(|(gs, onto, _)| *gs == geneset_id && *onto == ontology_id)
        {
            return Err(DbError::duplicate("Ontology term association", &ontology_id.to_string()));
        }
        data.geneset_terms
            .push((geneset_id, ontology_id, reference_type.to_string()));
        Ok(())
    }

    async fn remove_geneset_term(&self, geneset_id: i64, ontology_id: i64) -> DbResult<bool> {
        let mut data = self.data();
        let before = data.geneset_terms.len();
        data.geneset_terms
            .retain(|(gs, onto, _)| !(*gs == geneset_id && *onto == ontology_id));
        Ok(data.geneset_terms.len() < before)
    }
}

#[async_trait]
impl PublicationStore for MemoryStore {
    async fn publication_by_id(&self, id: i64) -> DbResult<Option<Publication>> {
        Ok(self.data().publications.iter().find(|p| p.id == id).cloned())
    }

    async fn publication_by_pubmed_id(&self, pubmed_id: &str) -> DbResult<Option<Publication>> {
        Ok(self
            .data()
            .publications
            .iter()
            .find(|p| p.details.pubmed_id.as_deref() == Some(pubmed_id))
            .cloned())
    }

    async fn add_publication(&self, publication: &NewPublication) -> DbResult<i64> {
        let mut data = self.data();
        let id = data.publications.iter().map(|p| p.id).max().unwrap_or_default() + 1;
        data.publications.push(Publication {
            id,
            details: publication.clone(),
        });
        Ok(id)
    }

    async fn search_publications(&self, search: &TextSearch) -> DbResult<Vec<Publication>> {
        let text = search.text.to_lowercase();
        let data = self.data();
        let hits = data
            .publications
            .iter()
            .filter(|p| {
                [&p.details.title, &p.details.abstract_text]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&text))
            })
            .cloned();
        Ok(window(hits, search.limit, search.offset))
    }
}

#[async_trait]
impl SpeciesStore for MemoryStore {
    async fn list_species(&self, filter: &SpeciesFilter) -> DbResult<Vec<SpeciesRecord>> {
        Ok(self
            .data()
            .species
            .iter()
            .filter(|s| filter.taxonomy_id.map_or(true, |t| s.taxonomy_id == Some(t)))
            .filter(|s| {
                filter
                    .reference_gene_id_type
                    .map_or(true, |t| s.reference_gene_id_type == Some(t))
            })
            .cloned()
            .collect())
    }

    async fn species_by_id(&self, species: Species) -> DbResult<Option<SpeciesRecord>> {
        Ok(self.data().species.iter().find(|s| s.id == species).cloned())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn user_by_sso_id_and_email(&self, sso_id: &str, email: &str) -> DbResult<Option<UserRecord>> {
        Ok(self
            .data()
            .users
            .iter()
            .find(|u| u.sso_id.as_deref() == Some(sso_id) && u.record.email.eq_ignore_ascii_case(email))
            .map(|u| u.record.clone()))
    }

    async fn sso_id_exists(&self, sso_id: &str) -> DbResult<bool> {
        Ok(self.data().users.iter().any(|u| u.sso_id.as_deref() == Some(sso_id)))
    }

    async fn user_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        Ok(self
            .data()
            .users
            .iter()
            .find(|u| u.record.email.eq_ignore_ascii_case(email))
            .map(|u| u.record.clone()))
    }

    async fn link_sso_id(&self, user_id: i64, sso_id: &str) -> DbResult<()> {
        let mut data = self.data();
        let user = data
            .users
            .iter_mut()
            .find(|u| u.record.id == user_id)
            .ok_or_else(|| DbError::not_found("User", &user_id.to_string()))?;
        user.sso_id = Some(sso_id.to_string());
        Ok(())
    }

    async fn create_sso_user(&self, name: &str, email: &str, sso_id: &str) -> DbResult<UserRecord> {
        let mut data = self.data();
        let id = data.users.iter().map(|u| u.record.id).max().unwrap_or_default() + 1;
        let record = UserRecord {
            id,
            email: email.to_string(),
            name: Some(name.to_string()),
            role: AppRole::User,
        };
        data.users.push(MemoryUser {
            record: record.clone(),
            sso_id: Some(sso_id.to_string()),
        });
        Ok(record)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> DbResult<()> {
        if self.data().unhealthy {
            return Err(DbError::config("store marked unhealthy"));
        }
        Ok(())
    }
}
