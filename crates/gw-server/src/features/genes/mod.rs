//! Genes and gene identifier mapping
//!
//! - `GET /genes` lists genes
//! - `POST /genes/homologs` maps identifiers across species through homology
//! - `POST /genes/mapping` maps identifiers within one species
//! - `POST /genes/mapping/aon` maps into the species' reference identifiers

pub mod queries;
pub mod routes;

pub use queries::{
    GeneIdMapping, GeneIdMappingResponse, GeneMappingQuery, HomologMappingQuery, ListGenesQuery,
    ReferenceMappingQuery,
};
pub use routes::genes_routes;
