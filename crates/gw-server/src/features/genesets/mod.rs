//! Genesets: listing, detail, values and curation
//!
//! Listing is open to anonymous callers (public tiers only). Detail
//! endpoints require an identified caller who may read the geneset;
//! threshold changes require ownership and term annotation requires
//! ownership or a curator role.

pub mod access;
pub mod commands;
pub mod queries;
pub mod routes;
pub mod values;

pub use access::{determine_access, readable_geneset, AccessScope};
pub use routes::genesets_routes;
pub use values::{resolve_values, ValueSource};
