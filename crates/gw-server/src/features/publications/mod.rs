//! Publications
//!
//! - `GET /publications/:id` looks a publication up by PubMed id, or by
//!   internal id with `as_pubmed_id=false`
//! - `POST /publications/pubmed/:pubmed_id` imports a PubMed record

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{AddPubmedError, AddPubmedResponse};
pub use queries::GetPublicationQuery;
pub use routes::publications_routes;
