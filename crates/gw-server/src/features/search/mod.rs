//! Combined search over genesets and publications (`GET /search`)

pub mod query;
pub mod routes;

pub use query::{SearchEntity, SearchQuery, SearchResults};
pub use routes::search_routes;
