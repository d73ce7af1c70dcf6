//! Species metadata (`GET /species`, `GET /species/:species_id`)

pub mod queries;
pub mod routes;

pub use queries::ListSpeciesQuery;
pub use routes::species_routes;
