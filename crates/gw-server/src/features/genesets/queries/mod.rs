pub mod get;
pub mod list;
pub mod ontologies;
pub mod search;
pub mod values;

pub use get::{GenesetDetail, GetGenesetQuery, MetadataQuery};
pub use list::{ListGenesetsQuery, ListGenesetsResponse};
pub use ontologies::GenesetTermsQuery;
pub use search::GenesetSearchQuery;
pub use values::GenesetValuesQuery;
