pub mod add_pubmed;

pub use add_pubmed::{AddPubmedError, AddPubmedResponse};
