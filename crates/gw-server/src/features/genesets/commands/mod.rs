pub mod ontology;
pub mod threshold;

pub use ontology::{AddGenesetTermCommand, GenesetTermError, RemoveGenesetTermCommand};
pub use threshold::{UpdateThresholdCommand, UpdateThresholdError};
