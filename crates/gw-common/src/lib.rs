//! GeneWeaver Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared vocabularies, parsing and error handling for the GeneWeaver API.
//!
//! # Overview
//!
//! - **Types**: closed vocabularies for gene identifiers, species, curation
//!   tiers and score types, plus user-facing messages
//! - **Parse**: the batch geneset upload format and its score header grammar
//! - **Logging**: `tracing` subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use gw_common::parse::batch::parse_batch;
//!
//! let outcome = parse_batch("! Binary\n@ Mus musculus\n% Gene Symbol\n: a\n= Set A\nAlas2\t1\n");
//! assert_eq!(outcome.genesets.len(), 1);
//! assert_eq!(outcome.genesets[0].values[0].symbol, "Alas2");
//! ```

pub mod error;
pub mod logging;
pub mod parse;
pub mod types;

pub use error::{GwError, Result};
