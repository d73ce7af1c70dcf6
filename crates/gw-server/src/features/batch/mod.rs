//! Batch geneset uploads
//!
//! `POST /batch` parses an uploaded batch file for an identified caller
//! and returns the genesets read from it. `POST /batch/validate` parses
//! without identity and returns summaries only. Both answer with the
//! parser's user and system messages; a file with bad lines is still a
//! successful request.

pub mod commands;
pub mod routes;

pub use commands::{BatchError, BatchGenesetSummary, BatchResponse, ProcessBatchCommand};
pub use routes::batch_routes;
