//! Shared utilities for feature modules
//!
//! - **pagination**: limit/offset windows for list queries
//! - **validation**: input checks shared by commands and queries

pub mod pagination;
pub mod validation;

pub use pagination::WindowParams;
pub use validation::{validate_pubmed_id, validate_search_text, validate_source_ids};
