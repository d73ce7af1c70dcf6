//! Shared validation utilities

use thiserror::Error;

/// Upper bound on identifiers accepted by one mapping request
pub const MAX_SOURCE_IDS: usize = 10_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceIdsValidationError {
    #[error("source_ids must contain at least one identifier")]
    Empty,

    #[error("source_ids may contain at most {max} identifiers")]
    TooMany { max: usize },

    #[error("source_ids must not contain blank identifiers")]
    Blank,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchTextValidationError {
    #[error("search_text is required")]
    Required,

    #[error("search_text must be at most {max_length} characters")]
    TooLong { max_length: usize },
}

/// Gene identifiers of a mapping request: non-empty, bounded, no blanks.
pub fn validate_source_ids(ids: &[String]) -> Result<(), SourceIdsValidationError> {
    if ids.is_empty() {
        return Err(SourceIdsValidationError::Empty);
    }
    if ids.len() > MAX_SOURCE_IDS {
        return Err(SourceIdsValidationError::TooMany { max: MAX_SOURCE_IDS });
    }
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(SourceIdsValidationError::Blank);
    }
    Ok(())
}

pub fn validate_search_text(text: &str, max_length: usize) -> Result<(), SearchTextValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SearchTextValidationError::Required);
    }
    if trimmed.chars().count() > max_length {
        return Err(SearchTextValidationError::TooLong { max_length });
    }
    Ok(())
}

/// PubMed ids are decimal digits.
pub fn validate_pubmed_id(pubmed_id: &str) -> Result<(), &'static str> {
    if pubmed_id.is_empty() || !pubmed_id.chars().all(|c| c.is_ascii_digit()) {
        return Err("PubMed id must be a non-empty string of digits");
    }
    Ok(())
}
