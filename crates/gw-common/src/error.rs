//! Error types shared across GeneWeaver crates

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, GwError>;

#[derive(Error, Debug)]
pub enum GwError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An integer code outside a closed vocabulary
    #[error("Invalid {vocabulary} code: {code}")]
    InvalidCode { vocabulary: &'static str, code: i32 },

    /// A name that no vocabulary entry answers to
    #[error("Unknown {vocabulary}: '{name}'")]
    UnknownName { vocabulary: &'static str, name: String },

    #[error("Invalid score type: {0}")]
    InvalidScore(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Could not decode upload as {encoding}: {reason}")]
    Decode { encoding: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GwError {
    pub fn invalid_code(vocabulary: &'static str, code: i32) -> Self {
        Self::InvalidCode { vocabulary, code }
    }

    pub fn unknown_name(vocabulary: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownName {
            vocabulary,
            name: name.into(),
        }
    }
}
