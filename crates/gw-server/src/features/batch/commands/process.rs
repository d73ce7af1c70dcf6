use gw_common::parse::{decode_upload, parse_batch, BatchGeneset, BatchParseOutcome};
use gw_common::types::{GenesetAccess, MessageResponse, Species};
use gw_common::GwError;
use serde::Serialize;

use crate::config::BatchConfig;
use crate::error::ServiceError;

/// A decoded upload waiting to be parsed.
#[derive(Debug, Clone)]
pub struct ProcessBatchCommand {
    pub contents: Vec<u8>,
    /// Falls back to the configured default encoding
    pub encoding: Option<String>,
}

/// One parsed geneset, without its values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchGenesetSummary {
    pub label: String,
    pub name: String,
    pub species: Species,
    pub access: GenesetAccess,
    pub gene_count: usize,
    pub line: usize,
}

impl From<&BatchGeneset> for BatchGenesetSummary {
    fn from(geneset: &BatchGeneset) -> Self {
        Self {
            label: geneset.label.clone(),
            name: geneset.name.clone(),
            species: geneset.species,
            access: geneset.access,
            gene_count: geneset.values.len(),
            line: geneset.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResponse<G> {
    pub genesets: Vec<G>,
    pub messages: MessageResponse,
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("No 'batch_file' field in the upload")]
    MissingFile,
    #[error("Batch file is empty")]
    EmptyFile,
    #[error("Batch file is {size} bytes; the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },
    #[error("Could not read the upload: {0}")]
    Multipart(String),
    #[error(transparent)]
    Decode(#[from] GwError),
}

impl From<BatchError> for ServiceError {
    fn from(err: BatchError) -> Self {
        ServiceError::validation(err.to_string())
    }
}

impl ProcessBatchCommand {
    pub fn validate(&self, config: &BatchConfig) -> Result<(), BatchError> {
        if self.contents.is_empty() {
            return Err(BatchError::EmptyFile);
        }
        if self.contents.len() > config.max_upload_bytes {
            return Err(BatchError::TooLarge {
                size: self.contents.len(),
                max: config.max_upload_bytes,
            });
        }
        Ok(())
    }
}

/// Decodes and parses an upload. Line and block problems are part of the
/// outcome; only an unusable upload is an error.
#[tracing::instrument(skip(config, command), fields(size = command.contents.len(), encoding = ?command.encoding))]
pub fn handle(config: &BatchConfig, command: ProcessBatchCommand) -> Result<BatchParseOutcome, BatchError> {
    command.validate(config)?;

    let encoding = command.encoding.as_deref().unwrap_or(&config.default_encoding);
    let text = decode_upload(&command.contents, encoding)?;
    let outcome = parse_batch(&text);

    tracing::info!(
        genesets = outcome.genesets.len(),
        line_errors = outcome.line_errors.len(),
        block_errors = outcome.block_errors.len(),
        "Batch file parsed"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH: &str = "\
! P-Value < 0.05
@ Mus musculus
% MGI
A Public

: first
= Hippocampus genes
+ Genes expressed
+ in the hippocampus
Gnai3\t0.001
Cdc45\t0.01

: second
= Broken
Pam\tnot-a-number
";

    fn command(contents: &[u8]) -> ProcessBatchCommand {
        ProcessBatchCommand {
            contents: contents.to_vec(),
            encoding: None,
        }
    }

    #[test]
    fn test_parses_and_reports() {
        let outcome = handle(&BatchConfig::default(), command(BATCH.as_bytes())).unwrap();

        assert_eq!(outcome.genesets.len(), 1);
        let summary = BatchGenesetSummary::from(&outcome.genesets[0]);
        assert_eq!(summary.label, "first");
        assert_eq!(summary.gene_count, 2);
        assert_eq!(summary.access, GenesetAccess::Public);
        assert_eq!(outcome.genesets[0].description, "Genes expressed in the hippocampus");

        let messages = outcome.messages();
        assert!(messages.has_errors());
        assert_eq!(messages.user_messages.len(), 2);
    }

    #[test]
    fn test_upload_limits() {
        let config = BatchConfig {
            max_upload_bytes: 8,
            ..BatchConfig::default()
        };
        assert!(matches!(handle(&config, command(b"")), Err(BatchError::EmptyFile)));
        assert!(matches!(
            handle(&config, command(BATCH.as_bytes())),
            Err(BatchError::TooLarge { max: 8, .. })
        ));
    }

    #[test]
    fn test_encoding() {
        let latin1 = b"! Binary\n@ Mus musculus\n% MGI\n: a\n= Caf\xe9 genes\nGnai3 1\n";

        let err = handle(&BatchConfig::default(), command(latin1)).unwrap_err();
        assert!(matches!(err, BatchError::Decode(_)));

        let outcome = handle(&BatchConfig::default(), ProcessBatchCommand {
            contents: latin1.to_vec(),
            encoding: Some("latin-1".into()),
        })
        .unwrap();
        assert_eq!(outcome.genesets[0].name, "Café genes");
    }
}
