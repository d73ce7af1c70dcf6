//! Parsers for user-supplied geneset files
//!
//! - [`batch`]: the multi-geneset batch upload format
//! - [`score`]: the score header grammar (`P-Value < 0.05`, `Binary`, ...)
//! - [`encoding`]: decoding raw upload bytes into text

pub mod batch;
pub mod encoding;
pub mod score;

pub use batch::{parse_batch, BatchGeneset, BatchParseOutcome, BatchParser, ParserState};
pub use encoding::decode_upload;
pub use score::parse_score;
