pub mod process;

pub use process::{BatchError, BatchGenesetSummary, BatchResponse, ProcessBatchCommand};
