//! Repository-wide aggregation of per-file records.
//!
//! The builder waits for a complete batch, summarizes each file and
//! resolves imports between files of the batch.

mod builder;
mod resolve;

pub use builder::{FileSummary, GraphBuilder, RepositoryGraph};
pub use resolve::{parse_go_module, ImportResolution, ImportResolver};
