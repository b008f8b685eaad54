//! Business logic layer

pub mod classifier;
pub mod ingest;

pub use classifier::{auto_group, AutoGroupOptions, GroupDiff, GroupingSummary};
pub use ingest::{ingest, IngestOptions, IngestOutcome};
