//! Core domain logic for todoharvest.
//! This crate is the single source of truth for extraction and merge invariants.

pub mod activity;
pub mod audit;
pub mod extract;
pub mod grammar;
pub mod ident;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod scan;
pub mod store;

pub use audit::{audit_batch, AuditFinding, AuditReport};
pub use extract::{explode_line, UNTAGGED_TAG};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{ExtractedTask, NoteLine};
pub use pipeline::{run_import, ImportOptions, PipelineError, RunSummary, TagFailure};
pub use scan::{scan_notes, ScanError, ScanOutcome, ScanResult};
pub use store::{MergeOutcome, StoreError, StoreResult, TagStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
