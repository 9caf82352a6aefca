//! Domain model for the TODO extraction pipeline.
//!
//! # Responsibility
//! - Define the canonical records passed between pipeline stages.
//!
//! # Invariants
//! - Every persisted task is identified by a stable content-derived `task_id`.
//! - Lifecycle flags (`started`, `last_update`, `completed`) are never mutated
//!   by this pipeline; they belong to a human editor or a future workflow tool.

pub mod task;
