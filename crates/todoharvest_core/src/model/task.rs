//! Task records produced by the scan and extraction stages.
//!
//! # Responsibility
//! - Define the ephemeral scan unit (`NoteLine`) and the unit of work
//!   (`ExtractedTask`).
//!
//! # Invariants
//! - `task_id` is a deterministic digest of `task_text` only; tag, timeline
//!   and source file never influence it.
//! - A `NoteLine` lives for one scan pass and is never persisted.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One raw line from one note file, kept only while a scan pass runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLine {
    /// File the line was read from.
    pub source_path: PathBuf,
    /// Raw line text, untrimmed.
    pub raw_line: String,
}

impl NoteLine {
    pub fn new(source_path: impl Into<PathBuf>, raw_line: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            raw_line: raw_line.into(),
        }
    }
}

/// The unit of work flowing from extraction into merge and audit.
///
/// One note line with several tags explodes into several records sharing the
/// same `task_text` and `task_id` but distinct `tag` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTask {
    /// File the task was found in.
    pub source_path: PathBuf,
    /// Original line text, for traceability in reports.
    pub raw_line: String,
    /// Routing tag, `"untagged"` when the line carried no tag annotation.
    pub tag: String,
    /// Informal deadline parsed from a `[by ...]` / `[before ...]` annotation.
    pub timeline_hint: Option<String>,
    /// Canonical task text used for storage and identity.
    pub task_text: String,
    /// Hex-encoded SHA-1 of `task_text`.
    pub task_id: String,
    /// Lifecycle flags, initialized false and owned by downstream tooling.
    pub started: bool,
    pub last_update: bool,
    pub completed: bool,
}
