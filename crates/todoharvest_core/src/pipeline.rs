//! One-shot import pipeline orchestration.
//!
//! # Responsibility
//! - Run Scan -> Extract -> Audit -> Merge as a single linear batch.
//! - Collect per-stage counts into a run summary for logging and reporting.
//!
//! # Invariants
//! - The whole corpus is read into memory before any store is mutated.
//! - A failed tag merge never stops the remaining tags.
//! - Detected duplicates are always counted, never silently dropped.

use crate::audit::{audit_batch, AuditReport};
use crate::extract::explode_line;
use crate::model::task::ExtractedTask;
use crate::scan::{scan_notes, ScanError};
use crate::store::{MergeOutcome, StoreError, TagStore};
use log::{error, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Inputs for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Note file or directory to scan.
    pub input: PathBuf,
    /// Root directory holding the per-tag stores.
    pub taskroot: PathBuf,
    /// Note file extension (without dot) used when `input` is a directory.
    pub note_ext: String,
}

/// One tag whose merge failed while the rest of the run continued.
#[derive(Debug)]
pub struct TagFailure {
    pub tag: String,
    pub error: StoreError,
}

/// Per-stage counts and outcomes for one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub lines_matched: usize,
    pub tasks_extracted: usize,
    /// Merge outcome per tag, in tag order.
    pub merges: BTreeMap<String, MergeOutcome>,
    /// Tags whose merge failed.
    pub failures: Vec<TagFailure>,
    pub audit: AuditReport,
}

impl RunSummary {
    pub fn total_added(&self) -> usize {
        self.merges.values().map(|m| m.added).sum()
    }

    pub fn total_duplicates(&self) -> usize {
        self.merges.values().map(|m| m.duplicates).sum()
    }

    /// Plain report lines suitable for printing or handing to the external
    /// note-composer collaborator.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "scanned {} file(s) ({} skipped), {} TODO line(s), {} task(s) extracted",
            self.files_scanned, self.files_skipped, self.lines_matched, self.tasks_extracted
        )];
        for (tag, outcome) in &self.merges {
            lines.push(format!(
                "{tag}: {} found, {} duplicate(s) dropped, {} added",
                outcome.found, outcome.duplicates, outcome.added
            ));
        }
        for failure in &self.failures {
            lines.push(format!("{}: merge failed: {}", failure.tag, failure.error));
        }
        for finding in &self.audit.multi_tagged {
            lines.push(format!(
                "audit: task {} (`{}`) claimed by tags: {}",
                finding.task_id,
                finding.task_text,
                finding.tags.join(", ")
            ));
        }
        for finding in &self.audit.intra_tag_duplicates {
            lines.push(format!(
                "audit: task {} (`{}`) duplicated within tag(s): {}",
                finding.task_id,
                finding.task_text,
                finding.tags.join(", ")
            ));
        }
        lines
    }
}

/// Fatal pipeline error; everything else is tolerated at file or tag
/// granularity and recorded in the summary instead.
#[derive(Debug)]
pub enum PipelineError {
    Scan(ScanError),
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scan(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Scan(err) => Some(err),
        }
    }
}

impl From<ScanError> for PipelineError {
    fn from(value: ScanError) -> Self {
        Self::Scan(value)
    }
}

/// Runs the full import batch: scan, extract, audit, merge.
///
/// # Errors
/// - `PipelineError::Scan` when the input path does not exist. Unreadable
///   files and corrupt tag stores are recorded in the summary, not raised.
pub fn run_import(options: &ImportOptions) -> Result<RunSummary, PipelineError> {
    let scan = scan_notes(&options.input, &options.note_ext)?;

    let batch: Vec<ExtractedTask> = scan.lines.iter().flat_map(explode_line).collect();
    info!(
        "event=extract module=pipeline status=ok lines={} tasks={}",
        scan.lines.len(),
        batch.len()
    );

    let mut summary = RunSummary {
        files_scanned: scan.files_scanned,
        files_skipped: scan.files_skipped,
        lines_matched: scan.lines.len(),
        tasks_extracted: batch.len(),
        audit: audit_batch(&batch),
        ..RunSummary::default()
    };

    let mut by_tag: BTreeMap<String, Vec<ExtractedTask>> = BTreeMap::new();
    for task in batch {
        by_tag.entry(task.tag.clone()).or_default().push(task);
    }

    for (tag, tasks) in by_tag {
        let store = TagStore::open(&options.taskroot, &tag);
        match store.merge(&tasks) {
            Ok(outcome) => {
                summary.merges.insert(tag, outcome);
            }
            Err(err) => {
                error!(
                    "event=merge module=pipeline status=error tag={} error={}",
                    tag, err
                );
                summary.failures.push(TagFailure { tag, error: err });
            }
        }
    }

    info!(
        "event=run module=pipeline status=ok added={} duplicates={} failed_tags={}",
        summary.total_added(),
        summary.total_duplicates(),
        summary.failures.len()
    );
    Ok(summary)
}
