//! Task normalization and tag explosion.
//!
//! # Responsibility
//! - Turn one marker-bearing note line into zero-or-more `ExtractedTask`
//!   records, one per tag.
//! - Produce the canonical `task_text` used for storage and identity.
//!
//! # Invariants
//! - Two lines that differ only in tag/timeline annotation normalize to the
//!   identical `task_text`; deduplication across re-tagging edits depends on
//!   this.
//! - A line with no tag annotation is routed to the `"untagged"` sentinel.
//! - At most one timeline hint per line is honored; extras are dropped with a
//!   warning instead of cross-producting.

use crate::grammar;
use crate::ident;
use crate::model::task::{ExtractedTask, NoteLine};
use log::warn;

/// Sentinel tag for lines with no tag annotation.
pub const UNTAGGED_TAG: &str = "untagged";

/// Returns the lowercased text after the marker keyword, with the leading
/// separator and list marker removed.
///
/// A line without the marker is used whole; the scanner normally guarantees
/// the marker is present, but normalization stays total either way.
fn marker_suffix(raw_line: &str) -> String {
    let lower = raw_line.to_lowercase();
    let rest = match lower.find(grammar::TODO_MARKER) {
        Some(idx) => &lower[idx + grammar::TODO_MARKER.len()..],
        None => lower.as_str(),
    };
    let rest = rest.trim();
    let rest = rest.strip_prefix(':').unwrap_or(rest).trim_start();
    let rest = rest.strip_prefix("- ").unwrap_or(rest);
    rest.trim().to_string()
}

/// Explodes one note line into `ExtractedTask` records, one per tag.
///
/// Returns an empty vec when nothing remains after stripping annotations;
/// such lines carry no storable task text and are logged.
pub fn explode_line(line: &NoteLine) -> Vec<ExtractedTask> {
    let canonical = grammar::rewrite_legacy(&marker_suffix(&line.raw_line));

    let mut tags = grammar::find_tags(&canonical);
    let mut timelines = grammar::find_timelines(&canonical);
    if timelines.len() > 1 {
        warn!(
            "event=extract module=extract status=warn reason=extra_timeline_hints kept=1 dropped={} source={}",
            timelines.len() - 1,
            line.source_path.display()
        );
        timelines.truncate(1);
    }
    let timeline_hint = timelines.pop();

    let task_text = grammar::strip_annotations(&canonical);
    if task_text.is_empty() {
        warn!(
            "event=extract module=extract status=warn reason=empty_task_text source={}",
            line.source_path.display()
        );
        return Vec::new();
    }
    let task_id = ident::content_id(&task_text);

    if tags.is_empty() {
        tags.push(UNTAGGED_TAG.to_string());
    }

    tags.into_iter()
        .map(|tag| ExtractedTask {
            source_path: line.source_path.clone(),
            raw_line: line.raw_line.clone(),
            tag,
            timeline_hint: timeline_hint.clone(),
            task_text: task_text.clone(),
            task_id: task_id.clone(),
            started: false,
            last_update: false,
            completed: false,
        })
        .collect()
}
