//! Multi-tag and duplicate-identity audit.
//!
//! # Responsibility
//! - Flag tasks claimed by more than one tag, and tasks appearing more than
//!   once within the same tag's exploded set.
//!
//! # Invariants
//! - The audit is diagnostic only: it never blocks a run and never mutates
//!   the batch or any store.
//! - Findings are ordered deterministically by task id.

use crate::model::task::ExtractedTask;
use log::info;
use std::collections::BTreeMap;

/// One offending task identity with the tags that claim it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFinding {
    pub task_id: String,
    pub task_text: String,
    /// Distinct tags claiming this id, sorted.
    pub tags: Vec<String>,
}

/// Full audit result over one in-memory batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Ids associated with more than one tag.
    pub multi_tagged: Vec<AuditFinding>,
    /// Ids appearing more than once within a single tag's exploded set.
    pub intra_tag_duplicates: Vec<AuditFinding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.multi_tagged.is_empty() && self.intra_tag_duplicates.is_empty()
    }
}

/// Audits the batch for multi-tag claims and same-tag duplicate identities.
///
/// A task id under several tags is legitimate (one line, several tags) but
/// worth surfacing; the same id twice under one tag means the batch itself
/// carries a duplicate.
pub fn audit_batch(batch: &[ExtractedTask]) -> AuditReport {
    // task_id -> (task_text, tag -> occurrence count)
    let mut by_id: BTreeMap<&str, (&str, BTreeMap<&str, usize>)> = BTreeMap::new();
    for task in batch {
        let entry = by_id
            .entry(task.task_id.as_str())
            .or_insert_with(|| (task.task_text.as_str(), BTreeMap::new()));
        *entry.1.entry(task.tag.as_str()).or_insert(0) += 1;
    }

    let mut report = AuditReport::default();
    for (task_id, (task_text, tag_counts)) in &by_id {
        let finding = |tags: Vec<String>| AuditFinding {
            task_id: (*task_id).to_string(),
            task_text: (*task_text).to_string(),
            tags,
        };
        if tag_counts.len() > 1 {
            report
                .multi_tagged
                .push(finding(tag_counts.keys().map(|t| t.to_string()).collect()));
        }
        let repeated: Vec<String> = tag_counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(tag, _)| tag.to_string())
            .collect();
        if !repeated.is_empty() {
            report.intra_tag_duplicates.push(finding(repeated));
        }
    }

    if report.is_clean() {
        info!("event=audit module=audit status=ok findings=0");
    } else {
        info!(
            "event=audit module=audit status=ok multi_tagged={} intra_tag_duplicates={}",
            report.multi_tagged.len(),
            report.intra_tag_duplicates.len()
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::audit_batch;
    use crate::extract::explode_line;
    use crate::model::task::NoteLine;

    fn batch(lines: &[&str]) -> Vec<crate::model::task::ExtractedTask> {
        lines
            .iter()
            .flat_map(|text| explode_line(&NoteLine::new("notes/t.md", *text)))
            .collect()
    }

    #[test]
    fn clean_batch_has_no_findings() {
        let report = audit_batch(&batch(&["TODO buy milk (home)", "TODO ship it (work)"]));
        assert!(report.is_clean());
    }

    #[test]
    fn multi_tag_line_is_reported_once() {
        let report = audit_batch(&batch(&["TODO plan trip (work)(personal)"]));
        assert_eq!(report.multi_tagged.len(), 1);
        assert_eq!(report.multi_tagged[0].task_text, "plan trip");
        assert_eq!(
            report.multi_tagged[0].tags,
            vec!["personal".to_string(), "work".to_string()]
        );
        assert!(report.intra_tag_duplicates.is_empty());
    }

    #[test]
    fn same_tag_duplicate_is_reported() {
        let report = audit_batch(&batch(&["TODO buy milk (home)", "todo buy milk (home)"]));
        assert!(report.multi_tagged.is_empty());
        assert_eq!(report.intra_tag_duplicates.len(), 1);
        assert_eq!(report.intra_tag_duplicates[0].tags, vec!["home".to_string()]);
    }

    #[test]
    fn same_text_under_two_tags_on_two_lines_is_multi_tagged() {
        let report = audit_batch(&batch(&["TODO buy milk (home)", "TODO buy milk (errands)"]));
        assert_eq!(report.multi_tagged.len(), 1);
    }
}
