//! Tag and timeline annotation grammar.
//!
//! # Responsibility
//! - Hold the named, versioned patterns for tag and timeline annotations.
//! - Rewrite known legacy annotation spellings before extraction runs.
//!
//! # Invariants
//! - Patterns are applied to marker-stripped, lowercased text only.
//! - Grammar changes bump `GRAMMAR_VERSION`; merge logic never depends on
//!   pattern internals.

use once_cell::sync::Lazy;
use regex::Regex;

/// Version of the annotation grammar below.
pub const GRAMMAR_VERSION: &str = "v1";

/// Case-insensitive substring that flags a note line as an actionable task.
pub const TODO_MARKER: &str = "todo";

/// A tag is a parenthesized token of lowercase word characters.
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([a-z0-9_-]+)\)").expect("valid tag regex"));

/// A timeline hint is a bracketed `by ...` / `before ...` annotation.
/// The captured value keeps the keyword, e.g. `by 2024-01-01`.
static TIMELINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[((?:by|before)\b[^\]]*)\]").expect("valid timeline regex"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Historical spelling of the tech tag, bracketed instead of parenthesized.
const LEGACY_TECH: &str = "[tech]";
const CANONICAL_TECH: &str = "(tech)";

/// Rewrites known legacy annotation spellings to their canonical form.
///
/// Applied before the grammar runs so task text stored under the old spelling
/// stays continuous with text stored under the new one.
pub fn rewrite_legacy(text: &str) -> String {
    text.replace(LEGACY_TECH, CANONICAL_TECH)
}

/// Returns all tag labels found in `text`, in match order, without parentheses.
pub fn find_tags(text: &str) -> Vec<String> {
    TAG_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Returns all timeline hints found in `text`, in match order, trimmed,
/// keyword included.
pub fn find_timelines(text: &str) -> Vec<String> {
    TIMELINE_RE
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Removes all tag and timeline annotations from `text` and collapses the
/// whitespace left behind.
pub fn strip_annotations(text: &str) -> String {
    let without_tags = TAG_RE.replace_all(text, "");
    let without_timelines = TIMELINE_RE.replace_all(&without_tags, "");
    WHITESPACE_RE
        .replace_all(&without_timelines, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{find_tags, find_timelines, rewrite_legacy, strip_annotations};

    #[test]
    fn finds_multiple_tags_in_order() {
        assert_eq!(
            find_tags("plan trip (work)(personal)"),
            vec!["work".to_string(), "personal".to_string()]
        );
    }

    #[test]
    fn tag_pattern_rejects_uppercase_and_spaces() {
        assert!(find_tags("task (Work)").is_empty());
        assert!(find_tags("task (two words)").is_empty());
        assert_eq!(find_tags("task (my_tag-2)"), vec!["my_tag-2".to_string()]);
    }

    #[test]
    fn finds_by_and_before_timelines() {
        assert_eq!(
            find_timelines("x [by 2024-01-01] y [before friday]"),
            vec!["by 2024-01-01".to_string(), "before friday".to_string()]
        );
    }

    #[test]
    fn timeline_keyword_needs_word_boundary() {
        assert!(find_timelines("task [byzantine]").is_empty());
        assert!(find_timelines("task [someday]").is_empty());
    }

    #[test]
    fn legacy_tech_bracket_becomes_parenthetical() {
        assert_eq!(rewrite_legacy("fix ci [tech]"), "fix ci (tech)");
        assert_eq!(rewrite_legacy("nothing here"), "nothing here");
    }

    #[test]
    fn strip_annotations_collapses_leftover_whitespace() {
        assert_eq!(
            strip_annotations("some task (work) [by 2024-01-01]"),
            "some task"
        );
        assert_eq!(strip_annotations("plan (a) trip (b)"), "plan trip");
    }
}
