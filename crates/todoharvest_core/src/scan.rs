//! Note corpus scanner.
//!
//! # Responsibility
//! - Enumerate note files under a file or directory input.
//! - Keep only lines containing the TODO marker, in stable order.
//!
//! # Invariants
//! - Output order is file discovery order, then line order within a file;
//!   downstream semantics do not depend on it but test fixtures do.
//! - An unreadable file is skipped with a warning; the rest of the corpus is
//!   still scanned.
//! - A file with zero matching lines contributes nothing and is not an error.

use crate::grammar::TODO_MARKER;
use crate::model::task::NoteLine;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub type ScanResult<T> = Result<T, ScanError>;

/// Scanner error for precondition failures.
#[derive(Debug)]
pub enum ScanError {
    /// The scan input path does not exist.
    MissingInput(PathBuf),
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInput(path) => write!(f, "scan input does not exist: {}", path.display()),
        }
    }
}

impl Error for ScanError {}

/// Scan output plus file-level observability counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Marker-bearing lines in discovery order.
    pub lines: Vec<NoteLine>,
    /// Files read successfully.
    pub files_scanned: usize,
    /// Files and directory entries skipped because they could not be read.
    pub files_skipped: usize,
}

/// Scans one file or a directory tree of note files for marker-bearing lines.
///
/// A directory input is walked recursively and filtered to `note_ext`
/// (extension without the dot); a single-file input is used directly
/// regardless of extension.
///
/// # Errors
/// - `ScanError::MissingInput` when `input` does not exist. Individual
///   unreadable files are not errors; they are skipped and counted.
pub fn scan_notes(input: &Path, note_ext: &str) -> ScanResult<ScanOutcome> {
    if !input.exists() {
        return Err(ScanError::MissingInput(input.to_path_buf()));
    }

    let (files, walk_skips) = if input.is_dir() {
        collect_note_files(input, note_ext)
    } else {
        (vec![input.to_path_buf()], 0)
    };

    let mut outcome = ScanOutcome {
        lines: Vec::new(),
        files_scanned: 0,
        files_skipped: walk_skips,
    };

    for file in files {
        match std::fs::read_to_string(&file) {
            Ok(content) => {
                outcome.files_scanned += 1;
                for line in content.lines() {
                    if line.to_lowercase().contains(TODO_MARKER) {
                        outcome.lines.push(NoteLine::new(file.clone(), line));
                    }
                }
            }
            Err(err) => {
                outcome.files_skipped += 1;
                warn!(
                    "event=scan module=scan status=warn reason=unreadable_file path={} error={}",
                    file.display(),
                    err
                );
            }
        }
    }

    info!(
        "event=scan module=scan status=ok files_scanned={} files_skipped={} lines_matched={}",
        outcome.files_scanned,
        outcome.files_skipped,
        outcome.lines.len()
    );
    Ok(outcome)
}

/// Walks `dir` recursively, collecting note files in deterministic name order.
///
/// Returns the files found plus the number of entries skipped because the
/// walk could not read them (e.g. an unreadable subdirectory).
fn collect_note_files(dir: &Path, note_ext: &str) -> (Vec<PathBuf>, usize) {
    let mut files = Vec::new();
    let mut skipped = 0;
    for entry in WalkDir::new(dir).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(note_ext))
                {
                    files.push(entry.path().to_path_buf());
                }
            }
            Err(err) => {
                skipped += 1;
                warn!(
                    "event=scan module=scan status=warn reason=walk_error error={}",
                    err
                );
            }
        }
    }
    (files, skipped)
}

#[cfg(test)]
mod tests {
    use super::{scan_notes, ScanError};
    use std::fs;
    use std::path::Path;

    #[test]
    fn missing_input_fails_fast() {
        let err = scan_notes(Path::new("/definitely/not/here"), "md").unwrap_err();
        assert!(matches!(err, ScanError::MissingInput(_)));
    }

    #[test]
    fn directory_scan_filters_by_marker_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.md"),
            "just prose\nTODO buy milk\nmore prose\n",
        )
        .unwrap();
        fs::write(dir.path().join("b.txt"), "TODO not a note file\n").unwrap();
        fs::write(dir.path().join("c.md"), "no markers here\n").unwrap();

        let outcome = scan_notes(dir.path(), "md").unwrap();
        assert_eq!(outcome.files_scanned, 2);
        assert_eq!(outcome.lines.len(), 1);
        assert_eq!(outcome.lines[0].raw_line, "TODO buy milk");
    }

    #[test]
    fn single_file_input_ignores_extension_filter() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scratch.txt");
        fs::write(&file, "todo lowercase marker works\n").unwrap();

        let outcome = scan_notes(&file, "md").unwrap();
        assert_eq!(outcome.files_scanned, 1);
        assert_eq!(outcome.lines.len(), 1);
    }

    #[test]
    fn undecodable_file_is_skipped_and_rest_of_corpus_scans() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.md"), "TODO buy milk\n").unwrap();
        // Not valid UTF-8, so reading it as text fails.
        fs::write(dir.path().join("bad.md"), b"\xff\xfeTODO broken\n").unwrap();

        let outcome = scan_notes(dir.path(), "md").unwrap();
        assert_eq!(outcome.files_scanned, 1);
        assert_eq!(outcome.files_skipped, 1);
        assert_eq!(outcome.lines.len(), 1);
        assert_eq!(outcome.lines[0].raw_line, "TODO buy milk");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_counts_as_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("open.md"), "TODO buy milk\n").unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("hidden.md"), "TODO invisible\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read the directory anyway; only assert a skip
        // when access is actually denied.
        let denied = fs::read_dir(&locked).is_err();
        let outcome = scan_notes(dir.path(), "md").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(outcome.lines[0].raw_line, "TODO buy milk");
        if denied {
            assert_eq!(outcome.lines.len(), 1);
            assert!(outcome.files_skipped >= 1);
        }
    }

    #[test]
    fn discovery_order_is_stable_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "TODO second\n").unwrap();
        fs::write(dir.path().join("a.md"), "TODO first\n").unwrap();

        let outcome = scan_notes(dir.path(), "md").unwrap();
        assert_eq!(outcome.lines[0].raw_line, "TODO first");
        assert_eq!(outcome.lines[1].raw_line, "TODO second");
    }
}
