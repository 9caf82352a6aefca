use std::fs;
use std::path::Path;
use todoharvest_core::{run_import, ImportOptions, PipelineError};

fn options(input: &Path, taskroot: &Path) -> ImportOptions {
    ImportOptions {
        input: input.to_path_buf(),
        taskroot: taskroot.to_path_buf(),
        note_ext: "md".to_string(),
    }
}

fn store_entries(taskroot: &Path, tag: &str) -> Vec<String> {
    let content = fs::read_to_string(taskroot.join(tag).join("todo.yml")).unwrap();
    yaml_entries(&content)
}

fn yaml_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.strip_prefix("- "))
        .map(|entry| entry.to_string())
        .collect()
}

#[test]
fn missing_input_is_fatal() {
    let taskroot = tempfile::tempdir().unwrap();
    let err = run_import(&options(
        Path::new("/no/such/notes"),
        taskroot.path(),
    ))
    .unwrap_err();
    assert!(matches!(err, PipelineError::Scan(_)));
}

#[test]
fn full_run_routes_tasks_into_per_tag_stores() {
    let notes = tempfile::tempdir().unwrap();
    let taskroot = tempfile::tempdir().unwrap();
    fs::write(
        notes.path().join("daily.md"),
        "# Monday\nTODO buy milk (home)\nTODO ship release (work) [by friday]\nTODO think about life\n",
    )
    .unwrap();

    let summary = run_import(&options(notes.path(), taskroot.path())).unwrap();
    assert_eq!(summary.lines_matched, 3);
    assert_eq!(summary.tasks_extracted, 3);
    assert_eq!(summary.total_added(), 3);
    assert!(summary.failures.is_empty());

    assert_eq!(store_entries(taskroot.path(), "home"), vec!["buy milk"]);
    assert_eq!(store_entries(taskroot.path(), "work"), vec!["ship release"]);
    assert_eq!(
        store_entries(taskroot.path(), "untagged"),
        vec!["think about life"]
    );
}

#[test]
fn second_run_on_unchanged_corpus_adds_nothing() {
    let notes = tempfile::tempdir().unwrap();
    let taskroot = tempfile::tempdir().unwrap();
    fs::write(
        notes.path().join("daily.md"),
        "TODO buy milk (home)\nTODO ship release (work)\n",
    )
    .unwrap();

    let first = run_import(&options(notes.path(), taskroot.path())).unwrap();
    assert_eq!(first.total_added(), 2);

    let second = run_import(&options(notes.path(), taskroot.path())).unwrap();
    assert_eq!(second.total_added(), 0);
    assert_eq!(second.total_duplicates(), 2);
    assert_eq!(store_entries(taskroot.path(), "home"), vec!["buy milk"]);
}

#[test]
fn dedup_holds_against_a_preexisting_store() {
    let notes = tempfile::tempdir().unwrap();
    let taskroot = tempfile::tempdir().unwrap();
    fs::create_dir_all(taskroot.path().join("work")).unwrap();
    fs::write(taskroot.path().join("work").join("todo.yml"), "- buy milk\n").unwrap();
    fs::write(notes.path().join("n.md"), "TODO buy milk (work)\n").unwrap();

    let summary = run_import(&options(notes.path(), taskroot.path())).unwrap();
    let work = summary.merges.get("work").unwrap();
    assert_eq!(work.duplicates, 1);
    assert_eq!(work.added, 0);
    assert_eq!(store_entries(taskroot.path(), "work"), vec!["buy milk"]);
}

#[test]
fn multi_tag_line_lands_in_both_stores_and_is_audited() {
    let notes = tempfile::tempdir().unwrap();
    let taskroot = tempfile::tempdir().unwrap();
    fs::write(notes.path().join("n.md"), "TODO plan trip (work)(personal)\n").unwrap();

    let summary = run_import(&options(notes.path(), taskroot.path())).unwrap();
    assert_eq!(summary.tasks_extracted, 2);
    assert_eq!(store_entries(taskroot.path(), "work"), vec!["plan trip"]);
    assert_eq!(store_entries(taskroot.path(), "personal"), vec!["plan trip"]);

    assert_eq!(summary.audit.multi_tagged.len(), 1);
    assert_eq!(summary.audit.multi_tagged[0].task_text, "plan trip");
}

#[test]
fn corrupt_store_fails_its_tag_only() {
    let notes = tempfile::tempdir().unwrap();
    let taskroot = tempfile::tempdir().unwrap();
    fs::create_dir_all(taskroot.path().join("urgent")).unwrap();
    fs::write(
        taskroot.path().join("urgent").join("todo.yml"),
        "broken: {nested: map}\n",
    )
    .unwrap();
    fs::write(
        notes.path().join("n.md"),
        "TODO fix boiler (urgent)\nTODO ship release (work)\n",
    )
    .unwrap();

    let summary = run_import(&options(notes.path(), taskroot.path())).unwrap();
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].tag, "urgent");
    assert_eq!(store_entries(taskroot.path(), "work"), vec!["ship release"]);
}

#[test]
fn report_lines_cover_counts_and_audit_findings() {
    let notes = tempfile::tempdir().unwrap();
    let taskroot = tempfile::tempdir().unwrap();
    fs::write(notes.path().join("n.md"), "TODO plan trip (work)(personal)\n").unwrap();

    let summary = run_import(&options(notes.path(), taskroot.path())).unwrap();
    let report = summary.report_lines().join("\n");
    assert!(report.contains("work: 1 found"));
    assert!(report.contains("personal: 1 found"));
    assert!(report.contains("audit: task"));
}
