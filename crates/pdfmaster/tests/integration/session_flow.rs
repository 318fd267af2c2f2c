//! End-to-end session behaviour: intake, list edits, merge, download, reset.

use rstest::rstest;
use tempfile::TempDir;

use pdfmaster::download::{DirectorySink, MemorySink, merged_filename_today};
use pdfmaster::files::{Direction, FileHandle, FileId};
use pdfmaster::intake::{IntakeSource, handles_from_patterns, handles_from_paths};
use pdfmaster::session::{RESET_PROMPT, VALIDATION_ERROR_MESSAGE};
use pdfmaster::state::{Phase, ViewMode};

use crate::common::{fast_session, marked_pdf, page_markers, pdf_handle, write_fixture};

fn names(session: &pdfmaster::MergeSession<MemorySink>) -> Vec<String> {
    session
        .files()
        .iter()
        .map(|f| f.file.name().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_flow_writes_dated_download() {
    let inputs = TempDir::new().unwrap();
    let downloads = TempDir::new().unwrap();
    let a = write_fixture(inputs.path(), "a.pdf", &marked_pdf("A", 2));
    let b = write_fixture(inputs.path(), "b.pdf", &marked_pdf("B", 3));

    let mut session = fast_session(DirectorySink::new(downloads.path()));
    let added = session
        .add_files(IntakeSource::Picker, handles_from_paths(&[a, b]).unwrap())
        .unwrap();
    assert_eq!(added, 2);

    let report = session.merge().await.unwrap();

    let expected = downloads.path().join(merged_filename_today());
    assert_eq!(report.delivered.location.as_deref(), Some(expected.as_path()));
    assert_eq!(report.statistics.total_pages, 5);

    let written = std::fs::read(&expected).unwrap();
    assert_eq!(written.len() as u64, report.statistics.output_size);
    assert_eq!(page_markers(&written).len(), 5);

    let entries: Vec<_> = std::fs::read_dir(downloads.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "temporary file left behind");

    assert_eq!(session.state().phase(), Phase::Idle);
    assert_eq!(session.files().len(), 2);
}

#[tokio::test]
async fn test_glob_intake_preserves_sorted_order() {
    let inputs = TempDir::new().unwrap();
    write_fixture(inputs.path(), "ch2.pdf", &marked_pdf("2", 1));
    write_fixture(inputs.path(), "ch1.pdf", &marked_pdf("1", 1));

    let pattern = inputs.path().join("ch*.pdf").display().to_string();
    let sink = MemorySink::new();
    let mut session = fast_session(sink.clone());
    session
        .add_files(IntakeSource::Drop, handles_from_patterns([pattern]).unwrap())
        .unwrap();

    assert_eq!(names(&session), vec!["ch1.pdf", "ch2.pdf"]);

    session.merge().await.unwrap();
    assert_eq!(page_markers(&sink.downloads()[0].bytes), vec!["1-1", "2-1"]);
}

#[test]
fn test_intake_appends_after_existing_entries() {
    let mut session = fast_session(MemorySink::new());
    session
        .add_files(IntakeSource::Picker, vec![pdf_handle("a.pdf", vec![])])
        .unwrap();
    session
        .add_files(
            IntakeSource::Picker,
            vec![pdf_handle("b.pdf", vec![]), pdf_handle("a.pdf", vec![])],
        )
        .unwrap();

    assert_eq!(names(&session), vec!["a.pdf", "b.pdf", "a.pdf"]);
}

#[test]
fn test_drop_and_picker_filtering_differs() {
    let batch = || {
        vec![
            pdf_handle("a.pdf", vec![]),
            FileHandle::from_bytes("notes.txt", "text/plain", b"hi".to_vec()),
        ]
    };

    let mut dropped = fast_session(MemorySink::new());
    assert_eq!(dropped.add_files(IntakeSource::Drop, batch()).unwrap(), 1);

    let mut picked = fast_session(MemorySink::new());
    assert_eq!(picked.add_files(IntakeSource::Picker, batch()).unwrap(), 2);
}

#[rstest]
#[case(0, Direction::TowardStart)]
#[case(2, Direction::TowardEnd)]
#[case(7, Direction::TowardStart)]
#[case(7, Direction::TowardEnd)]
fn test_reorder_out_of_bounds_is_ignored(#[case] index: usize, #[case] direction: Direction) {
    let mut session = fast_session(MemorySink::new());
    session
        .add_files(
            IntakeSource::Picker,
            ["a.pdf", "b.pdf", "c.pdf"].map(|n| pdf_handle(n, vec![])),
        )
        .unwrap();

    assert!(!session.move_file(index, direction).unwrap());
    assert_eq!(names(&session), vec!["a.pdf", "b.pdf", "c.pdf"]);
}

#[rstest]
#[case(0, Direction::TowardEnd, ["b.pdf", "a.pdf", "c.pdf"])]
#[case(1, Direction::TowardStart, ["b.pdf", "a.pdf", "c.pdf"])]
#[case(1, Direction::TowardEnd, ["a.pdf", "c.pdf", "b.pdf"])]
#[case(2, Direction::TowardStart, ["a.pdf", "c.pdf", "b.pdf"])]
fn test_reorder_swaps_neighbours(
    #[case] index: usize,
    #[case] direction: Direction,
    #[case] expected: [&str; 3],
) {
    let mut session = fast_session(MemorySink::new());
    session
        .add_files(
            IntakeSource::Picker,
            ["a.pdf", "b.pdf", "c.pdf"].map(|n| pdf_handle(n, vec![])),
        )
        .unwrap();

    assert!(session.move_file(index, direction).unwrap());
    assert_eq!(names(&session), expected);
}

#[test]
fn test_removal_is_idempotent() {
    let mut session = fast_session(MemorySink::new());
    session
        .add_files(
            IntakeSource::Picker,
            vec![pdf_handle("a.pdf", vec![]), pdf_handle("b.pdf", vec![])],
        )
        .unwrap();
    let id = session.files().as_slice()[0].id.clone();

    assert!(session.remove(&id).unwrap());
    assert!(!session.remove(&id).unwrap());
    assert!(!session.remove(&FileId::from("no-such-id")).unwrap());
    assert_eq!(names(&session), vec!["b.pdf"]);
}

#[tokio::test]
async fn test_validation_error_then_intake_clears_it() {
    let mut session = fast_session(MemorySink::new());

    assert!(session.merge().await.unwrap_err().is_validation());
    assert_eq!(session.state().error.as_deref(), Some(VALIDATION_ERROR_MESSAGE));

    session
        .add_files(IntakeSource::Picker, vec![pdf_handle("a.pdf", vec![])])
        .unwrap();
    assert_eq!(session.state().phase(), Phase::Idle);
}

#[test]
fn test_reset_needs_confirmation() {
    let mut session = fast_session(MemorySink::new());
    session
        .add_files(IntakeSource::Picker, vec![pdf_handle("a.pdf", vec![])])
        .unwrap();

    assert!(!session.reset(&|prompt: &str| {
        assert_eq!(prompt, RESET_PROMPT);
        false
    }));
    assert_eq!(session.files().len(), 1);

    assert!(session.reset(&|_: &str| true));
    assert!(session.files().is_empty());
    assert_eq!(session.state().phase(), Phase::Idle);
}

#[tokio::test]
async fn test_view_switch_keeps_list() {
    let mut session = fast_session(MemorySink::new());
    session
        .add_files(
            IntakeSource::Picker,
            vec![
                pdf_handle("a.pdf", marked_pdf("A", 1)),
                pdf_handle("b.pdf", marked_pdf("B", 1)),
            ],
        )
        .unwrap();

    session.set_view_mode(ViewMode::Split);
    assert!(session.merge().await.is_err());
    assert_eq!(session.files().len(), 2);

    session.set_view_mode(ViewMode::Merge);
    assert!(session.merge().await.is_ok());
}

#[test]
fn test_snapshot_lists_files_in_order() {
    let mut session = fast_session(MemorySink::new());
    session
        .add_files(
            IntakeSource::Picker,
            vec![pdf_handle("b.pdf", vec![0; 10]), pdf_handle("a.pdf", vec![0; 20])],
        )
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&session.snapshot().to_json().unwrap()).unwrap();
    assert_eq!(json["files"][0]["name"], "b.pdf");
    assert_eq!(json["files"][1]["size"], 20);
    assert_eq!(json["files"][1]["mimeType"], "application/pdf");
    assert_eq!(json["status"]["error"], serde_json::Value::Null);
}
