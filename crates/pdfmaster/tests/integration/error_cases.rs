//! Failure handling: bad inputs, too few files, failed delivery.

use rstest::rstest;
use tempfile::TempDir;

use pdfmaster::download::{DirectorySink, MemorySink};
use pdfmaster::error::PdfMasterError;
use pdfmaster::files::FileHandle;
use pdfmaster::intake::{IntakeSource, handles_from_patterns};
use pdfmaster::merge::merge_files;
use pdfmaster::session::PROCESSING_ERROR_MESSAGE;
use pdfmaster::state::Phase;

use crate::common::{FailingSink, fast_session, marked_pdf, pdf_handle, uploaded};

#[rstest]
#[case(0)]
#[case(1)]
#[tokio::test]
async fn test_too_few_files_rejected_without_loading(#[case] count: usize) {
    // Unparsable content: loading would fail differently.
    let files: Vec<_> = (0..count)
        .map(|i| uploaded(&format!("{i}.pdf"), b"not a pdf".to_vec()))
        .collect();

    let err = merge_files(&files).await.unwrap_err();

    assert!(matches!(err, PdfMasterError::NotEnoughFiles { found } if found == count));
}

#[tokio::test]
async fn test_parse_failure_aborts_and_delivers_nothing() {
    let sink = MemorySink::new();
    let mut session = fast_session(sink.clone());
    session
        .add_files(
            IntakeSource::Picker,
            vec![
                pdf_handle("good.pdf", marked_pdf("A", 2)),
                pdf_handle("bad.pdf", b"this is not a pdf".to_vec()),
                pdf_handle("also-good.pdf", marked_pdf("B", 1)),
            ],
        )
        .unwrap();

    let err = session.merge().await.unwrap_err();

    assert!(err.is_processing());
    assert!(matches!(err, PdfMasterError::FailedToLoadPdf { ref name, .. } if name == "bad.pdf"));
    assert_eq!(session.state().phase(), Phase::Error);
    assert_eq!(session.state().error.as_deref(), Some(PROCESSING_ERROR_MESSAGE));
    assert!(session.state().message.is_empty());
    assert!(sink.is_empty());
    assert_eq!(session.files().len(), 3);
}

#[tokio::test]
async fn test_picker_accepts_non_pdf_which_then_fails_merge() {
    let sink = MemorySink::new();
    let mut session = fast_session(sink.clone());
    session
        .add_files(
            IntakeSource::Picker,
            vec![
                pdf_handle("a.pdf", marked_pdf("A", 1)),
                notes_handle(),
            ],
        )
        .unwrap();

    assert!(session.merge().await.unwrap_err().is_processing());
    assert!(sink.is_empty());
}

fn notes_handle() -> FileHandle {
    FileHandle::from_bytes("notes.txt", "text/plain", b"meeting notes".to_vec())
}

#[tokio::test]
async fn test_delivery_failure_sets_error() {
    let mut session = fast_session(FailingSink);
    session
        .add_files(
            IntakeSource::Picker,
            vec![
                pdf_handle("a.pdf", marked_pdf("A", 1)),
                pdf_handle("b.pdf", marked_pdf("B", 1)),
            ],
        )
        .unwrap();

    let err = session.merge().await.unwrap_err();

    assert!(matches!(err, PdfMasterError::FailedToWrite { .. }));
    assert_eq!(session.state().error.as_deref(), Some(PROCESSING_ERROR_MESSAGE));
    assert!(!session.state().is_processing);
}

#[tokio::test]
async fn test_download_dir_blocked_by_file() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("downloads");
    std::fs::write(&blocker, b"x").unwrap();

    let mut session = fast_session(DirectorySink::new(&blocker));
    session
        .add_files(
            IntakeSource::Picker,
            vec![
                pdf_handle("a.pdf", marked_pdf("A", 1)),
                pdf_handle("b.pdf", marked_pdf("B", 1)),
            ],
        )
        .unwrap();

    assert!(session.merge().await.unwrap_err().is_processing());
    assert_eq!(session.state().phase(), Phase::Error);
}

#[tokio::test]
async fn test_recovery_after_failure() {
    let sink = MemorySink::new();
    let mut session = fast_session(sink.clone());
    session
        .add_files(
            IntakeSource::Picker,
            vec![
                pdf_handle("a.pdf", marked_pdf("A", 1)),
                pdf_handle("bad.pdf", b"junk".to_vec()),
            ],
        )
        .unwrap();
    assert!(session.merge().await.is_err());

    let bad_id = session.files().as_slice()[1].id.clone();
    session.remove(&bad_id).unwrap();
    session
        .add_files(IntakeSource::Drop, vec![pdf_handle("b.pdf", marked_pdf("B", 1))])
        .unwrap();
    assert_eq!(session.state().phase(), Phase::Idle);

    session.merge().await.unwrap();
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_missing_path_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.pdf").display().to_string();

    let err = handles_from_patterns([missing]).unwrap_err();
    assert!(matches!(err, PdfMasterError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_directory_is_not_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().display().to_string();

    let err = handles_from_patterns([dir]).unwrap_err();
    assert!(matches!(err, PdfMasterError::NotAFile { .. }));
}
