//! Page order and page count of merged documents.

use rstest::rstest;

use pdfmaster::download::MemorySink;
use pdfmaster::files::Direction;
use pdfmaster::intake::IntakeSource;
use pdfmaster::merge::{Merger, merge_files};

use crate::common::{
    fast_session, marked_pdf, page_markers, pages_have_inherited_attributes, pdf_handle, uploaded,
};

#[tokio::test]
async fn test_two_then_three_pages_in_order() {
    let files = vec![
        uploaded("a.pdf", marked_pdf("A", 2)),
        uploaded("b.pdf", marked_pdf("B", 3)),
    ];

    let output = merge_files(&files).await.unwrap();

    assert_eq!(output.statistics.total_pages, 5);
    assert_eq!(
        page_markers(&output.bytes),
        vec!["A-1", "A-2", "B-1", "B-2", "B-3"]
    );
}

#[tokio::test]
async fn test_reversed_list_reverses_documents_not_pages() {
    let files = vec![
        uploaded("b.pdf", marked_pdf("B", 3)),
        uploaded("a.pdf", marked_pdf("A", 2)),
    ];

    let output = merge_files(&files).await.unwrap();

    assert_eq!(
        page_markers(&output.bytes),
        vec!["B-1", "B-2", "B-3", "A-1", "A-2"]
    );
}

#[rstest]
#[case(&[1, 1])]
#[case(&[1, 4, 2])]
#[case(&[5, 1, 1, 3])]
#[tokio::test]
async fn test_page_count_is_sum_of_inputs(#[case] counts: &[usize]) {
    let files: Vec<_> = counts
        .iter()
        .enumerate()
        .map(|(i, &pages)| uploaded(&format!("{i}.pdf"), marked_pdf(&i.to_string(), pages)))
        .collect();

    let output = Merger::new().merge(&files).await.unwrap();

    let expected: usize = counts.iter().sum();
    assert_eq!(output.statistics.total_pages, expected);
    assert_eq!(output.statistics.files_merged, counts.len());
    assert_eq!(page_markers(&output.bytes).len(), expected);
}

#[tokio::test]
async fn test_same_file_twice() {
    let bytes = marked_pdf("A", 2);
    let files = vec![uploaded("a.pdf", bytes.clone()), uploaded("a.pdf", bytes)];

    let output = merge_files(&files).await.unwrap();

    assert_eq!(page_markers(&output.bytes), vec!["A-1", "A-2", "A-1", "A-2"]);
}

#[tokio::test]
async fn test_inherited_page_attributes_survive_merge() {
    let files = vec![
        uploaded("a.pdf", marked_pdf("A", 2)),
        uploaded("b.pdf", marked_pdf("B", 1)),
    ];

    let output = merge_files(&files).await.unwrap();

    assert!(pages_have_inherited_attributes(&output.bytes));
}

#[tokio::test]
async fn test_input_bytes_are_not_mutated() {
    let a = marked_pdf("A", 2);
    let b = marked_pdf("B", 1);
    let files = vec![uploaded("a.pdf", a.clone()), uploaded("b.pdf", b.clone())];

    merge_files(&files).await.unwrap();

    assert_eq!(page_markers(&a), vec!["A-1", "A-2"]);
    assert_eq!(page_markers(&b), vec!["B-1"]);
}

#[tokio::test]
async fn test_session_merge_follows_reordered_list() {
    let sink = MemorySink::new();
    let mut session = fast_session(sink.clone());
    session
        .add_files(
            IntakeSource::Picker,
            vec![
                pdf_handle("a.pdf", marked_pdf("A", 1)),
                pdf_handle("b.pdf", marked_pdf("B", 1)),
                pdf_handle("c.pdf", marked_pdf("C", 1)),
            ],
        )
        .unwrap();

    assert!(session.move_file(2, Direction::TowardStart).unwrap());
    assert!(session.move_file(0, Direction::TowardEnd).unwrap());

    session.merge().await.unwrap();

    let downloads = sink.downloads();
    assert_eq!(downloads.len(), 1);
    assert_eq!(page_markers(&downloads[0].bytes), vec!["C-1", "A-1", "B-1"]);
}
