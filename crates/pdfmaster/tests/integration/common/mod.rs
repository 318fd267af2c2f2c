//! Shared helpers for the integration tests.
//!
//! PDFs are generated in memory with `lopdf`. Every page carries a
//! `Marker` string (`"<label>-<n>"`, 1-based) so tests can check the page
//! order of a merged document.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pdfmaster::download::{Delivered, Download, DownloadSink};
use pdfmaster::error::{PdfMasterError, Result};
use pdfmaster::files::{FileHandle, PDF_MIME_TYPE, UploadedFile};
use pdfmaster::session::{MergeSession, SessionConfig};

/// Build a PDF with `pages` pages marked `<label>-1` .. `<label>-<pages>`.
///
/// Font resources and the media box live on the page tree node, so every
/// page inherits them.
pub fn marked_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let marker = format!("{label}-{n}");
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(marker.clone())]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap_or_default(),
            ));

            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Marker" => Object::string_literal(marker),
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("failed to serialize fixture");
    buffer
}

/// Page markers of a serialized PDF, in page order.
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("merged output must parse");

    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc
                .get_object(page_id)
                .and_then(Object::as_dict)
                .expect("page must be a dictionary");
            match page.get(b"Marker") {
                Ok(Object::String(raw, _)) => String::from_utf8_lossy(raw).into_owned(),
                other => panic!("page without marker: {other:?}"),
            }
        })
        .collect()
}

/// Whether every page of `bytes` resolves a media box and font resources.
pub fn pages_have_inherited_attributes(bytes: &[u8]) -> bool {
    let doc = Document::load_mem(bytes).expect("merged output must parse");

    doc.get_pages().into_values().all(|page_id| {
        doc.get_object(page_id)
            .and_then(Object::as_dict)
            .map(|page| page.has(b"MediaBox") && page.has(b"Resources"))
            .unwrap_or(false)
    })
}

/// In-memory PDF handle.
pub fn pdf_handle(name: &str, bytes: Vec<u8>) -> FileHandle {
    FileHandle::from_bytes(name, PDF_MIME_TYPE, bytes)
}

/// In-memory uploaded file.
pub fn uploaded(name: &str, bytes: Vec<u8>) -> UploadedFile {
    UploadedFile::new(pdf_handle(name, bytes))
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("failed to write fixture");
    path
}

/// Session without the processing delay.
pub fn fast_session<S: DownloadSink>(sink: S) -> MergeSession<S> {
    MergeSession::with_config(
        sink,
        SessionConfig {
            processing_delay: Duration::ZERO,
        },
    )
}

/// Sink that refuses every delivery.
#[derive(Debug, Clone, Default)]
pub struct FailingSink;

impl DownloadSink for FailingSink {
    async fn deliver(&self, download: Download) -> Result<Delivered> {
        Err(PdfMasterError::FailedToWrite {
            path: PathBuf::from(download.filename),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}
