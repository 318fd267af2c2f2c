//! Text rendering of the ordered file list.

use std::fmt::Write;

use crate::files::FileList;
use crate::utils::format_file_size;

/// Render `files` as numbered lines in merge order, followed by a
/// selection count. Positions are 1-based. Returns an empty string for an
/// empty list.
///
/// With `show_ids` each line also carries the file's identifier.
pub fn render_file_grid(files: &FileList, show_ids: bool) -> String {
    if files.is_empty() {
        return String::new();
    }

    let width = files.len().to_string().len();
    let mut out = String::new();

    for (index, entry) in files.iter().enumerate() {
        let _ = write!(
            out,
            "  #{:<width$}  {}  ({})",
            index + 1,
            entry.file.name(),
            format_file_size(entry.file.size()),
        );
        if show_ids {
            let _ = write!(out, "  [{}]", entry.id);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", selection_label(files.len()));
    out
}

/// `"1 file selected"` / `"N files selected"`.
pub fn selection_label(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} file{plural} selected")
}
