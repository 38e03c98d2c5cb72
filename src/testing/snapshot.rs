//! Snapshot rendering helpers.
//!
//! Turn a page into plain text for snapshot tests and assertions.

use crate::page::Page;
use crate::render::frame::{Frame, LineRole};
use crate::render::strip::Strip;

/// Render the page at its current size. Each row is right-trimmed and rows
/// are joined with `'\n'`.
pub fn render_to_string(page: &Page) -> String {
    page.render().to_text()
}

/// Like [`render_to_string`], with each row prefixed by its number and the
/// state plain text cannot show appended to it: `<focus>` for the focused
/// element and `<tab>` for the tab marker. Trailing blank rows are dropped.
///
/// ```text
/// 00|
/// 01|  Pick
/// 02|
/// 03|  > A  <focus>  <tab>
/// ```
pub fn render_annotated(page: &Page) -> String {
    annotate(&page.render())
}

/// Join the text of `strips`, one row each.
pub fn strips_to_string(strips: &[Strip]) -> String {
    strips.iter().map(Strip::text).collect::<Vec<_>>().join("\n")
}

fn annotate(frame: &Frame) -> String {
    let mut rows: Vec<String> = frame.to_text().split('\n').map(str::to_owned).collect();
    for line in &frame.lines {
        let Some(row) = rows.get_mut(usize::from(line.y)) else {
            continue;
        };
        if line.focused {
            row.push_str("  <focus>");
        }
        if let LineRole::Option { marked: true, .. } = line.role {
            row.push_str("  <tab>");
        }
    }
    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    rows.iter()
        .enumerate()
        .map(|(y, row)| format!("{y:02}|{row}"))
        .collect::<Vec<_>>()
        .join("\n")
}
