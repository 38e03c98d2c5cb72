//! Frame: the document laid out as text lines, with a hit map for the mouse.
//!
//! Layout is a single column. Every attached child of the body is a block;
//! inside a block each element with text becomes one line (one per text line)
//! in document order.
//!
//! ```text
//!   Main menu              h1.title, then a blank row
//!   What now?              p.text
//!   extra                  div.message
//!                          ul.options opens with a blank row
//!   > Alert                a.option.active
//!     Confirm              a.option
//!                          form opens with a blank row
//!   [ OK ]                 button.submit
//! ```

use crate::dom::{Document, NodeId};
use crate::menu::settings::{ACTIVE_CLASS, TAB_MARK_CLASS};
use crate::page::Theme;

use super::strip::{CellStyle, Strip};

/// Left margin, in columns.
pub const MARGIN_X: u16 = 2;
/// Top margin, in rows.
pub const MARGIN_Y: u16 = 1;

/// What kind of element produced a line; decides its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Title,
    Text,
    Message,
    Option { active: bool, marked: bool },
    Button,
    Plain,
}

/// One laid-out line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub x: u16,
    pub y: u16,
    pub text: String,
    pub node: NodeId,
    pub role: LineRole,
    pub focused: bool,
}

impl Line {
    pub fn width(&self) -> u16 {
        u16::try_from(self.text.chars().count()).unwrap_or(u16::MAX)
    }

    fn contains(&self, x: u16, y: u16) -> bool {
        y == self.y && x >= self.x && x - self.x < self.width()
    }
}

/// Rows spanned by one top-level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    node: NodeId,
    first: u16,
    last: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub lines: Vec<Line>,
    blocks: Vec<Block>,
}

impl Frame {
    /// Lay out the attached part of `doc` in a `width` x `height` screen.
    /// Lines below the last row are dropped.
    pub fn layout(doc: &Document, width: u16, height: u16) -> Self {
        let mut frame = Frame {
            width,
            height,
            lines: Vec::new(),
            blocks: Vec::new(),
        };
        let focused = doc.focused();
        let mut y = MARGIN_Y;

        for &block in doc.children(doc.body()) {
            let first = y;
            for id in doc.walk_depth_first(block) {
                let Some(data) = doc.get(id) else {
                    continue;
                };
                let (role, text) = match data.tag.as_str() {
                    "ul" | "form" => {
                        y = y.saturating_add(1);
                        continue;
                    }
                    "h1" => (LineRole::Title, data.text.clone().unwrap_or_default()),
                    "a" if data.has_class("option") => {
                        let active = data.has_class(ACTIVE_CLASS);
                        let marker = if active { "> " } else { "  " };
                        let label = data.text.as_deref().unwrap_or_default();
                        (
                            LineRole::Option {
                                active,
                                marked: data.has_class(TAB_MARK_CLASS),
                            },
                            format!("{marker}{label}"),
                        )
                    }
                    "button" => (
                        LineRole::Button,
                        format!("[ {} ]", data.text.as_deref().unwrap_or_default()),
                    ),
                    _ => match &data.text {
                        Some(text) if data.tag == "p" => (LineRole::Text, text.clone()),
                        Some(text) if data.has_class("message") => (LineRole::Message, text.clone()),
                        Some(text) => (LineRole::Plain, text.clone()),
                        None => continue,
                    },
                };

                for part in text.lines() {
                    if y < height {
                        frame.lines.push(Line {
                            x: MARGIN_X,
                            y,
                            text: part.to_owned(),
                            node: id,
                            role,
                            focused: focused == Some(id),
                        });
                    }
                    y = y.saturating_add(1);
                }
                if role == LineRole::Title {
                    y = y.saturating_add(1);
                }
            }
            if y > first {
                frame.blocks.push(Block {
                    node: block,
                    first,
                    last: y - 1,
                });
            }
        }
        frame
    }

    /// The node drawn at cell (`x`, `y`).
    ///
    /// Cells not covered by a line belong to the block whose rows include `y`,
    /// or to the last block when `y` is below all of them.
    pub fn hit(&self, x: u16, y: u16) -> Option<NodeId> {
        if let Some(line) = self.lines.iter().find(|line| line.contains(x, y)) {
            return Some(line.node);
        }
        self.blocks
            .iter()
            .find(|block| (block.first..=block.last).contains(&y))
            .or_else(|| self.blocks.last())
            .map(|block| block.node)
    }

    /// The first line drawn for `node`.
    pub fn line_of(&self, node: NodeId) -> Option<&Line> {
        self.lines.iter().find(|line| line.node == node)
    }

    /// One strip per screen row, styled with `theme`.
    pub fn to_strips(&self, theme: &Theme) -> Vec<Strip> {
        let base = CellStyle::colored(theme.foreground.clone(), theme.background.clone());
        let mut strips: Vec<Strip> = (0..self.height)
            .map(|y| Strip::blank(y, self.width, base.clone()))
            .collect();
        for line in &self.lines {
            let Some(strip) = strips.get_mut(usize::from(line.y)) else {
                continue;
            };
            let style = line_style(line, &base, theme);
            strip.overlay(line.x, &line.text, &style);
        }
        strips
    }

    /// Plain text of the whole screen, one row per line, trailing spaces
    /// trimmed.
    pub fn to_text(&self) -> String {
        self.to_strips(&Theme::default())
            .iter()
            .map(Strip::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn line_style(line: &Line, base: &CellStyle, theme: &Theme) -> CellStyle {
    let mut style = match line.role {
        LineRole::Title => base.clone().with_fg(theme.accent.clone()).bold(),
        LineRole::Message => base.clone().dim(),
        LineRole::Option { active: true, .. } => base.clone().with_fg(theme.accent.clone()).bold(),
        LineRole::Button => base.clone().bold(),
        LineRole::Option { active: false, .. } | LineRole::Text | LineRole::Plain => base.clone(),
    };
    if let LineRole::Option { marked: true, .. } = line.role {
        style = style.underline();
    }
    if line.focused {
        style = style.reverse();
    }
    style
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::NodeData;

    /// A surface shaped like a select dialog.
    fn select_doc() -> (Document, NodeId, Vec<NodeId>, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let surface = doc.create_child(body, NodeData::new("div").with_class("retro-menu"));
        doc.create_child(surface, NodeData::new("h1").with_text("Main"));
        let dialog = doc.create_child(surface, NodeData::new("div").with_class("dialog"));
        doc.create_child(dialog, NodeData::new("p").with_class("text").with_text("Pick one"));
        let list = doc.create_child(dialog, NodeData::new("ul"));
        let rows = ["Alpha", "Beta"]
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mut data = NodeData::new("a").with_class("option").with_text(*label).focusable(true);
                if i == 0 {
                    data = data.with_class(ACTIVE_CLASS);
                }
                doc.create_child(list, data)
            })
            .collect();
        let form = doc.create_child(dialog, NodeData::new("form"));
        let submit = doc.create_child(form, NodeData::new("button").with_text("OK").focusable(true));
        (doc, surface, rows, submit)
    }

    #[test]
    fn layout_text() {
        let (doc, ..) = select_doc();
        let frame = Frame::layout(&doc, 30, 12);
        assert_eq!(
            frame.to_text(),
            "\n  Main\n\n  Pick one\n\n  > Alpha\n    Beta\n\n  [ OK ]\n\n\n"
        );
    }

    #[test]
    fn detached_nodes_are_not_drawn() {
        let (mut doc, surface, ..) = select_doc();
        doc.detach(surface);
        let frame = Frame::layout(&doc, 30, 12);
        assert!(frame.lines.is_empty());
        assert_eq!(frame.hit(5, 5), None);
    }

    #[test]
    fn hit_finds_lines_then_blocks() {
        let (doc, surface, rows, submit) = select_doc();
        let frame = Frame::layout(&doc, 30, 12);
        assert_eq!(frame.hit(4, 6), Some(rows[1]));
        assert_eq!(frame.hit(2, 8), Some(submit));
        // right of a line and below everything both land on the surface
        assert_eq!(frame.hit(25, 6), Some(surface));
        assert_eq!(frame.hit(0, 11), Some(surface));
    }

    #[test]
    fn multi_line_text_gets_a_row_each() {
        let mut doc = Document::new();
        let body = doc.body();
        let p = doc.create_child(body, NodeData::new("p").with_text("one\ntwo"));
        let frame = Frame::layout(&doc, 20, 5);
        assert_eq!(frame.lines.len(), 2);
        assert_eq!(frame.hit(3, 2), Some(p));
    }

    #[test]
    fn lines_past_the_bottom_are_clipped() {
        let (doc, ..) = select_doc();
        let frame = Frame::layout(&doc, 30, 4);
        assert_eq!(frame.lines.len(), 2);
        assert_eq!(frame.to_strips(&Theme::default()).len(), 4);
    }

    #[test]
    fn styles_follow_roles() {
        let (mut doc, _, rows, submit) = select_doc();
        doc.add_class(rows[1], TAB_MARK_CLASS);
        doc.focus(submit);
        let theme = Theme::default();
        let frame = Frame::layout(&doc, 30, 12);
        let strips = frame.to_strips(&theme);

        let title = &strips[1].cells[2].style;
        assert!(title.bold);
        assert_eq!(title.fg.as_ref(), Some(&theme.accent));
        assert!(strips[6].cells[4].style.underline);
        assert!(strips[8].cells[2].style.reverse);
        assert_eq!(strips[3].cells[2].style.fg.as_ref(), Some(&theme.foreground));
        assert_eq!(frame.line_of(submit).map(|l| l.y), Some(8));
    }
}
