//! Tab traversal over the links of a menu surface.

use tracing::trace;

use super::settings::TAB_MARK_CLASS;
use super::MenuMut;

impl<'p> MenuMut<'p> {
    /// Move the tab marker to the next (or, with `reverse`, previous) focusable
    /// link in the surface.
    ///
    /// The links plus one empty slot form a ring: stepping past either end
    /// clears every marker and hands focus back to the submit control; the
    /// following step starts again from the first (or last) link.
    pub fn tab(&mut self, reverse: bool) -> &mut Self {
        let surface = self.state().surface;
        let doc = &mut self.page.document;
        let links = doc.query_all(surface, |data| data.tag == "a" && data.focusable);
        let marked = links.iter().position(|link| doc.has_class(*link, TAB_MARK_CLASS));

        let next = match (marked, reverse) {
            (None, true) => links.len().checked_sub(1),
            (Some(at), true) => at.checked_sub(1),
            (None, false) => Some(0),
            (Some(at), false) => Some(at + 1),
        }
        .filter(|&at| at < links.len());

        for link in &links {
            doc.remove_class(*link, TAB_MARK_CLASS);
        }
        match next {
            Some(at) => {
                doc.add_class(links[at], TAB_MARK_CLASS);
                doc.focus(links[at]);
                trace!(menu = ?self.id, position = at, "tab marker moved");
            }
            None => {
                trace!(menu = ?self.id, "tab marker cleared");
                self.focus_submit();
            }
        }
        self
    }
}
