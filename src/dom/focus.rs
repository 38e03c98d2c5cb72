//! Focus chain: the tab order of focusable nodes in the live document.

use super::node::NodeId;
use super::tree::Document;

/// Ordered list of focusable nodes for the page's own Tab handling.
///
/// The chain is a snapshot; rebuild it after the tree changes. Focus cycles
/// through the chain in document order, wrapping at both ends.
#[derive(Debug, Default)]
pub struct FocusChain {
    nodes: Vec<NodeId>,
    current: Option<usize>,
}

impl FocusChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the attached focusable nodes of `doc`, positioned at its
    /// current focus.
    pub fn from_document(doc: &Document) -> Self {
        let mut chain = Self::new();
        chain.rebuild(doc);
        chain
    }

    /// Re-collect focusable nodes under the body. Keeps the document's
    /// focused node as the current position when it is still in the chain.
    pub fn rebuild(&mut self, doc: &Document) {
        self.nodes = doc
            .walk_depth_first(doc.body())
            .into_iter()
            .filter(|id| doc.get(*id).is_some_and(|data| data.focusable))
            .collect();
        self.current = doc
            .focused()
            .and_then(|focused| self.nodes.iter().position(|&n| n == focused));
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.current.and_then(|idx| self.nodes.get(idx).copied())
    }

    /// Step to the next node, wrapping to the first.
    pub fn focus_next(&mut self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(idx) => (idx + 1) % self.nodes.len(),
            None => 0,
        };
        self.current = Some(next);
        self.nodes.get(next).copied()
    }

    /// Step to the previous node, wrapping to the last.
    pub fn focus_previous(&mut self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.nodes.len() - 1,
            Some(idx) => idx - 1,
        };
        self.current = Some(prev);
        self.nodes.get(prev).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;

    /// ```text
    ///   body
    ///    ├ a (focusable)
    ///    ├ p
    ///    │  └ b (focusable)
    ///    └ c (focusable)
    ///   detached (focusable)
    /// ```
    fn doc() -> (Document, [NodeId; 4]) {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_child(body, NodeData::new("a").focusable(true));
        let p = doc.create_child(body, NodeData::new("p"));
        let b = doc.create_child(p, NodeData::new("a").focusable(true));
        let c = doc.create_child(body, NodeData::new("button").focusable(true));
        let detached = doc.create(NodeData::new("a").focusable(true));
        (doc, [a, b, c, detached])
    }

    #[test]
    fn collects_attached_focusables_in_order() {
        let (doc, [a, b, c, _]) = doc();
        let mut chain = FocusChain::from_document(&doc);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.focus_next(), Some(a));
        assert_eq!(chain.focus_next(), Some(b));
        assert_eq!(chain.focus_next(), Some(c));
        assert_eq!(chain.focus_next(), Some(a));
    }

    #[test]
    fn previous_from_nothing_is_last() {
        let (doc, [a, _, c, _]) = doc();
        let mut chain = FocusChain::from_document(&doc);
        assert_eq!(chain.focus_previous(), Some(c));
        chain.focus_next();
        assert_eq!(chain.current_node(), Some(a));
        assert_eq!(chain.focus_previous(), Some(c));
    }

    #[test]
    fn starts_at_document_focus() {
        let (mut doc, [_, b, c, _]) = doc();
        doc.focus(b);
        let mut chain = FocusChain::from_document(&doc);
        assert_eq!(chain.current_node(), Some(b));
        assert_eq!(chain.focus_next(), Some(c));
    }

    #[test]
    fn detached_focus_is_not_a_position() {
        let (mut doc, [a, _, _, detached]) = doc();
        doc.focus(detached);
        let mut chain = FocusChain::from_document(&doc);
        assert_eq!(chain.current_node(), None);
        assert_eq!(chain.focus_next(), Some(a));
    }

    #[test]
    fn empty_chain() {
        let doc = Document::new();
        let mut chain = FocusChain::from_document(&doc);
        assert!(chain.is_empty());
        assert_eq!(chain.focus_next(), None);
        assert_eq!(chain.focus_previous(), None);
    }
}
