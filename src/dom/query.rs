//! Document queries scoped to a subtree: by tag, class, generic predicate.
//!
//! Results are in document order (pre-order depth-first) and include the
//! scope node itself when it matches.

use super::node::{NodeData, NodeId};
use super::tree::Document;

impl Document {
    /// Find all nodes under `scope` with the given tag.
    pub fn query_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.query_all(scope, |data| data.tag == tag)
    }

    /// Find all nodes under `scope` that have the given class.
    pub fn query_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.query_all(scope, |data| data.has_class(class))
    }

    /// Find the first node under `scope` matching `predicate`.
    pub fn query_first(
        &self,
        scope: NodeId,
        predicate: impl Fn(&NodeData) -> bool,
    ) -> Option<NodeId> {
        self.walk_depth_first(scope)
            .into_iter()
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    /// Find all nodes under `scope` matching an arbitrary predicate.
    pub fn query_all(&self, scope: NodeId, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.walk_depth_first(scope)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }

    /// The nearest node, starting at `id` and walking up, with the given tag.
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| self.get(n).is_some_and(|data| data.tag == tag))
    }
}
