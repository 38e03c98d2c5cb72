//! Tree operations: create, append, detach, empty, remove, walk, focus.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The document: a slotmap arena of nodes hanging off a `body` root.
///
/// Nodes without a parent (other than the body) are *detached*: they exist and
/// can be built up, but are not part of the live tree and are never rendered
/// or reached by bubbling events.
pub struct Document {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Document {
    /// Create a document containing only its `body`.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(NodeData::new("body"));
        let mut children = SecondaryMap::new();
        children.insert(body, Vec::new());
        Self {
            nodes,
            children,
            parent: SecondaryMap::new(),
            body,
            focused: None,
        }
    }

    /// The root of the live tree.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached node.
    pub fn create(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Create a node and append it as the last child of `parent`.
    ///
    /// If `parent` does not exist the node is created detached.
    pub fn create_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.create(data);
        self.append(parent, id);
        id
    }

    /// Move `node` to become the last child of `parent`.
    ///
    /// The node keeps its subtree intact. If it already had a parent it is
    /// detached first, so appending to the same parent moves it to the end.
    /// No-op if either node is missing, `node` is the body, or `parent` lies
    /// inside `node`'s own subtree.
    pub fn append(&mut self, parent: NodeId, node: NodeId) {
        if node == self.body
            || !self.nodes.contains_key(node)
            || !self.nodes.contains_key(parent)
            || self.is_within(parent, node)
        {
            return;
        }
        self.detach(node);
        self.parent.insert(node, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(node);
        }
    }

    /// Unlink `node` from its parent, keeping it and its subtree alive.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(old_parent) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != node);
            }
        }
    }

    /// Remove every child subtree of `node`.
    pub fn empty(&mut self, node: NodeId) {
        let kids: Vec<NodeId> = self.children(node).to_vec();
        for kid in kids {
            self.remove(kid);
        }
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't
    /// exist. The body cannot be removed. Focus on a removed node is cleared.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if id == self.body || !self.nodes.contains_key(id) {
            return None;
        }

        self.detach(id);

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            if self.focused == Some(current) {
                self.focused = None;
            }
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }

        removed_root_data
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no
    /// children or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to its topmost ancestor, collecting ancestor ids.
    ///
    /// The returned vec does **not** include `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `node` is the body or a descendant of it.
    pub fn is_attached(&self, node: NodeId) -> bool {
        node == self.body || self.ancestors(node).last() == Some(&self.body)
    }

    /// Whether `node` is `ancestor` or lies inside its subtree.
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// Whether the node exists and carries `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get(id).is_some_and(|data| data.has_class(class))
    }

    /// Add `class` to a node. No-op for missing nodes.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(data) = self.get_mut(id) {
            data.add_class(class);
        }
    }

    /// Remove `class` from a node. No-op for missing nodes.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(data) = self.get_mut(id) {
            data.remove_class(class);
        }
    }

    /// Number of nodes in the document, the body included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document holds nothing but its body.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Whether the document contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    // ── Focus ────────────────────────────────────────────────────────

    /// Give input focus to `id`.
    ///
    /// Returns `false` (and leaves focus unchanged) if the node does not exist
    /// or is not focusable.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if self.get(id).is_some_and(|data| data.focusable) {
            self.focused = Some(id);
            true
        } else {
            false
        }
    }

    /// Drop input focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// The focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    // ── Walks ────────────────────────────────────────────────────────

    /// Pre-order depth-first traversal starting from `start` (document order).
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
