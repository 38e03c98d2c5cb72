//! Event subscriptions and dispatch: handle registry, queue, bubble path.
//!
//! [`EventRegistry`] hands out a [`SubscriptionId`] for every listener so the
//! owner can release exactly what it acquired. [`EventDispatcher`] queues
//! [`Envelope`]s; the page drains it and walks each envelope along its
//! `bubble_path`, so an event raised by a handler is delivered only after the
//! current one has finished.

use std::collections::VecDeque;

use slotmap::{new_key_type, SlotMap};

use super::input::KeyEvent;
use crate::dom::node::NodeId;
use crate::dom::tree::Document;

new_key_type! {
    /// Handle for one registered listener.
    pub struct SubscriptionId;
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// The kind of a document event, used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    Click,
    Submit,
}

/// A document event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    KeyDown(KeyEvent),
    Click,
    Submit,
}

impl DomEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomEvent::KeyDown(_) => EventKind::KeyDown,
            DomEvent::Click => EventKind::Click,
            DomEvent::Submit => EventKind::Submit,
        }
    }
}

/// An event addressed to a target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub event: DomEvent,
    pub target: NodeId,
}

impl Envelope {
    pub fn new(event: DomEvent, target: NodeId) -> Self {
        Self { event, target }
    }
}

/// What happened while an event was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// A handler asked for the page's default action to be skipped.
    pub default_prevented: bool,
    /// Number of handlers that ran.
    pub handled: usize,
}

impl EventOutcome {
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

// ---------------------------------------------------------------------------
// EventRegistry
// ---------------------------------------------------------------------------

/// One registered listener.
#[derive(Debug, Clone)]
pub struct Subscription<H> {
    pub node: NodeId,
    pub kind: EventKind,
    pub handler: H,
    seq: u64,
}

/// Listener registry keyed by handle.
///
/// Handlers on the same node run in subscription order.
#[derive(Debug)]
pub struct EventRegistry<H> {
    subs: SlotMap<SubscriptionId, Subscription<H>>,
    next_seq: u64,
}

impl<H: Clone> EventRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            subs: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Register `handler` for `kind` events reaching `node`.
    pub fn subscribe(&mut self, node: NodeId, kind: EventKind, handler: H) -> SubscriptionId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.subs.insert(Subscription {
            node,
            kind,
            handler,
            seq,
        })
    }

    /// Release one listener. Returns `false` if the handle was already released.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subs.remove(id).is_some()
    }

    /// Release every handle in `ids`, leaving it empty.
    pub fn unsubscribe_all(&mut self, ids: &mut Vec<SubscriptionId>) {
        for id in ids.drain(..) {
            self.subs.remove(id);
        }
    }

    /// Whether the handle is still live.
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.subs.contains_key(id)
    }

    /// Look up a live subscription.
    pub fn get(&self, id: SubscriptionId) -> Option<&Subscription<H>> {
        self.subs.get(id)
    }

    /// Listeners registered on `node` for `kind`, in subscription order.
    pub fn listeners(&self, node: NodeId, kind: EventKind) -> Vec<(SubscriptionId, H)> {
        let mut found: Vec<(u64, SubscriptionId, H)> = self
            .subs
            .iter()
            .filter(|(_, sub)| sub.node == node && sub.kind == kind)
            .map(|(id, sub)| (sub.seq, id, sub.handler.clone()))
            .collect();
        found.sort_by_key(|(seq, ..)| *seq);
        found.into_iter().map(|(_, id, h)| (id, h)).collect()
    }

    /// Listeners an envelope reaches, target first, then each ancestor.
    pub fn route(&self, doc: &Document, envelope: &Envelope) -> Vec<(SubscriptionId, H)> {
        let kind = envelope.event.kind();
        EventDispatcher::bubble_path(doc, envelope.target)
            .into_iter()
            .flat_map(|node| self.listeners(node, kind))
            .collect()
    }

    /// Number of live listeners.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

impl<H: Clone> Default for EventRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

/// FIFO queue of pending envelopes.
///
/// The dispatcher does not itself run handlers; the page pops envelopes,
/// routes them through the [`EventRegistry`] and applies default actions.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    queue: VecDeque<Envelope>,
}

impl EventDispatcher {
    /// Create a new, empty dispatcher.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Enqueue an envelope for later delivery.
    pub fn push(&mut self, envelope: Envelope) {
        self.queue.push_back(envelope);
    }

    /// Take the oldest pending envelope.
    pub fn pop(&mut self) -> Option<Envelope> {
        self.queue.pop_front()
    }

    /// Number of pending envelopes.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Compute the bubble path from `start` up to its topmost ancestor (inclusive).
    ///
    /// Returns `[start, parent, grandparent, ...]`, or an empty vec if `start`
    /// does not exist in the document.
    pub fn bubble_path(doc: &Document, start: NodeId) -> Vec<NodeId> {
        if !doc.contains(start) {
            return Vec::new();
        }
        let mut path = vec![start];
        path.extend(doc.ancestors(start));
        path
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;
    use crate::event::input::Key;

    /// ```text
    ///   body
    ///    └ form
    ///       └ button
    /// ```
    fn build_tree() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let form = doc.create_child(body, NodeData::new("form"));
        let button = doc.create_child(form, NodeData::new("button"));
        (doc, body, form, button)
    }

    // ── Registry ─────────────────────────────────────────────────────

    #[test]
    fn subscribe_and_unsubscribe() {
        let (_, body, ..) = build_tree();
        let mut reg = EventRegistry::new();
        let id = reg.subscribe(body, EventKind::KeyDown, "hook");
        assert_eq!(reg.len(), 1);
        assert!(reg.contains(id));
        assert!(reg.unsubscribe(id));
        assert!(!reg.unsubscribe(id));
        assert!(reg.is_empty());
    }

    #[test]
    fn unsubscribe_all_drains_handles() {
        let (_, body, form, _) = build_tree();
        let mut reg = EventRegistry::new();
        let mut ids = vec![
            reg.subscribe(body, EventKind::Click, 1),
            reg.subscribe(form, EventKind::Submit, 2),
        ];
        reg.subscribe(form, EventKind::Click, 3);
        reg.unsubscribe_all(&mut ids);
        assert!(ids.is_empty());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn listeners_filter_by_kind_in_order() {
        let (_, _, form, _) = build_tree();
        let mut reg = EventRegistry::new();
        let first = reg.subscribe(form, EventKind::Submit, "first");
        reg.subscribe(form, EventKind::Click, "click");
        reg.subscribe(form, EventKind::Submit, "second");
        reg.unsubscribe(first);
        reg.subscribe(form, EventKind::Submit, "third");

        let names: Vec<&str> = reg
            .listeners(form, EventKind::Submit)
            .into_iter()
            .map(|(_, h)| h)
            .collect();
        assert_eq!(names, ["second", "third"]);
    }

    #[test]
    fn route_bubbles_to_ancestors() {
        let (doc, body, form, button) = build_tree();
        let mut reg = EventRegistry::new();
        reg.subscribe(body, EventKind::Click, "body");
        reg.subscribe(button, EventKind::Click, "button");
        reg.subscribe(form, EventKind::Click, "form");
        reg.subscribe(form, EventKind::Submit, "submit");

        let names: Vec<&str> = reg
            .route(&doc, &Envelope::new(DomEvent::Click, button))
            .into_iter()
            .map(|(_, h)| h)
            .collect();
        assert_eq!(names, ["button", "form", "body"]);
    }

    #[test]
    fn route_to_removed_node_is_empty() {
        let (mut doc, _, form, button) = build_tree();
        let mut reg = EventRegistry::new();
        reg.subscribe(button, EventKind::Click, ());
        doc.remove(form);
        assert!(reg.route(&doc, &Envelope::new(DomEvent::Click, button)).is_empty());
    }

    #[test]
    fn event_kinds() {
        let key = DomEvent::KeyDown(KeyEvent::plain(Key::Up));
        assert_eq!(key.kind(), EventKind::KeyDown);
        assert_eq!(DomEvent::Click.kind(), EventKind::Click);
        assert_eq!(DomEvent::Submit.kind(), EventKind::Submit);
    }

    // ── Dispatcher ───────────────────────────────────────────────────

    #[test]
    fn dispatcher_is_fifo() {
        let (_, body, form, _) = build_tree();
        let mut disp = EventDispatcher::new();
        disp.push(Envelope::new(DomEvent::Click, body));
        disp.push(Envelope::new(DomEvent::Submit, form));
        assert_eq!(disp.pending_count(), 2);
        assert_eq!(disp.pop().unwrap().target, body);
        assert_eq!(disp.pop().unwrap().event, DomEvent::Submit);
        assert!(disp.pop().is_none());
        assert!(disp.is_empty());
    }

    #[test]
    fn bubble_path_from_leaf() {
        let (doc, body, form, button) = build_tree();
        assert_eq!(EventDispatcher::bubble_path(&doc, button), vec![button, form, body]);
        assert_eq!(EventDispatcher::bubble_path(&doc, body), vec![body]);
    }

    #[test]
    fn bubble_path_of_detached_node_stops_at_its_top() {
        let (mut doc, ..) = build_tree();
        let loose = doc.create(NodeData::new("div"));
        let inner = doc.create_child(loose, NodeData::new("p"));
        assert_eq!(EventDispatcher::bubble_path(&doc, inner), vec![inner, loose]);
    }
}
