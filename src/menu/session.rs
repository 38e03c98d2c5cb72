//! Transient state of the dialog currently shown by a menu.

use crate::dom::node::NodeId;
use crate::event::handler::SubscriptionId;
use crate::timer::TimerId;

use super::MenuMut;

/// Callback run when an alert is submitted.
pub type AlertCallback = Box<dyn FnOnce(&mut MenuMut<'_>)>;
/// Callback run when a select is submitted, with the chosen index and label.
pub type SelectCallback = Box<dyn FnOnce(&mut MenuMut<'_>, usize, String)>;

/// Which dialog a menu is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Alert,
    /// Select and confirm dialogs.
    Select,
}

pub(crate) enum Completion {
    Alert(AlertCallback),
    Select(SelectCallback),
}

impl Completion {
    pub(crate) fn call(self, menu: &mut MenuMut<'_>, selection: Option<(usize, String)>) {
        match (self, selection) {
            (Completion::Alert(f), _) => f(menu),
            (Completion::Select(f), Some((index, label))) => f(menu, index, label),
            (Completion::Select(_), None) => {}
        }
    }
}

/// A first click waiting to become either a selection or a double click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingClick {
    pub option: usize,
    pub timer: TimerId,
}

#[derive(Debug)]
pub(crate) struct SelectState {
    pub options: Vec<String>,
    /// Always `< options.len()`.
    pub current: usize,
    pub list: NodeId,
    pub option_subscriptions: Vec<SubscriptionId>,
    pub pending_click: Option<PendingClick>,
}

#[derive(Debug)]
pub(crate) enum SessionKind {
    Alert,
    Select(SelectState),
}

pub(crate) struct DialogSession {
    pub generation: u64,
    pub root: NodeId,
    pub form: NodeId,
    pub submit: NodeId,
    pub subscriptions: Vec<SubscriptionId>,
    pub kind: SessionKind,
    pub on_complete: Option<Completion>,
}

impl DialogSession {
    pub(crate) fn dialog_kind(&self) -> DialogKind {
        match self.kind {
            SessionKind::Alert => DialogKind::Alert,
            SessionKind::Select(_) => DialogKind::Select,
        }
    }

    pub(crate) fn selected_index(&self) -> Option<usize> {
        match &self.kind {
            SessionKind::Select(state) => Some(state.current),
            SessionKind::Alert => None,
        }
    }

    /// Index and label of the current option.
    pub(crate) fn selection(&self) -> Option<(usize, String)> {
        match &self.kind {
            SessionKind::Select(state) => state
                .options
                .get(state.current)
                .map(|label| (state.current, label.clone())),
            SessionKind::Alert => None,
        }
    }

    pub(crate) fn select_state_mut(&mut self) -> Option<&mut SelectState> {
        match &mut self.kind {
            SessionKind::Select(state) => Some(state),
            SessionKind::Alert => None,
        }
    }
}

impl std::fmt::Debug for DialogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogSession")
            .field("generation", &self.generation)
            .field("root", &self.root)
            .field("kind", &self.kind)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}
