//! Select and confirm dialogs: a vertical option list with one active row.

use tracing::{debug, trace, warn};

use crate::dom::node::NodeData;
use crate::error::{MenuError, Result};
use crate::event::binding::KeyAction;
use crate::event::handler::{DomEvent, EventKind};
use crate::page::ClickTimer;
use crate::timer::TimerId;

use super::session::{Completion, DialogSession, PendingClick, SelectCallback, SelectState, SessionKind};
use super::settings::ACTIVE_CLASS;
use super::{Command, Handler, MenuMut};

/// Parameters of a select dialog.
pub struct Select {
    pub text: String,
    pub options: Vec<String>,
    /// Extra content shown under the text.
    pub message: Option<String>,
    /// Initially active option; must be `< options.len()`.
    pub start_index: usize,
    pub on_complete: Option<SelectCallback>,
}

impl Select {
    pub fn new(text: impl Into<String>, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            message: None,
            start_index: 0,
            on_complete: None,
        }
    }

    /// Show extra content under the text (builder).
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the initially active option (builder).
    pub fn start_index(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }

    /// Run `f` with the chosen index and label once submitted (builder).
    pub fn on_complete(mut self, f: impl FnOnce(&mut MenuMut<'_>, usize, String) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Check the start index against the option list.
    pub fn validate(&self) -> Result<()> {
        if self.start_index < self.options.len() {
            Ok(())
        } else {
            Err(MenuError::Range {
                index: self.start_index,
                len: self.options.len(),
            })
        }
    }
}

/// Parameters of a confirm dialog: a select over the two confirm labels.
pub struct Confirm {
    pub text: String,
    pub message: Option<String>,
    /// Start on the affirmative option (the default) or the negative one.
    pub start_affirmative: bool,
    pub on_complete: Option<Box<dyn FnOnce(&mut MenuMut<'_>, bool)>>,
}

impl Confirm {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            message: None,
            start_affirmative: true,
            on_complete: None,
        }
    }

    /// Show extra content under the text (builder).
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Choose the initially active option (builder).
    pub fn start_affirmative(mut self, affirmative: bool) -> Self {
        self.start_affirmative = affirmative;
        self
    }

    /// Run `f` with `true` for the affirmative answer (builder).
    pub fn on_complete(mut self, f: impl FnOnce(&mut MenuMut<'_>, bool) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl<'p> MenuMut<'p> {
    /// Show a select dialog, replacing whatever the menu was showing.
    ///
    /// Fails without touching the menu if the start index is out of range.
    ///
    /// ```text
    /// div.dialog.select
    ///  ├ p.text
    ///  ├ div.message       optional
    ///  ├ ul.options
    ///  │  └ a.option       one per option, the current one .active
    ///  └ form              submit completes
    ///     └ button.submit
    /// ```
    pub fn select(&mut self, select: Select) -> Result<&mut Self> {
        select.validate()?;
        self.init();
        let Select {
            text,
            options,
            message,
            start_index,
            on_complete,
        } = select;

        let menu = self.menu_mut();
        let generation = menu.bump_generation();
        let surface = menu.surface;
        let submit_label = menu.settings.submit_label.clone();

        let doc = &mut self.page.document;
        let root = doc.create_child(surface, NodeData::new("div").with_classes(["dialog", "select"]));
        doc.create_child(root, NodeData::new("p").with_class("text").with_text(text));
        if let Some(message) = message {
            doc.create_child(root, NodeData::new("div").with_class("message").with_text(message));
        }
        let list = doc.create_child(root, NodeData::new("ul").with_class("options"));
        let form = doc.create_child(root, NodeData::new("form"));
        let submit = doc.create_child(
            form,
            NodeData::new("button")
                .with_class("submit")
                .with_attr("type", "submit")
                .with_text(submit_label)
                .focusable(true),
        );
        doc.focus(submit);

        let subscriptions = vec![self.listen(form, EventKind::Submit, Command::SubmitDialog)];
        let option_count = options.len();
        self.menu_mut().session = Some(DialogSession {
            generation,
            root,
            form,
            submit,
            subscriptions,
            kind: SessionKind::Select(SelectState {
                options,
                current: start_index,
                list,
                option_subscriptions: Vec::new(),
                pending_click: None,
            }),
            on_complete: on_complete.map(Completion::Select),
        });
        self.redraw_options();
        debug!(menu = ?self.id, generation, option_count, start_index, "select shown");
        Ok(self)
    }

    /// Show a confirm dialog over the menu's affirmative/negative labels.
    pub fn confirm(&mut self, confirm: Confirm) -> &mut Self {
        let labels = self.state().settings.labels.clone();
        let Confirm {
            text,
            message,
            start_affirmative,
            on_complete,
        } = confirm;

        let mut select = Select::new(text, [labels.affirmative, labels.negative])
            .start_index(if start_affirmative { 0 } else { 1 });
        select.message = message;
        if let Some(f) = on_complete {
            select = select.on_complete(move |menu, index, _| f(menu, index == 0));
        }
        if let Err(err) = self.select(select) {
            warn!(menu = ?self.id, %err, "confirm could not be shown");
        }
        self
    }

    /// Rebuild the option rows from the current index.
    pub(crate) fn redraw_options(&mut self) {
        let id = self.id;
        let page = &mut *self.page;
        let Some(session) = page.menus[id].session.as_mut() else {
            return;
        };
        let submit = session.submit;
        let Some(state) = session.select_state_mut() else {
            return;
        };

        page.listeners.unsubscribe_all(&mut state.option_subscriptions);
        page.document.empty(state.list);
        for (index, label) in state.options.iter().enumerate() {
            let mut data = NodeData::new("a")
                .with_class("option")
                .with_text(label.clone())
                .focusable(true);
            if index == state.current {
                data = data.with_class(ACTIVE_CLASS);
            }
            let row = page.document.create_child(state.list, data);
            let handler = Handler {
                owner: id,
                command: Command::ClickOption(index),
            };
            state
                .option_subscriptions
                .push(page.listeners.subscribe(row, EventKind::Click, handler));
        }

        if page.document.focused().is_none() {
            page.document.focus(submit);
        }
    }

    /// Step the active option with wraparound. No-op outside select dialogs.
    pub(crate) fn move_selection(&mut self, action: KeyAction) {
        let Some(state) = self
            .menu_mut()
            .session
            .as_mut()
            .and_then(|s| s.select_state_mut())
        else {
            return;
        };
        let n = state.options.len();
        state.current = match action {
            KeyAction::MoveUp => (state.current + n - 1) % n,
            KeyAction::MoveDown => (state.current + 1) % n,
            KeyAction::TabForward | KeyAction::TabBackward => return,
        };
        self.redraw_options();
    }

    /// A click on option row `index`.
    ///
    /// The first click arms the double-click timer. A second click on the
    /// same row before it fires selects that row and submits; a click on
    /// another row re-arms the timer for that row.
    pub(crate) fn click_option(&mut self, index: usize) {
        let id = self.id;
        let page = &mut *self.page;
        let now = page.now();
        let menu = &mut page.menus[id];
        let timeout = menu.settings.double_click_timeout;
        let Some(session) = menu.session.as_mut() else {
            return;
        };
        let generation = session.generation;
        let form = session.form;
        let Some(state) = session.select_state_mut() else {
            return;
        };
        if index >= state.options.len() {
            return;
        }

        let pending = state.pending_click.take();
        if let Some(pending) = pending {
            page.timers.cancel(pending.timer);
            if pending.option == index {
                state.current = index;
                trace!(menu = ?id, index, "double click");
                page.dispatch(form, DomEvent::Submit);
                return;
            }
        }

        let timer = page.timers.schedule(
            now + timeout,
            ClickTimer {
                owner: id,
                generation,
                option: index,
            },
        );
        state.pending_click = Some(PendingClick {
            option: index,
            timer,
        });
    }

    /// The double-click window of an earlier click ran out.
    pub(crate) fn click_timeout(&mut self, timer: TimerId, fired: ClickTimer) {
        let Some(session) = self.menu_mut().session.as_mut() else {
            return;
        };
        if session.generation != fired.generation {
            return;
        }
        let Some(state) = session.select_state_mut() else {
            return;
        };
        if state.pending_click.map(|p| p.timer) != Some(timer) {
            return;
        }
        state.pending_click = None;
        state.current = fired.option;
        trace!(menu = ?self.id, index = fired.option, "single click");
        self.redraw_options();
    }
}
