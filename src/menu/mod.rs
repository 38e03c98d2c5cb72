//! The menu controller: lifecycle, key hooks, event commands.
//!
//! A [`Menu`] owns one surface node in the page's document and renders at most
//! one dialog into it at a time. Menus live inside the [`Page`]; every
//! operation goes through a [`MenuMut`], a short-lived handle borrowing the
//! page, which is also what completion callbacks receive.

pub mod alert;
pub mod prompt;
pub mod select;
pub mod session;
pub mod settings;
pub mod tab;

use slotmap::new_key_type;
use tracing::{debug, trace};

use crate::dom::node::{NodeData, NodeId};
use crate::error::{MenuError, Result};
use crate::event::binding::KeyAction;
use crate::event::handler::{DomEvent, Envelope, EventKind, EventOutcome, SubscriptionId};
use crate::event::input::KeyEvent;
use crate::page::Page;

pub use alert::Alert;
pub use prompt::Prompt;
pub use select::{Confirm, Select};
pub use session::DialogKind;
pub use settings::MenuSettings;

use session::DialogSession;

new_key_type! {
    /// Identifies a menu within its page.
    pub struct MenuId;
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// What a menu does when one of its listeners fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// Key press on the input scope.
    KeyHook,
    /// The dialog form was submitted.
    SubmitDialog,
    /// Re-raise as a submit on the dialog form.
    ForwardSubmit,
    /// Move focus to the dialog's submit control.
    FocusSubmit,
    /// An option row was clicked.
    ClickOption(usize),
}

/// A registered listener's payload: which menu, which command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Handler {
    pub owner: MenuId,
    pub command: Command,
}

// ---------------------------------------------------------------------------
// MenuConfig
// ---------------------------------------------------------------------------

/// Construction parameters for a menu.
#[derive(Debug, Clone, Default)]
pub struct MenuConfig {
    /// Heading shown above every dialog.
    pub title: String,
    /// Node to render into. A fresh detached `div.retro-menu` when `None`.
    pub surface: Option<NodeId>,
    /// Node receiving key presses. The document body when `None`.
    pub input_scope: Option<NodeId>,
    pub settings: MenuSettings,
}

/// One loose construction argument, for [`MenuConfig::from_args`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuArg {
    Title(String),
    Element(NodeId),
}

impl MenuConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render into an existing node (builder).
    pub fn with_surface(mut self, surface: NodeId) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Listen for keys on this node instead of the body (builder).
    pub fn with_input_scope(mut self, scope: NodeId) -> Self {
        self.input_scope = Some(scope);
        self
    }

    /// Replace the settings (builder).
    pub fn with_settings(mut self, settings: MenuSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build a config from up to three positional arguments.
    ///
    /// At most one title, in any position. A lone element is the input
    /// scope; with two elements the first is the surface and the second the
    /// input scope.
    pub fn from_args(args: impl IntoIterator<Item = MenuArg>) -> Result<Self> {
        let args: Vec<MenuArg> = args.into_iter().collect();
        if args.len() > 3 {
            return Err(MenuError::Argument(format!(
                "expected at most 3 arguments, got {}",
                args.len()
            )));
        }

        let mut config = Self::new();
        let mut title = None;
        let mut elements = Vec::new();
        for (position, arg) in args.into_iter().enumerate() {
            match arg {
                MenuArg::Title(_) if title.is_some() => {
                    return Err(MenuError::Argument(format!(
                        "second title at position {position}"
                    )))
                }
                MenuArg::Title(text) => title = Some(text),
                MenuArg::Element(node) => elements.push(node),
            }
        }
        config.title = title.unwrap_or_default();

        match elements.as_slice() {
            [] => {}
            [scope] => config.input_scope = Some(*scope),
            [surface, scope] => {
                config.surface = Some(*surface);
                config.input_scope = Some(*scope);
            }
            _ => {
                return Err(MenuError::Argument(
                    "expected at most 2 element arguments".into(),
                ))
            }
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

/// State of one menu instance.
#[derive(Debug)]
pub struct Menu {
    title: String,
    surface: NodeId,
    input_scope: NodeId,
    /// Where the surface is attached on `init`.
    host: NodeId,
    /// The page created the surface and removes it with the menu.
    owns_surface: bool,
    settings: MenuSettings,
    hooks: Vec<SubscriptionId>,
    session: Option<DialogSession>,
    next_generation: u64,
}

impl Menu {
    pub(crate) fn new(
        title: String,
        surface: NodeId,
        input_scope: NodeId,
        host: NodeId,
        owns_surface: bool,
        settings: MenuSettings,
    ) -> Self {
        Self {
            title,
            surface,
            input_scope,
            host,
            owns_surface,
            settings,
            hooks: Vec::new(),
            session: None,
            next_generation: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn surface(&self) -> NodeId {
        self.surface
    }

    pub fn input_scope(&self) -> NodeId {
        self.input_scope
    }

    /// Whether the surface was created for this menu rather than supplied.
    pub fn owns_surface(&self) -> bool {
        self.owns_surface
    }

    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    /// Whether key hooks are currently registered.
    pub fn is_hooked(&self) -> bool {
        !self.hooks.is_empty()
    }

    /// The kind of the dialog currently rendered, if any.
    pub fn dialog(&self) -> Option<DialogKind> {
        self.session.as_ref().map(DialogSession::dialog_kind)
    }

    /// The selected option index of the current select/confirm dialog.
    pub fn selected_index(&self) -> Option<usize> {
        self.session.as_ref().and_then(DialogSession::selected_index)
    }

    /// The root node of the current dialog.
    pub fn dialog_root(&self) -> Option<NodeId> {
        self.session.as_ref().map(|s| s.root)
    }

    /// The submit control of the current dialog.
    pub fn submit_control(&self) -> Option<NodeId> {
        self.session.as_ref().map(|s| s.submit)
    }

    /// The form of the current dialog.
    pub fn dialog_form(&self) -> Option<NodeId> {
        self.session.as_ref().map(|s| s.form)
    }

    pub(crate) fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    // ── Convenience constructors ─────────────────────────────────────

    /// Create a menu titled `title` on `page` and show an alert in it.
    ///
    /// Each call adds a menu to the page. Pair it with
    /// [`Page::remove_menu`] once the dialog is done, or reuse the menu with
    /// [`MenuMut::alert`].
    pub fn alert_dialog(page: &mut Page, title: impl Into<String>, alert: Alert) -> MenuMut<'_> {
        let id = page.insert_menu(MenuConfig::new().with_title(title));
        let mut menu = MenuMut::new(page, id);
        menu.alert(alert);
        menu
    }

    /// Create a menu titled `title` on `page` and show a select in it.
    ///
    /// Nothing is created when the start index is out of range. Like
    /// [`alert_dialog`](Self::alert_dialog), pair it with
    /// [`Page::remove_menu`].
    pub fn select_dialog(
        page: &mut Page,
        title: impl Into<String>,
        select: Select,
    ) -> Result<MenuMut<'_>> {
        select.validate()?;
        let id = page.insert_menu(MenuConfig::new().with_title(title));
        let mut menu = MenuMut::new(page, id);
        menu.select(select)?;
        Ok(menu)
    }

    /// Create a menu titled `title` on `page` and show a confirm in it.
    /// Remove it with [`Page::remove_menu`] when done.
    pub fn confirm_dialog(
        page: &mut Page,
        title: impl Into<String>,
        confirm: Confirm,
    ) -> MenuMut<'_> {
        let id = page.insert_menu(MenuConfig::new().with_title(title));
        let mut menu = MenuMut::new(page, id);
        menu.confirm(confirm);
        menu
    }
}

// ---------------------------------------------------------------------------
// MenuMut
// ---------------------------------------------------------------------------

/// Mutable handle to one menu on a page.
///
/// Calling a dialog method after [`destroy`](Self::destroy) without an
/// [`init`](Self::init) in between is a caller error; the result is not
/// specified.
pub struct MenuMut<'p> {
    pub(crate) page: &'p mut Page,
    pub(crate) id: MenuId,
}

impl<'p> MenuMut<'p> {
    /// `id` must name a menu of `page`.
    pub(crate) fn new(page: &'p mut Page, id: MenuId) -> Self {
        Self { page, id }
    }

    pub fn id(&self) -> MenuId {
        self.id
    }

    /// Read-only view of the menu state.
    pub fn state(&self) -> &Menu {
        &self.page.menus[self.id]
    }

    /// The page this menu lives on, e.g. to open another dialog from a callback.
    pub fn page(&mut self) -> &mut Page {
        self.page
    }

    pub(crate) fn menu_mut(&mut self) -> &mut Menu {
        &mut self.page.menus[self.id]
    }

    pub(crate) fn listen(&mut self, node: NodeId, kind: EventKind, command: Command) -> SubscriptionId {
        let handler = Handler {
            owner: self.id,
            command,
        };
        self.page.listeners.subscribe(node, kind, handler)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Reset the surface to an empty titled chrome with fresh key hooks.
    ///
    /// Any rendered dialog is discarded without running its callback.
    /// Calling this repeatedly always leaves one heading and one hook.
    pub fn init(&mut self) -> &mut Self {
        self.discard_session();

        let page = &mut *self.page;
        let menu = &mut page.menus[self.id];
        let doc = &mut page.document;
        if !doc.contains(menu.host) {
            menu.host = doc.body();
        }
        doc.detach(menu.surface);
        doc.empty(menu.surface);
        doc.create_child(
            menu.surface,
            NodeData::new("h1").with_class("title").with_text(menu.title.clone()),
        );
        doc.append(menu.host, menu.surface);

        self.stop_hooks();
        self.start_hooks();
        debug!(menu = ?self.id, title = %self.state().title, "menu initialized");
        self
    }

    /// Release hooks, drop any dialog, and detach the emptied surface.
    ///
    /// The menu itself stays on the page; see [`Page::remove_menu`].
    pub fn destroy(&mut self) -> &mut Self {
        self.stop_hooks();
        self.discard_session();

        let page = &mut *self.page;
        let surface = page.menus[self.id].surface;
        page.document.detach(surface);
        page.document.empty(surface);
        debug!(menu = ?self.id, "menu destroyed");
        self
    }

    /// Register the key listener on the input scope, replacing any existing one.
    pub fn start_hooks(&mut self) -> &mut Self {
        self.stop_hooks();
        let scope = self.state().input_scope;
        let hook = self.listen(scope, EventKind::KeyDown, Command::KeyHook);
        self.menu_mut().hooks.push(hook);
        self
    }

    /// Release the key listener. Safe to call when none is registered.
    pub fn stop_hooks(&mut self) -> &mut Self {
        let page = &mut *self.page;
        let menu = &mut page.menus[self.id];
        page.listeners.unsubscribe_all(&mut menu.hooks);
        self
    }

    /// Tear down the current session: its listeners, timer and DOM.
    pub(crate) fn discard_session(&mut self) {
        let page = &mut *self.page;
        let Some(mut session) = page.menus[self.id].session.take() else {
            return;
        };
        page.listeners.unsubscribe_all(&mut session.subscriptions);
        if let Some(state) = session.select_state_mut() {
            page.listeners.unsubscribe_all(&mut state.option_subscriptions);
            if let Some(pending) = state.pending_click.take() {
                page.timers.cancel(pending.timer);
            }
        }
        page.document.remove(session.root);
        trace!(menu = ?self.id, generation = session.generation, "session discarded");
    }

    /// Focus the current dialog's submit control, if there is one.
    pub(crate) fn focus_submit(&mut self) {
        if let Some(submit) = self.state().submit_control() {
            self.page.document.focus(submit);
        }
    }

    // ── Completion ───────────────────────────────────────────────────

    /// Run the dialog's callback, if it has one.
    ///
    /// The dialog DOM is removed and the menu re-initialized first, so the
    /// callback sees a clean menu it may reuse. Without a callback this does
    /// nothing and the dialog stays up.
    pub(crate) fn complete(&mut self) {
        let Some(session) = self.menu_mut().session.as_mut() else {
            return;
        };
        let result = session.selection();
        let Some(on_complete) = session.on_complete.take() else {
            debug!(menu = ?self.id, "submitted a dialog without a callback");
            return;
        };

        self.discard_session();
        self.init();
        debug!(menu = ?self.id, ?result, "dialog completed");
        on_complete.call(self, result);
    }

    // ── Event commands ───────────────────────────────────────────────

    pub(crate) fn handle(&mut self, command: Command, envelope: &Envelope, outcome: &mut EventOutcome) {
        match command {
            Command::KeyHook => {
                if let DomEvent::KeyDown(key) = envelope.event {
                    self.on_key(key, outcome);
                }
            }
            Command::SubmitDialog => {
                outcome.prevent_default();
                self.complete();
            }
            Command::ForwardSubmit => {
                if let Some(form) = self.state().dialog_form() {
                    self.page.dispatch(form, DomEvent::Submit);
                }
            }
            Command::FocusSubmit => self.focus_submit(),
            Command::ClickOption(index) => self.click_option(index),
        }
    }

    fn on_key(&mut self, key: KeyEvent, outcome: &mut EventOutcome) {
        let Some(binding) = self.state().settings.keymap.resolve(&key) else {
            return;
        };
        if binding.prevent_default {
            outcome.prevent_default();
        }
        trace!(menu = ?self.id, action = %binding.action, "key action");
        if binding.action.is_tab() {
            self.tab(binding.action == KeyAction::TabBackward);
        } else {
            self.move_selection(binding.action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::{Key, Modifiers};

    fn key(code: Key) -> DomEvent {
        DomEvent::KeyDown(KeyEvent::new(code, Modifiers::NONE))
    }

    // ── MenuConfig::from_args ────────────────────────────────────────

    #[test]
    fn from_args_empty() {
        let config = MenuConfig::from_args([]).unwrap();
        assert_eq!(config.title, "");
        assert!(config.surface.is_none());
        assert!(config.input_scope.is_none());
    }

    #[test]
    fn from_args_title_then_elements() {
        let mut page = Page::headless(80, 24);
        let surface = page.document.create(NodeData::new("div"));
        let scope = page.document.body();

        let config = MenuConfig::from_args([
            MenuArg::Title("Main".into()),
            MenuArg::Element(surface),
            MenuArg::Element(scope),
        ])
        .unwrap();
        assert_eq!(config.title, "Main");
        assert_eq!(config.surface, Some(surface));
        assert_eq!(config.input_scope, Some(scope));
    }

    #[test]
    fn from_args_lone_element_is_input_scope() {
        let mut page = Page::headless(80, 24);
        let scope = page.document.create(NodeData::new("div"));
        let config = MenuConfig::from_args([MenuArg::Element(scope)]).unwrap();
        assert_eq!(config.title, "");
        assert!(config.surface.is_none());
        assert_eq!(config.input_scope, Some(scope));
    }

    #[test]
    fn from_args_rejects_four() {
        let body = Page::headless(80, 24).document.body();
        let err = MenuConfig::from_args([
            MenuArg::Title("a".into()),
            MenuArg::Element(body),
            MenuArg::Element(body),
            MenuArg::Element(body),
        ])
        .unwrap_err();
        assert!(matches!(err, MenuError::Argument(_)));
    }

    #[test]
    fn from_args_title_after_element() {
        let body = Page::headless(80, 24).document.body();
        let config =
            MenuConfig::from_args([MenuArg::Element(body), MenuArg::Title("late".into())]).unwrap();
        assert_eq!(config.title, "late");
        assert_eq!(config.input_scope, Some(body));
    }

    #[test]
    fn from_args_rejects_second_title() {
        let err = MenuConfig::from_args([MenuArg::Title("a".into()), MenuArg::Title("b".into())])
            .unwrap_err();
        assert!(matches!(err, MenuError::Argument(_)));
    }

    #[test]
    fn from_args_rejects_three_elements() {
        let body = Page::headless(80, 24).document.body();
        let err = MenuConfig::from_args([
            MenuArg::Element(body),
            MenuArg::Element(body),
            MenuArg::Element(body),
        ])
        .unwrap_err();
        assert!(matches!(err, MenuError::Argument(_)));
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn create_defaults() {
        let mut page = Page::headless(80, 24);
        let id = page.create_menu(MenuConfig::new()).unwrap();
        let menu = page.menu_state(id).unwrap();
        assert_eq!(menu.title(), "");
        assert_eq!(menu.input_scope(), page.document.body());
        assert!(page.document.is_attached(menu.surface()));
        assert!(page.document.has_class(menu.surface(), "retro-menu"));
        assert!(menu.is_hooked());
    }

    #[test]
    fn create_rejects_unknown_nodes() {
        let mut page = Page::headless(80, 24);
        let gone = page.document.create(NodeData::new("div"));
        page.document.remove(gone);
        let err = page
            .create_menu(MenuConfig::new().with_surface(gone))
            .unwrap_err();
        assert!(matches!(err, MenuError::Argument(_)));
        let err = page
            .create_menu(MenuConfig::new().with_input_scope(gone))
            .unwrap_err();
        assert!(matches!(err, MenuError::Argument(_)));
    }

    #[test]
    fn caller_surface_is_reattached_to_its_parent() {
        let mut page = Page::headless(80, 24);
        let body = page.document.body();
        let panel = page.document.create_child(body, NodeData::new("div"));
        let surface = page.document.create_child(panel, NodeData::new("section"));
        let id = page
            .create_menu(MenuConfig::new().with_title("T").with_surface(surface))
            .unwrap();

        page.menu(id).unwrap().destroy();
        assert!(!page.document.is_attached(surface));
        page.menu(id).unwrap().init();
        assert_eq!(page.document.parent(surface), Some(panel));
    }

    // ── init / destroy ───────────────────────────────────────────────

    #[test]
    fn init_is_idempotent() {
        let mut page = Page::headless(80, 24);
        let id = page.create_menu(MenuConfig::new().with_title("Main")).unwrap();
        page.menu(id).unwrap().init().init();

        let surface = page.menu_state(id).unwrap().surface();
        let headings = page.document.query_by_tag(surface, "h1");
        assert_eq!(headings.len(), 1);
        assert_eq!(page.document.get(headings[0]).unwrap().text.as_deref(), Some("Main"));
        assert_eq!(page.listener_count(), 1);

        let body = page.document.body();
        let outcome = page.dispatch(body, key(Key::Down));
        assert_eq!(outcome.handled, 1);
    }

    #[test]
    fn destroy_releases_everything() {
        let mut page = Page::headless(80, 24);
        let id = page.create_menu(MenuConfig::new().with_title("Main")).unwrap();
        page.menu(id).unwrap().alert(Alert::new("hello"));
        assert!(page.listener_count() > 1);

        page.menu(id).unwrap().destroy();
        let menu = page.menu_state(id).unwrap();
        assert!(!menu.is_hooked());
        assert!(menu.dialog().is_none());
        assert!(page.document.children(menu.surface()).is_empty());
        assert!(!page.document.is_attached(menu.surface()));
        assert_eq!(page.listener_count(), 0);
    }

    // ── Hooks ────────────────────────────────────────────────────────

    #[test]
    fn hooks_never_accumulate() {
        let mut page = Page::headless(80, 24);
        let id = page.create_menu(MenuConfig::new()).unwrap();
        page.menu(id)
            .unwrap()
            .start_hooks()
            .start_hooks()
            .stop_hooks()
            .start_hooks();

        let body = page.document.body();
        assert_eq!(page.dispatch(body, key(Key::Up)).handled, 1);
    }

    #[test]
    fn stop_hooks_without_hooks_is_safe() {
        let mut page = Page::headless(80, 24);
        let id = page.create_menu(MenuConfig::new()).unwrap();
        page.menu(id).unwrap().stop_hooks().stop_hooks();
        let body = page.document.body();
        assert_eq!(page.dispatch(body, key(Key::Up)).handled, 0);
    }

    #[test]
    fn hooked_keys_prevent_default() {
        let mut page = Page::headless(80, 24);
        page.create_menu(MenuConfig::new()).unwrap();
        let body = page.document.body();
        assert!(page.dispatch(body, key(Key::Up)).default_prevented);
        assert!(page.dispatch(body, key(Key::Tab)).default_prevented);
        assert!(!page.dispatch(body, key(Key::Char('s'))).default_prevented);
        assert!(!page.dispatch(body, key(Key::Enter)).default_prevented);
    }

    #[test]
    fn separate_menus_keep_separate_settings() {
        let mut page = Page::headless(80, 24);
        let a = page
            .create_menu(MenuConfig::new().with_settings(MenuSettings::new().with_labels("Yes", "No")))
            .unwrap();
        let b = page.create_menu(MenuConfig::new()).unwrap();
        assert_eq!(page.menu_state(a).unwrap().settings().labels.affirmative, "Yes");
        assert_eq!(page.menu_state(b).unwrap().settings().labels.affirmative, "OK");
    }
}
