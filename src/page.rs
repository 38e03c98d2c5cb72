//! Page: the document plus everything that acts on it.
//!
//! [`Page`] owns the document, the listener registry, the menus, the click
//! timers and the page clock. It turns raw input into document events, runs
//! the default actions of those events, and lays the document out for drawing.
//! `Page::headless` gives a page with no terminal attached, for tests.

use std::time::Duration;

use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::dom::{Document, FocusChain, NodeData, NodeId};
use crate::error::{MenuError, Result};
use crate::event::handler::{DomEvent, Envelope, EventDispatcher, EventOutcome, EventRegistry};
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn};
use crate::menu::{Handler, Menu, MenuConfig, MenuId, MenuMut};
use crate::render::Frame;
use crate::timer::{TimerId, TimerQueue};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Colours used to draw the page. Names or `#rrggbb` / `#rgb` hex values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub foreground: String,
    pub background: String,
    /// Titles and the active option.
    pub accent: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: "#c0c0c0".into(),
            background: "#0000aa".into(),
            accent: "#ffff55".into(),
        }
    }
}

/// Configuration for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    pub width: u16,
    pub height: u16,
    pub theme: Theme,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            theme: Theme::default(),
        }
    }
}

impl PageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the screen size (builder).
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the theme (builder).
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

/// Payload of a double-click timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClickTimer {
    pub owner: MenuId,
    /// Session generation that armed the timer.
    pub generation: u64,
    pub option: usize,
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

pub struct Page {
    pub document: Document,
    pub(crate) listeners: EventRegistry<Handler>,
    pub(crate) menus: SlotMap<MenuId, Menu>,
    pub(crate) timers: TimerQueue<ClickTimer>,
    dispatcher: EventDispatcher,
    /// Set while the queue is being drained.
    dispatching: bool,
    now: Duration,
    config: PageConfig,
    running: bool,
}

impl Page {
    pub fn new(config: PageConfig) -> Self {
        Self {
            document: Document::new(),
            listeners: EventRegistry::new(),
            menus: SlotMap::with_key(),
            timers: TimerQueue::new(),
            dispatcher: EventDispatcher::new(),
            dispatching: false,
            now: Duration::ZERO,
            config,
            running: true,
        }
    }

    /// A page of the given size with the default theme.
    pub fn headless(width: u16, height: u16) -> Self {
        Self::new(PageConfig::new().with_size(width, height))
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    /// Screen size as (columns, rows).
    pub fn size(&self) -> (u16, u16) {
        (self.config.width, self.config.height)
    }

    // ── Menus ────────────────────────────────────────────────────────

    /// Create a menu and initialize it.
    ///
    /// Fails if the config names a node that is not in the document. A caller
    /// surface is re-attached to its current parent (or the body) by every
    /// `init`.
    pub fn create_menu(&mut self, config: MenuConfig) -> Result<MenuId> {
        for node in [config.surface, config.input_scope].into_iter().flatten() {
            if !self.document.contains(node) {
                return Err(MenuError::Argument(format!(
                    "node {node:?} is not in the document"
                )));
            }
        }
        let id = self.insert_menu(config);
        MenuMut::new(self, id).init();
        Ok(id)
    }

    /// Insert a menu without initializing it. Nodes in `config` must exist.
    pub(crate) fn insert_menu(&mut self, config: MenuConfig) -> MenuId {
        let body = self.document.body();
        let (surface, host, owns_surface) = match config.surface {
            Some(surface) => (surface, self.document.parent(surface).unwrap_or(body), false),
            None => (
                self.document.create(NodeData::new("div").with_class("retro-menu")),
                body,
                true,
            ),
        };
        let scope = config.input_scope.unwrap_or(body);
        let id = self.menus.insert(Menu::new(
            config.title,
            surface,
            scope,
            host,
            owns_surface,
            config.settings,
        ));
        debug!(menu = ?id, ?surface, ?scope, "menu created");
        id
    }

    /// Destroy a menu and drop it from the page.
    ///
    /// A surface the page created is removed from the document; a caller
    /// surface is left detached and empty. Returns `false` for an unknown id.
    /// A menu may remove itself from its own completion callback, but the
    /// handle must not be used afterwards.
    pub fn remove_menu(&mut self, id: MenuId) -> bool {
        match self.menu(id) {
            Some(mut menu) => {
                menu.destroy();
            }
            None => return false,
        }
        let Some(menu) = self.menus.remove(id) else {
            return false;
        };
        if menu.owns_surface() {
            self.document.remove(menu.surface());
        }
        debug!(menu = ?id, "menu removed");
        true
    }

    /// Handle for operating on a menu.
    pub fn menu(&mut self, id: MenuId) -> Option<MenuMut<'_>> {
        if self.menus.contains_key(id) {
            Some(MenuMut::new(self, id))
        } else {
            None
        }
    }

    pub fn menu_state(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(id)
    }

    pub fn menu_ids(&self) -> Vec<MenuId> {
        self.menus.keys().collect()
    }

    pub fn menu_count(&self) -> usize {
        self.menus.len()
    }

    /// Number of live listeners across all menus.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of armed double-click timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Deliver `event` to `target` and its ancestors, then run its default
    /// action unless a listener prevented it.
    ///
    /// Events dispatched by a listener are queued and delivered once the
    /// current one is finished; the nested call returns an empty outcome.
    /// Events aimed at removed nodes reach no one.
    pub fn dispatch(&mut self, target: NodeId, event: DomEvent) -> EventOutcome {
        self.dispatcher.push(Envelope::new(event, target));
        if self.dispatching {
            return EventOutcome::default();
        }

        self.dispatching = true;
        let mut first = None;
        while let Some(envelope) = self.dispatcher.pop() {
            let outcome = self.deliver(&envelope);
            if !outcome.default_prevented {
                self.default_action(&envelope);
            }
            first.get_or_insert(outcome);
        }
        self.dispatching = false;
        first.unwrap_or_default()
    }

    fn deliver(&mut self, envelope: &Envelope) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        for (subscription, handler) in self.listeners.route(&self.document, envelope) {
            // released by an earlier listener of this same event
            if !self.listeners.contains(subscription) || !self.menus.contains_key(handler.owner) {
                continue;
            }
            outcome.handled += 1;
            MenuMut::new(self, handler.owner).handle(handler.command, envelope, &mut outcome);
        }
        outcome
    }

    fn default_action(&mut self, envelope: &Envelope) {
        match envelope.event {
            DomEvent::KeyDown(key) => match (key.code, key.modifiers) {
                (Key::Enter, _) => {
                    if let Some(focused) = self.document.focused() {
                        self.dispatcher.push(Envelope::new(DomEvent::Click, focused));
                    }
                }
                (Key::Tab, m) if m.contains(Modifiers::SHIFT) => self.step_focus(true),
                (Key::Tab, _) => self.step_focus(false),
                (Key::BackTab, _) => self.step_focus(true),
                _ => {}
            },
            DomEvent::Click => {
                let is_submit = self
                    .document
                    .get(envelope.target)
                    .is_some_and(|data| data.tag == "button" && data.attr("type") == Some("submit"));
                if is_submit {
                    if let Some(form) = self.document.closest(envelope.target, "form") {
                        self.dispatcher.push(Envelope::new(DomEvent::Submit, form));
                    }
                }
            }
            DomEvent::Submit => {}
        }
    }

    fn step_focus(&mut self, reverse: bool) {
        let mut chain = FocusChain::from_document(&self.document);
        let next = if reverse {
            chain.focus_previous()
        } else {
            chain.focus_next()
        };
        if let Some(node) = next {
            self.document.focus(node);
        }
    }

    /// Focus `node` if it can take focus, then dispatch a click on it.
    pub fn click(&mut self, node: NodeId) -> EventOutcome {
        self.document.focus(node);
        self.dispatch(node, DomEvent::Click)
    }

    /// Dispatch a submit on `form`.
    pub fn submit(&mut self, form: NodeId) -> EventOutcome {
        self.dispatch(form, DomEvent::Submit)
    }

    /// Press a key on the focused node, or on the body when nothing attached
    /// has focus.
    pub fn press(&mut self, key: KeyEvent) -> EventOutcome {
        let target = self
            .document
            .focused()
            .filter(|node| self.document.is_attached(*node))
            .unwrap_or_else(|| self.document.body());
        self.dispatch(target, DomEvent::KeyDown(key))
    }

    /// Feed one terminal input event into the page.
    ///
    /// Ctrl+C asks the page to quit. A left-button press clicks whatever is
    /// drawn under the pointer.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => {
                if key.code == Key::Char('c') && key.modifiers.contains(Modifiers::CTRL) {
                    self.request_quit();
                    return;
                }
                trace!(?key, "key input");
                self.press(key);
            }
            InputEvent::Mouse(mouse) => {
                if mouse.kind == MouseAction::Down(MouseBtn::Left) {
                    if let Some(node) = self.render().hit(mouse.x, mouse.y) {
                        trace!(x = mouse.x, y = mouse.y, ?node, "mouse click");
                        self.click(node);
                    }
                }
            }
            InputEvent::Resize { width, height } => {
                self.config.width = width;
                self.config.height = height;
            }
        }
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Time since the page was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn advance(&mut self, by: Duration) {
        self.advance_to(self.now + by);
    }

    /// Move the clock to `to` and fire every timer due by then. Never moves
    /// the clock backwards.
    pub fn advance_to(&mut self, to: Duration) {
        self.now = self.now.max(to);
        loop {
            let due = self.timers.take_due(self.now);
            if due.is_empty() {
                break;
            }
            for (timer, fired) in due {
                self.fire(timer, fired);
            }
        }
    }

    fn fire(&mut self, timer: TimerId, fired: ClickTimer) {
        trace!(?timer, menu = ?fired.owner, option = fired.option, "click timer fired");
        if let Some(mut menu) = self.menu(fired.owner) {
            menu.click_timeout(timer, fired);
        }
    }

    /// How long until the next timer is due, if any is armed.
    pub fn next_timer_in(&self) -> Option<Duration> {
        self.timers
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.now))
    }

    // ── Output ───────────────────────────────────────────────────────

    /// Lay out the attached document at the current screen size.
    pub fn render(&self) -> Frame {
        Frame::layout(&self.document, self.config.width, self.config.height)
    }

    pub fn request_quit(&mut self) {
        self.running = false;
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::MouseEvent;
    use crate::menu::{Alert, Select};

    #[test]
    fn headless_defaults() {
        let page = Page::headless(100, 30);
        assert_eq!(page.size(), (100, 30));
        assert_eq!(page.theme(), &Theme::default());
        assert!(!page.should_quit());
        assert_eq!(page.now(), Duration::ZERO);
        assert!(page.document.is_empty());
    }

    #[test]
    fn remove_menu_frees_owned_surface() {
        let mut page = Page::headless(80, 24);
        let id = page.create_menu(MenuConfig::new().with_title("Gone")).unwrap();
        let surface = page.menu_state(id).unwrap().surface();
        assert!(page.remove_menu(id));
        assert!(!page.document.contains(surface));
        assert_eq!(page.menu_count(), 0);
        assert_eq!(page.listener_count(), 0);
        assert!(page.document.is_empty());
        assert!(!page.remove_menu(id));
    }

    #[test]
    fn remove_menu_keeps_caller_surface() {
        let mut page = Page::headless(80, 24);
        let body = page.document.body();
        let surface = page.document.create_child(body, NodeData::new("section"));
        let id = page.create_menu(MenuConfig::new().with_surface(surface)).unwrap();
        assert!(page.remove_menu(id));
        assert!(page.document.contains(surface));
        assert!(page.document.children(surface).is_empty());
        assert_eq!(page.document.parent(surface), None);
    }

    #[test]
    fn remove_menu_cancels_pending_click() {
        let mut page = Page::headless(80, 24);
        let id = Menu::select_dialog(&mut page, "T", Select::new("x", ["A", "B"]))
            .unwrap()
            .id();
        let root = page.menu_state(id).unwrap().dialog_root().unwrap();
        let option = page.document.query_by_class(root, "option")[0];
        page.click(option);
        assert_eq!(page.pending_timers(), 1);
        page.remove_menu(id);
        assert_eq!(page.pending_timers(), 0);
        page.advance(Duration::from_millis(500));
        assert_eq!(page.menu_count(), 0);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut page = Page::headless(80, 24);
        page.handle_input(InputEvent::Key(KeyEvent::new(Key::Char('c'), Modifiers::CTRL)));
        assert!(page.should_quit());
    }

    #[test]
    fn resize_updates_size() {
        let mut page = Page::headless(80, 24);
        page.handle_input(InputEvent::Resize {
            width: 120,
            height: 40,
        });
        assert_eq!(page.size(), (120, 40));
        assert_eq!(page.render().height, 40);
    }

    #[test]
    fn enter_clicks_focused_submit_button() {
        let mut page = Page::headless(80, 24);
        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = std::rc::Rc::clone(&hits);
        Menu::alert_dialog(
            &mut page,
            "T",
            Alert::new("hi").on_complete(move |_| counter.set(counter.get() + 1)),
        );
        page.press(KeyEvent::plain(Key::Enter));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn queued_dispatch_returns_first_outcome() {
        let mut page = Page::headless(80, 24);
        let id = Menu::alert_dialog(&mut page, "T", Alert::new("x").on_complete(|_| {})).id();
        let text = {
            let root = page.menu_state(id).unwrap().dialog_root().unwrap();
            page.document.query_by_class(root, "text")[0]
        };
        // text forwards a submit; the click itself is not prevented
        let outcome = page.click(text);
        assert!(!outcome.default_prevented);
        assert_eq!(outcome.handled, 2);
        assert!(page.menu_state(id).unwrap().dialog().is_none());
    }

    #[test]
    fn events_on_removed_nodes_reach_no_one() {
        let mut page = Page::headless(80, 24);
        let id = Menu::alert_dialog(&mut page, "T", Alert::new("x")).id();
        let form = page.menu_state(id).unwrap().dialog_form().unwrap();
        page.menu(id).unwrap().init();
        assert_eq!(page.submit(form).handled, 0);
    }

    #[test]
    fn unprevented_tab_moves_focus() {
        let mut page = Page::headless(80, 24);
        let body = page.document.body();
        let a = page.document.create_child(body, NodeData::new("button").focusable(true));
        let b = page.document.create_child(body, NodeData::new("button").focusable(true));

        page.press(KeyEvent::plain(Key::Tab));
        assert_eq!(page.document.focused(), Some(a));
        page.press(KeyEvent::plain(Key::Tab));
        assert_eq!(page.document.focused(), Some(b));
        page.press(KeyEvent::plain(Key::BackTab));
        assert_eq!(page.document.focused(), Some(a));
    }

    #[test]
    fn menu_tab_is_prevented() {
        let mut page = Page::headless(80, 24);
        let id = Menu::select_dialog(&mut page, "T", Select::new("x", ["A", "B"])).unwrap().id();
        let submit = page.menu_state(id).unwrap().submit_control().unwrap();
        let rows = page.document.query_by_class(page.document.body(), "option");

        assert!(page.press(KeyEvent::plain(Key::Tab)).default_prevented);
        assert_eq!(page.document.focused(), Some(rows[0]));
        assert_ne!(page.document.focused(), Some(submit));
    }

    #[test]
    fn mouse_press_clicks_drawn_node() {
        let mut page = Page::headless(80, 24);
        let id = Menu::select_dialog(&mut page, "T", Select::new("x", ["A", "B"])).unwrap().id();
        let rows = page.document.query_by_class(page.document.body(), "option");
        let line = page.render().line_of(rows[1]).cloned().unwrap();

        page.handle_input(InputEvent::Mouse(MouseEvent::left_click(line.x + 1, line.y)));
        assert_eq!(page.document.focused(), Some(rows[1]));
        assert_eq!(page.pending_timers(), 1);
        page.advance(Duration::from_millis(250));
        assert_eq!(page.menu_state(id).unwrap().selected_index(), Some(1));
    }

    #[test]
    fn mouse_release_is_ignored() {
        let mut page = Page::headless(80, 24);
        Menu::select_dialog(&mut page, "T", Select::new("x", ["A", "B"])).unwrap();
        let rows = page.document.query_by_class(page.document.body(), "option");
        let line = page.render().line_of(rows[1]).cloned().unwrap();
        page.handle_input(InputEvent::Mouse(MouseEvent {
            kind: MouseAction::Up(MouseBtn::Left),
            x: line.x,
            y: line.y,
            modifiers: Modifiers::NONE,
        }));
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn next_timer_counts_down() {
        let mut page = Page::headless(80, 24);
        Menu::select_dialog(&mut page, "T", Select::new("x", ["A", "B"])).unwrap();
        assert_eq!(page.next_timer_in(), None);
        let rows = page.document.query_by_class(page.document.body(), "option");
        page.click(rows[0]);
        page.advance(Duration::from_millis(100));
        assert_eq!(page.next_timer_in(), Some(Duration::from_millis(150)));
        page.advance_to(Duration::from_millis(50));
        assert_eq!(page.now(), Duration::from_millis(100));
    }
}
