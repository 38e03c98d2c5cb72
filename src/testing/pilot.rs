//! Pilot: drive a headless page the way a user at the terminal would.
//!
//! The `Pilot` owns a [`Page`] with no terminal attached and feeds it input
//! events (key presses, mouse clicks, resizes) and clock ticks, then lets the
//! test inspect the document or the rendered screen.

use std::time::Duration;

use crate::dom::NodeId;
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, MouseEvent};
use crate::page::{Page, PageConfig};
use crate::render::Frame;

/// A headless page driver for tests.
///
/// ```ignore
/// use retro_menu::menu::{Alert, Menu};
/// use retro_menu::testing::Pilot;
///
/// let mut pilot = Pilot::new(40, 10);
/// Menu::alert_dialog(pilot.page_mut(), "Hello", Alert::new("hi"));
/// assert!(pilot.screen_text().contains("[ OK ]"));
/// ```
pub struct Pilot {
    page: Page,
}

impl Pilot {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            page: Page::headless(width, height),
        }
    }

    pub fn with_config(config: PageConfig) -> Self {
        Self {
            page: Page::new(config),
        }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.press_key_with(key, Modifiers::NONE);
    }

    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.page.handle_input(InputEvent::Key(KeyEvent::new(key, modifiers)));
    }

    /// Press each key in order.
    pub fn press_keys(&mut self, keys: &[Key]) {
        for key in keys {
            self.press_key(*key);
        }
    }

    /// Simulate a left-button press at screen cell (x, y).
    pub fn click(&mut self, x: u16, y: u16) {
        self.page.handle_input(InputEvent::Mouse(MouseEvent::left_click(x, y)));
    }

    /// Click where `node` is drawn. Returns `false` if it is not on screen.
    pub fn click_node(&mut self, node: NodeId) -> bool {
        let Some((x, y)) = self.page.render().line_of(node).map(|line| (line.x, line.y)) else {
            return false;
        };
        self.click(x, y);
        true
    }

    /// Click the first line on screen whose text contains `text`.
    pub fn click_text(&mut self, text: &str) -> bool {
        let frame = self.page.render();
        let Some(line) = frame.lines.iter().find(|line| line.text.contains(text)) else {
            return false;
        };
        self.click(line.x, line.y);
        true
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.page.handle_input(InputEvent::Resize { width, height });
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Advance the page clock by `ms` milliseconds, firing due timers.
    pub fn advance_ms(&mut self, ms: u64) {
        self.page.advance(Duration::from_millis(ms));
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn is_running(&self) -> bool {
        !self.page.should_quit()
    }

    pub fn frame(&self) -> Frame {
        self.page.render()
    }

    /// The rendered screen as text. See [`Frame::to_text`].
    pub fn screen_text(&self) -> String {
        self.frame().to_text()
    }
}
