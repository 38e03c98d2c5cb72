//! Raw input types wrapping crossterm for decoupling.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseEvent`] and supporting types.
//! Crossterm events are converted via [`InputEvent::from_crossterm`] so the rest
//! of the crate never depends on crossterm's event model directly.

use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    F(u8),
    /// Anything the menu has no use for.
    Other,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `self` with the bits of `other` cleared.
    pub fn without(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key press with no modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

// ---------------------------------------------------------------------------
// MouseBtn / MouseAction / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// Mouse action kind. Only presses and releases are distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseBtn),
    Up(MouseBtn),
    Other,
}

/// A mouse event at a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// A left-button press at (x, y).
    pub fn left_click(x: u16, y: u16) -> Self {
        Self {
            kind: MouseAction::Down(MouseBtn::Left),
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event delivered to a [`Page`](crate::page::Page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
}

impl InputEvent {
    /// Convert a crossterm event.
    ///
    /// Returns `None` for key releases/repeats and for event kinds the page
    /// does not consume (focus changes, paste).
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        use crossterm::event::{Event, KeyEventKind};

        match event {
            Event::Key(ke) if ke.kind == KeyEventKind::Press => {
                Some(InputEvent::Key(KeyEvent::from(ke)))
            }
            Event::Mouse(me) => Some(InputEvent::Mouse(MouseEvent::from(me))),
            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;

    let mut out = Modifiers::NONE;
    if m.contains(KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode;

        let code = match ct.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        };
        KeyEvent {
            code,
            modifiers: convert_modifiers(ct.modifiers),
        }
    }
}

/// Convert a crossterm mouse button to our `MouseBtn`.
fn convert_mouse_button(b: crossterm::event::MouseButton) -> MouseBtn {
    match b {
        crossterm::event::MouseButton::Left => MouseBtn::Left,
        crossterm::event::MouseButton::Right => MouseBtn::Right,
        crossterm::event::MouseButton::Middle => MouseBtn::Middle,
    }
}

impl From<crossterm::event::MouseEvent> for MouseEvent {
    fn from(me: crossterm::event::MouseEvent) -> Self {
        use crossterm::event::MouseEventKind;

        let kind = match me.kind {
            MouseEventKind::Down(b) => MouseAction::Down(convert_mouse_button(b)),
            MouseEventKind::Up(b) => MouseAction::Up(convert_mouse_button(b)),
            _ => MouseAction::Other,
        };
        MouseEvent {
            kind,
            x: me.column,
            y: me.row,
            modifiers: convert_modifiers(me.modifiers),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        Event, KeyCode, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEventKind,
    };

    fn ct_key(code: KeyCode, modifiers: KeyModifiers) -> crossterm::event::KeyEvent {
        crossterm::event::KeyEvent::new(code, modifiers)
    }

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::ALT));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
    }

    #[test]
    fn modifiers_without() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(mods.without(Modifiers::SHIFT), Modifiers::CTRL);
        assert!(Modifiers::SHIFT.without(Modifiers::SHIFT).is_empty());
    }

    // ── Keys ─────────────────────────────────────────────────────────

    #[test]
    fn from_crossterm_key_char_with_shift() {
        let ke = KeyEvent::from(ct_key(KeyCode::Char('W'), KeyModifiers::SHIFT));
        assert_eq!(ke.code, Key::Char('W'));
        assert!(ke.modifiers.contains(Modifiers::SHIFT));
    }

    #[test]
    fn from_crossterm_navigation_keys() {
        for (ct_code, expected) in [
            (KeyCode::Up, Key::Up),
            (KeyCode::Down, Key::Down),
            (KeyCode::Tab, Key::Tab),
            (KeyCode::BackTab, Key::BackTab),
            (KeyCode::Enter, Key::Enter),
            (KeyCode::Esc, Key::Escape),
        ] {
            let ke = KeyEvent::from(ct_key(ct_code, KeyModifiers::NONE));
            assert_eq!(ke.code, expected);
        }
    }

    #[test]
    fn unsupported_key_maps_to_other() {
        let ke = KeyEvent::from(ct_key(KeyCode::Insert, KeyModifiers::NONE));
        assert_eq!(ke.code, Key::Other);
    }

    // ── Events ───────────────────────────────────────────────────────

    #[test]
    fn key_press_is_converted() {
        let input = InputEvent::from_crossterm(Event::Key(ct_key(
            KeyCode::Down,
            KeyModifiers::NONE,
        )));
        assert_eq!(input, Some(InputEvent::Key(KeyEvent::plain(Key::Down))));
    }

    #[test]
    fn key_release_is_skipped() {
        let release = crossterm::event::KeyEvent::new_with_kind_and_state(
            KeyCode::Down,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(InputEvent::from_crossterm(Event::Key(release)), None);
    }

    #[test]
    fn resize_is_converted() {
        assert_eq!(
            InputEvent::from_crossterm(Event::Resize(120, 40)),
            Some(InputEvent::Resize {
                width: 120,
                height: 40
            })
        );
    }

    #[test]
    fn focus_and_paste_are_skipped() {
        assert_eq!(InputEvent::from_crossterm(Event::FocusGained), None);
        assert_eq!(InputEvent::from_crossterm(Event::Paste("x".into())), None);
    }

    #[test]
    fn mouse_down_from_crossterm() {
        let input = InputEvent::from_crossterm(Event::Mouse(crossterm::event::MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row: 5,
            modifiers: KeyModifiers::NONE,
        }));
        assert_eq!(input, Some(InputEvent::Mouse(MouseEvent::left_click(10, 5))));
    }

    #[test]
    fn mouse_motion_is_other() {
        let me = MouseEvent::from(crossterm::event::MouseEvent {
            kind: MouseEventKind::Moved,
            column: 1,
            row: 2,
            modifiers: KeyModifiers::CONTROL,
        });
        assert_eq!(me.kind, MouseAction::Other);
        assert!(me.modifiers.contains(Modifiers::CTRL));
    }
}
