//! Key map: raw key presses to navigation actions.
//!
//! [`KeyMap`] maps key+modifier combinations to [`KeyBinding`]s. The default
//! map follows the classic layout: arrows or `W`/`S` move the selection, Tab
//! and Shift+Tab walk through the focusable entries.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};

// ---------------------------------------------------------------------------
// Key constants
// ---------------------------------------------------------------------------

/// Move the selection up.
pub const KEY_UP: Key = Key::Up;
/// Move the selection down.
pub const KEY_DOWN: Key = Key::Down;
/// Alternative "up" key (matched case-insensitively).
pub const KEY_W: Key = Key::Char('w');
/// Alternative "down" key (matched case-insensitively).
pub const KEY_S: Key = Key::Char('s');
/// Walk forward; with Shift, walk backward.
pub const KEY_TAB: Key = Key::Tab;
/// What most terminals report for Shift+Tab.
pub const KEY_BACKTAB: Key = Key::BackTab;

// ---------------------------------------------------------------------------
// KeyAction
// ---------------------------------------------------------------------------

/// A normalized navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    MoveUp,
    MoveDown,
    TabForward,
    TabBackward,
}

impl KeyAction {
    /// All actions, in declaration order.
    pub const ALL: [KeyAction; 4] = [
        KeyAction::MoveUp,
        KeyAction::MoveDown,
        KeyAction::TabForward,
        KeyAction::TabBackward,
    ];

    /// Stable name of the action.
    pub fn name(self) -> &'static str {
        match self {
            KeyAction::MoveUp => "up",
            KeyAction::MoveDown => "down",
            KeyAction::TabForward => "tab",
            KeyAction::TabBackward => "shift-tab",
        }
    }

    /// Whether this action is handled by the controller instead of the dialog.
    pub fn is_tab(self) -> bool {
        matches!(self, KeyAction::TabForward | KeyAction::TabBackward)
    }
}

impl std::fmt::Display for KeyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// KeyBinding
// ---------------------------------------------------------------------------

/// What a key press resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub action: KeyAction,
    /// Suppress the page's default handling (scrolling, focus traversal).
    pub prevent_default: bool,
}

// ---------------------------------------------------------------------------
// KeyMap
// ---------------------------------------------------------------------------

/// Registry of key bindings, mapping (Key, Modifiers) -> KeyBinding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: HashMap<(Key, Modifiers), KeyBinding>,
}

impl KeyMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a map with the default navigation bindings.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.bind(KEY_UP, Modifiers::NONE, KeyAction::MoveUp, true);
        map.bind(KEY_W, Modifiers::NONE, KeyAction::MoveUp, false);
        map.bind(KEY_DOWN, Modifiers::NONE, KeyAction::MoveDown, true);
        map.bind(KEY_S, Modifiers::NONE, KeyAction::MoveDown, false);
        map.bind(KEY_TAB, Modifiers::NONE, KeyAction::TabForward, true);
        map.bind(KEY_TAB, Modifiers::SHIFT, KeyAction::TabBackward, true);
        map.bind(KEY_BACKTAB, Modifiers::NONE, KeyAction::TabBackward, true);
        map
    }

    /// Register a binding, replacing any existing one for this combination.
    ///
    /// Character keys are stored lowercased; see [`resolve`](Self::resolve).
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: KeyAction, prevent_default: bool) {
        self.bindings.insert(
            normalize(key, modifiers),
            KeyBinding {
                action,
                prevent_default,
            },
        );
    }

    /// Remove a binding, returning it if present.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<KeyBinding> {
        self.bindings.remove(&normalize(key, modifiers))
    }

    /// Look up the binding for a key press.
    ///
    /// Letters match regardless of case and Shift (like key codes do), and
    /// `BackTab` matches whether or not the terminal also reports Shift.
    pub fn resolve(&self, event: &KeyEvent) -> Option<KeyBinding> {
        self.bindings
            .get(&normalize(event.code, event.modifiers))
            .copied()
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the map has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn normalize(key: Key, modifiers: Modifiers) -> (Key, Modifiers) {
    match key {
        Key::Char(c) if c.is_alphabetic() => (
            Key::Char(c.to_lowercase().next().unwrap_or(c)),
            modifiers.without(Modifiers::SHIFT),
        ),
        Key::BackTab => (Key::BackTab, modifiers.without(Modifiers::SHIFT)),
        _ => (key, modifiers),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
