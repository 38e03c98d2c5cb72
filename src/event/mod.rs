//! Event system: raw input, key map, subscriptions and dispatch.

pub mod binding;
pub mod handler;
pub mod input;

pub use binding::{KeyAction, KeyBinding, KeyMap};
pub use handler::{
    DomEvent, Envelope, EventDispatcher, EventKind, EventOutcome, EventRegistry, SubscriptionId,
};
pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
