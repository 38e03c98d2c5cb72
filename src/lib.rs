//! # retro-menu
//!
//! Keyboard-navigable, full-screen "retro style" menus and dialogs for the
//! terminal.
//!
//! A [`Page`](page::Page) holds a small element tree (the document). Each menu
//! owns one surface element in it and renders at most one dialog there at a
//! time: an alert, a select list or a yes/no confirm. Arrow keys (or `w`/`s`)
//! move the selection, Tab walks the links, Enter or a double click submits,
//! and the dialog's callback receives the result.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: slotmap-backed document with queries and focus
//! - **[`event`]**: input events, key map, listener registry and dispatch queue
//! - **[`timer`]**: one-shot timers on the page clock
//! - **[`menu`]**: the menu controller and its dialogs
//! - **[`page`]**: owns everything, routes input, runs default actions
//! - **[`render`]**: text layout, styled rows and the crossterm driver
//! - **[`runtime`]**: async terminal event loop
//! - **[`testing`]**: headless pilot and snapshot helpers

// Foundation
pub mod dom;
pub mod error;
pub mod event;
pub mod timer;

// Widget
pub mod menu;
pub mod page;

// Output
pub mod render;
pub mod runtime;

pub mod testing;

pub use error::{MenuError, Result};
pub use menu::{Menu, MenuConfig, MenuId, MenuMut};
pub use page::{Page, PageConfig, Theme};
