//! Headless testing support: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive a [`Page`](crate::page::Page) without a real
//! terminal, and [`render_to_string`] / [`render_annotated`] to capture the
//! screen as text.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{render_annotated, render_to_string};
