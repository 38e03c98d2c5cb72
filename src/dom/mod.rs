//! Document arena: slotmap-backed element tree with tag/class queries and focus.

pub mod focus;
pub mod node;
pub mod tree;
pub mod query;

pub use focus::FocusChain;
pub use node::{NodeId, NodeData};
pub use tree::Document;
