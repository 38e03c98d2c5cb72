//! Error type for menu construction and dialog calls.

use thiserror::Error;

/// Errors returned to the caller of a menu operation.
///
/// None of these are retried or recovered internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// Bad construction arguments: too many, out of order, or unknown nodes.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// A select start index outside the option list.
    #[error("start index {index} is out of range for {len} option(s)")]
    Range { index: usize, len: usize },

    /// The dialog kind exists but has no implementation.
    #[error("{0} dialog is not implemented")]
    NotImplemented(&'static str),
}

pub type Result<T> = std::result::Result<T, MenuError>;
