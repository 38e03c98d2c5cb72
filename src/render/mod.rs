//! Rendering: text layout of the document, styled rows, crossterm driver.

pub mod driver;
pub mod frame;
pub mod strip;

pub use driver::Driver;
pub use frame::{Frame, Line, LineRole};
pub use strip::{CellStyle, Strip, StyledCell};
