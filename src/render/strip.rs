//! Strip: one full-width screen row of styled cells.
//!
//! A frame is drawn as one `Strip` per terminal row. Rows start out blank in
//! the page background and have text overlaid onto them.

// ---------------------------------------------------------------------------
// CellStyle
// ---------------------------------------------------------------------------

/// Visual style for a single terminal cell.
///
/// Colours are kept as strings and parsed by the driver, so a theme can use
/// names or `#rrggbb` / `#rgb` hex values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: bool,
    pub dim: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A style with both colours set.
    pub fn colored(fg: impl Into<String>, bg: impl Into<String>) -> Self {
        Self {
            fg: Some(fg.into()),
            bg: Some(bg.into()),
            ..Self::default()
        }
    }

    pub fn with_fg(mut self, fg: impl Into<String>) -> Self {
        self.fg = Some(fg.into());
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

// ---------------------------------------------------------------------------
// StyledCell
// ---------------------------------------------------------------------------

/// One character with its style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub style: CellStyle,
}

impl StyledCell {
    pub fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }

    /// A space in `style`.
    pub fn blank(style: CellStyle) -> Self {
        Self { ch: ' ', style }
    }
}

impl Default for StyledCell {
    fn default() -> Self {
        Self::blank(CellStyle::default())
    }
}

// ---------------------------------------------------------------------------
// Strip
// ---------------------------------------------------------------------------

/// A screen row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    pub y: u16,
    /// Cells from column 0, left to right.
    pub cells: Vec<StyledCell>,
}

impl Strip {
    /// A row of `width` blank cells in `style`.
    pub fn blank(y: u16, width: u16, style: CellStyle) -> Self {
        Self {
            y,
            cells: vec![StyledCell::blank(style); usize::from(width)],
        }
    }

    pub fn width(&self) -> u16 {
        u16::try_from(self.cells.len()).unwrap_or(u16::MAX)
    }

    /// Write `text` starting at column `x`. Characters past the row end are
    /// dropped.
    pub fn overlay(&mut self, x: u16, text: &str, style: &CellStyle) {
        let cells = self.cells.iter_mut().skip(usize::from(x));
        for (cell, ch) in cells.zip(text.chars()) {
            *cell = StyledCell::new(ch, style.clone());
        }
    }

    /// The row's characters with trailing spaces removed.
    pub fn text(&self) -> String {
        let row: String = self.cells.iter().map(|cell| cell.ch).collect();
        row.trim_end().to_owned()
    }
}
