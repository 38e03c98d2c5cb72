//! Crossterm terminal backend.
//!
//! The `Driver` owns a buffered stdout writer. It switches the terminal into
//! alternate screen + raw mode + mouse capture and draws whole frames.
//! Colour strings are parsed as named colours or hex values.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::strip::{CellStyle, Strip};

/// Terminal output backend.
///
/// Nothing changes on the terminal until [`enter`](Self::enter) is called.
pub struct Driver {
    writer: BufWriter<Stdout>,
}

impl Driver {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(io::stdout()),
        })
    }

    /// Enter alternate screen, raw mode and mouse capture; hide the cursor.
    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.writer, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(())
    }

    /// Undo [`enter`](Self::enter).
    pub fn leave(&mut self) -> io::Result<()> {
        execute!(self.writer, cursor::Show, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Queue every row of a frame. Call [`flush`](Self::flush) to show it.
    pub fn draw(&mut self, strips: &[Strip]) -> io::Result<()> {
        for strip in strips {
            queue!(self.writer, cursor::MoveTo(0, strip.y))?;
            let mut current: Option<&CellStyle> = None;
            for cell in &strip.cells {
                if current != Some(&cell.style) {
                    queue!(self.writer, SetAttribute(Attribute::Reset), ResetColor)?;
                    self.apply_cell_style(&cell.style)?;
                    current = Some(&cell.style);
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }
        queue!(self.writer, SetAttribute(Attribute::Reset), ResetColor)?;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Terminal size as (columns, rows).
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn apply_cell_style(&mut self, style: &CellStyle) -> io::Result<()> {
        if let Some(color) = style.fg.as_deref().and_then(parse_color) {
            queue!(self.writer, SetForegroundColor(color))?;
        }
        if let Some(color) = style.bg.as_deref().and_then(parse_color) {
            queue!(self.writer, SetBackgroundColor(color))?;
        }
        if style.bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(self.writer, SetAttribute(Attribute::Dim))?;
        }
        if style.underline {
            queue!(self.writer, SetAttribute(Attribute::Underlined))?;
        }
        if style.reverse {
            queue!(self.writer, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Colour parsing
// ---------------------------------------------------------------------------

/// Parse a colour string into a crossterm `Color`.
///
/// Accepts `#rrggbb`, `#rgb`, the eight basic colour names, their `dark_`
/// variants and `grey`/`gray`, case-insensitively. Anything else is `None`.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let name = s.to_ascii_lowercase().replace('_', "");
    let color = match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "darkred" => Color::DarkRed,
        "darkgreen" => Color::DarkGreen,
        "darkyellow" => Color::DarkYellow,
        "darkblue" => Color::DarkBlue,
        "darkmagenta" => Color::DarkMagenta,
        "darkcyan" => Color::DarkCyan,
        "darkgrey" | "darkgray" => Color::DarkGrey,
        _ => return None,
    };
    Some(color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        }),
        // #abc is #aabbcc
        3 => Some(Color::Rgb {
            r: channel(0..1)? * 17,
            g: channel(1..2)? * 17,
            b: channel(2..3)? * 17,
        }),
        _ => None,
    }
}
