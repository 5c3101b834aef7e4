//! Terminal Cell
//!
//! Represents a single cell in the terminal grid, containing a grapheme
//! and the pen it was written with.

use serde::{Deserialize, Serialize};

/// A single cell in the terminal grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The grapheme in this cell. Empty for blank cells and for the
    /// continuation cell of a wide character.
    pub content: String,
    /// Cells the grapheme occupies (0 for continuations and blanks)
    pub width: usize,
    /// Rendition the cell was written with
    pub pen: Pen,
}

impl Cell {
    /// Create a cell holding `content`
    pub fn new(content: &str, width: usize, pen: Pen) -> Self {
        Self {
            content: content.to_string(),
            width,
            pen,
        }
    }

    /// A blank cell that only keeps a background colour, as left behind
    /// by erase operations
    pub fn blank(bg: Color) -> Self {
        Self {
            pen: Pen {
                bg,
                ..Pen::default()
            },
            ..Self::default()
        }
    }

    /// Check if this cell is empty (no content)
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Color of a pen channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Unset, the terminal's default
    #[default]
    Default,
    /// Standard 16-color palette (0-15), from SGR 30-37/40-47/90-97/100-107
    Basic(u8),
    /// 256-color palette, from `5;n`
    Extended(u8),
    /// 24-bit RGB color, from `2;r;g;b`
    Rgb(u8, u8, u8),
}

impl Color {
    /// Standard ANSI colors (0-7)
    pub const BLACK: Color = Color::Basic(0);
    pub const RED: Color = Color::Basic(1);
    pub const GREEN: Color = Color::Basic(2);
    pub const YELLOW: Color = Color::Basic(3);
    pub const BLUE: Color = Color::Basic(4);
    pub const MAGENTA: Color = Color::Basic(5);
    pub const CYAN: Color = Color::Basic(6);
    pub const WHITE: Color = Color::Basic(7);

    /// Bright ANSI colors (8-15)
    pub const BRIGHT_BLACK: Color = Color::Basic(8);
    pub const BRIGHT_RED: Color = Color::Basic(9);
    pub const BRIGHT_GREEN: Color = Color::Basic(10);
    pub const BRIGHT_YELLOW: Color = Color::Basic(11);
    pub const BRIGHT_BLUE: Color = Color::Basic(12);
    pub const BRIGHT_MAGENTA: Color = Color::Basic(13);
    pub const BRIGHT_CYAN: Color = Color::Basic(14);
    pub const BRIGHT_WHITE: Color = Color::Basic(15);
}

/// Underline style (SGR 4 and `4:n`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

impl Underline {
    /// Style selected by the `n` of `4:n`; unknown values give `None`
    pub fn from_param(n: u32) -> Option<Self> {
        match n {
            0 => Some(Underline::None),
            1 => Some(Underline::Single),
            2 => Some(Underline::Double),
            3 => Some(Underline::Curly),
            4 => Some(Underline::Dotted),
            5 => Some(Underline::Dashed),
            _ => None,
        }
    }
}

/// Graphic rendition applied to newly written cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pen {
    pub bold: bool,
    pub faint: bool,
    pub italic: bool,
    pub underline: Underline,
    pub slow_blink: bool,
    pub rapid_blink: bool,
    pub reverse: bool,
    pub conceal: bool,
    pub strikethrough: bool,
    pub fg: Color,
    pub bg: Color,
    pub underline_color: Color,
}

impl Pen {
    /// Reset every attribute (SGR 0)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
