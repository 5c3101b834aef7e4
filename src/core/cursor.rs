//! Cursor state management
//!
//! The cursor tracks position, visibility and the pen applied to new cells.

use serde::{Deserialize, Serialize};

use super::Pen;

/// Cursor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Column position (0-indexed)
    pub col: usize,
    /// Row position (0-indexed)
    pub row: usize,
    /// Whether the cursor is visible (DECTCEM)
    pub visible: bool,
    /// Current text attributes (applied to new characters)
    pub pen: Pen,
    /// Pending wrap - cursor is at the right margin, next char will wrap
    pub pending_wrap: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            col: 0,
            row: 0,
            visible: true,
            pen: Pen::default(),
            pending_wrap: false,
        }
    }
}

impl Cursor {
    /// Create a new cursor at the home position
    pub fn new() -> Self {
        Self::default()
    }

    /// Move cursor to absolute position, clamping to bounds
    pub fn move_to(&mut self, col: usize, row: usize, cols: usize, rows: usize) {
        self.col = col.min(cols.saturating_sub(1));
        self.row = row.min(rows.saturating_sub(1));
        self.pending_wrap = false;
    }

    /// Carriage return - move to column 0
    pub fn carriage_return(&mut self) {
        self.col = 0;
        self.pending_wrap = false;
    }
}
