//! Deterministic snapshot generation
//!
//! Snapshots capture the active screen and the interpreter state in a
//! serializable format for testing and debugging. Given the same byte
//! stream, the terminal produces identical snapshots.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::cursor::Cursor;
use super::modes::Modes;
use super::screen::Buffer;

/// A complete snapshot of the terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Screen dimensions
    pub cols: usize,
    pub rows: usize,
    /// Visible grid content (row-major)
    pub grid: Vec<Vec<Cell>>,
    pub cursor: Cursor,
    pub modes: Modes,
    /// Window title (OSC 0/2)
    pub title: String,
    /// Whether the alternate screen is active
    pub alternate_screen: bool,
}

impl Snapshot {
    /// Capture `buffer` together with the interpreter state around it
    pub fn from_buffer<B: Buffer>(
        buffer: &B,
        modes: &Modes,
        title: &str,
        alternate_screen: bool,
    ) -> Self {
        let (cols, rows) = (buffer.width(), buffer.height());
        let grid = (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| buffer.cell(col, row).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Snapshot {
            cols,
            rows,
            grid,
            cursor: buffer.cursor().clone(),
            modes: modes.clone(),
            title: title.to_string(),
            alternate_screen,
        }
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Plain text of the grid, one line per row, trailing blanks and
    /// trailing empty lines removed
    pub fn to_text(&self) -> String {
        let mut result = String::new();

        for row in &self.grid {
            let mut skip = 0;
            for cell in row {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                if cell.is_empty() {
                    result.push(' ');
                } else {
                    result.push_str(&cell.content);
                    skip = cell.width.saturating_sub(1);
                }
            }
            result.truncate(result.trim_end_matches(' ').len());
            result.push('\n');
        }

        while result.ends_with("\n\n") {
            result.pop();
        }

        result
    }

    /// Compare grids only, ignoring cursor, modes and title
    pub fn content_equals(&self, other: &Snapshot) -> bool {
        self.cols == other.cols && self.rows == other.rows && self.grid == other.grid
    }
}
