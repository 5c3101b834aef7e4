//! Screen model implementation
//!
//! The interpreter drives a screen through the [`Buffer`] trait: a grid of
//! cells with a cursor and tab stops. [`Screen`] is the in-memory
//! implementation used by [`Terminal`](crate::terminal::Terminal).

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::cursor::Cursor;
use super::tabstops::{TabStops, DEFAULT_TAB_WIDTH};

/// A rectangle of cells, in 0-based columns and rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clip the rectangle to a `cols` x `rows` screen
    pub fn clip(self, cols: usize, rows: usize) -> Self {
        let x = self.x.min(cols);
        let y = self.y.min(rows);
        Self {
            x,
            y,
            width: self.width.min(cols - x),
            height: self.height.min(rows - y),
        }
    }
}

/// Cell storage the interpreter writes to
pub trait Buffer {
    /// Number of columns
    fn width(&self) -> usize;

    /// Number of rows
    fn height(&self) -> usize;

    fn cursor(&self) -> &Cursor;

    fn cursor_mut(&mut self) -> &mut Cursor;

    /// Move the cursor, clamping it into the screen
    fn move_cursor(&mut self, col: usize, row: usize);

    /// The cell at a position, if it is on screen
    fn cell(&self, col: usize, row: usize) -> Option<&Cell>;

    /// Copy `cell` into every position of `rect` that is on screen
    fn fill(&mut self, cell: &Cell, rect: Rect);

    /// Reset `rect`, or the whole screen, to default cells
    fn clear(&mut self, rect: Option<Rect>);

    /// Column of the next tab stop after `col`
    fn next_tab_stop(&self, col: usize) -> usize;

    /// Write a grapheme of the given width at the cursor with the cursor's
    /// pen and advance, wrapping to the next line at the right margin
    fn put(&mut self, grapheme: &str, width: usize);

    /// Move the cursor down one row, scrolling at the bottom
    fn linefeed(&mut self);
}

/// An in-memory screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    /// Number of columns
    cols: usize,
    /// Number of rows
    rows: usize,
    /// Cell grid (row-major)
    grid: Vec<Vec<Cell>>,
    cursor: Cursor,
    tab_stops: TabStops,
}

impl Screen {
    /// Create a new screen with the given dimensions
    pub fn new(cols: usize, rows: usize) -> Self {
        Self::with_tab_width(cols, rows, DEFAULT_TAB_WIDTH)
    }

    /// Create a screen with tab stops every `tab_width` columns
    pub fn with_tab_width(cols: usize, rows: usize, tab_width: usize) -> Self {
        Self {
            cols,
            rows,
            grid: vec![vec![Cell::default(); cols]; rows],
            cursor: Cursor::new(),
            tab_stops: TabStops::new(cols, tab_width),
        }
    }

    /// Text of one row, continuation cells skipped and trailing blanks trimmed
    pub fn row_text(&self, row: usize) -> String {
        let mut text = String::new();
        let mut skip = 0;
        for cell in self.grid.get(row).into_iter().flatten() {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            if cell.is_empty() {
                text.push(' ');
            } else {
                text.push_str(&cell.content);
                skip = cell.width.saturating_sub(1);
            }
        }
        text.truncate(text.trim_end_matches(' ').len());
        text
    }

    /// Scroll the screen up by n lines (content moves up, new lines at bottom)
    pub fn scroll_up(&mut self, n: usize) {
        let n = n.min(self.rows);
        if n == 0 {
            return;
        }
        self.grid.drain(..n);
        let cols = self.cols;
        self.grid.extend((0..n).map(|_| vec![Cell::default(); cols]));
    }

    /// Handle carriage return (CR)
    pub fn carriage_return(&mut self) {
        self.cursor.carriage_return();
    }

    fn wrap_cursor(&mut self) {
        self.cursor.carriage_return();
        self.linefeed();
    }
}

impl Buffer for Screen {
    fn width(&self) -> usize {
        self.cols
    }

    fn height(&self) -> usize {
        self.rows
    }

    fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    fn move_cursor(&mut self, col: usize, row: usize) {
        self.cursor.move_to(col, row, self.cols, self.rows);
    }

    fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        self.grid.get(row).and_then(|line| line.get(col))
    }

    fn fill(&mut self, cell: &Cell, rect: Rect) {
        let rect = rect.clip(self.cols, self.rows);
        for line in self.grid.iter_mut().skip(rect.y).take(rect.height) {
            for slot in line.iter_mut().skip(rect.x).take(rect.width) {
                slot.clone_from(cell);
            }
        }
    }

    fn clear(&mut self, rect: Option<Rect>) {
        let rect = rect.unwrap_or_else(|| Rect::new(0, 0, self.cols, self.rows));
        self.fill(&Cell::default(), rect);
    }

    fn next_tab_stop(&self, col: usize) -> usize {
        self.tab_stops.next(col)
    }

    fn put(&mut self, grapheme: &str, width: usize) {
        if width == 0 || width > self.cols || self.rows == 0 {
            return;
        }

        if self.cursor.pending_wrap || self.cursor.col + width > self.cols {
            self.wrap_cursor();
        }

        let (col, row) = (self.cursor.col, self.cursor.row);
        let pen = self.cursor.pen;
        if let Some(line) = self.grid.get_mut(row) {
            line[col] = Cell::new(grapheme, width, pen);
            for spacer in line.iter_mut().skip(col + 1).take(width - 1) {
                *spacer = Cell {
                    pen,
                    ..Cell::default()
                };
            }
        }

        let next = col + width;
        if next >= self.cols {
            self.cursor.col = self.cols - 1;
            self.cursor.pending_wrap = true;
        } else {
            self.cursor.col = next;
        }
    }

    fn linefeed(&mut self) {
        self.cursor.pending_wrap = false;
        if self.cursor.row + 1 >= self.rows {
            self.scroll_up(1);
        } else {
            self.cursor.row += 1;
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
