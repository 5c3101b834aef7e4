//! Terminal Core Module
//!
//! Platform-independent terminal state. This module contains:
//! - Cell representation with its pen
//! - Cursor state and positioning
//! - Mode tables
//! - The screen model behind the [`Buffer`] trait
//! - Deterministic snapshot generation
//!
//! The core is deterministic: given the same sequence of operations, it
//! always produces the same state.

mod cell;
mod cursor;
mod modes;
mod screen;
mod snapshot;
mod tabstops;

pub use cell::{Cell, Color, Pen, Underline};
pub use cursor::Cursor;
pub use modes::{
    ModeSetting, Modes, DEC_MODE_ALT_SCREEN, DEC_MODE_ALT_SCREEN_CLEAR, DEC_MODE_CURSOR_VISIBLE,
    MODE_LINEFEED_NEWLINE,
};
pub use screen::{Buffer, Rect, Screen};
pub use snapshot::Snapshot;
pub use tabstops::{TabStops, DEFAULT_TAB_WIDTH};
