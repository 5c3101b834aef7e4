//! Terminal escape sequence scanner
//!
//! An incremental scanner that splits terminal output into printable
//! graphemes, control bytes and escape sequences, one token per call,
//! and can be resumed at any byte boundary.
//! Based on the VT500-series parser model from <https://vt100.net/emu/dec_ansi_parser>

pub mod ansi;
mod context;
pub mod grapheme;
mod params;
mod state;

pub use context::{Parser, DEFAULT_MAX_DATA, DEFAULT_MAX_PARAMS};
pub use params::{Command, Parameter, HAS_MORE_FLAG, PARAM_MASK};
pub use state::{decode_sequence, Input, Kind, State, Token};
