//! vtscan Terminal Library
//!
//! Decodes the byte stream of a terminal-attached program into tokens and
//! interprets them against a terminal screen model.
//! This crate provides:
//!
//! - `parser`: resumable VT/xterm escape sequence scanner
//! - `input`: mouse report decoding (X10 and SGR) and input events
//! - `core`: screen model, cells, cursor, mode tables, snapshots
//! - `terminal`: command interpreter driving the screen model
//! - `app`: configuration

pub mod app;
pub mod core;
pub mod input;
pub mod parser;
pub mod terminal;

pub use terminal::Terminal;
