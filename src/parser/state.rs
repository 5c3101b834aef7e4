//! Sequence Scanner
//!
//! Decodes one token per call from a chunk of terminal output: a printable
//! grapheme cluster, a single control byte, or a complete escape sequence
//! (ESC, CSI, DCS, OSC, APC, SOS, PM). When the chunk ends in the middle of
//! a sequence, the whole chunk is consumed and the returned state is fed
//! back into the next call.
//!
//! # State Machine
//!
//! States:
//! - Normal: between tokens
//! - Escape: after ESC, collecting intermediates until a final byte
//! - Marker: after CSI or DCS, accepting private markers `<=>?`
//! - Params: collecting `;` and `:` separated parameters
//! - Intermediate: collecting intermediates until a final byte
//! - String: collecting an OSC/DCS/APC/SOS/PM payload until its terminator
//! - StringEscape: an ESC ended the previous chunk inside a string
//!
//! Every non-normal state remembers which kind of sequence it belongs to,
//! so a resumed call never has to look back at earlier chunks.
//!
//! When a byte cannot continue the current sequence, the sequence is cut
//! short before that byte. The byte is left in the input and starts the
//! next token.

use super::ansi::{APC, BEL, CAN, CSI, DCS, DEL, ESC, OSC, PM, SOS, ST, SUB, US};
use super::context::Parser;
use super::grapheme::first_grapheme;

/// Sequence kind carried by the non-normal states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Csi,
    Dcs,
    Osc,
    Apc,
    Sos,
    Pm,
}

/// Scanner state carried between calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum State {
    #[default]
    Normal,
    Marker(Kind),
    Params(Kind),
    Intermediate(Kind),
    Escape,
    String(Kind),
    StringEscape(Kind),
}

impl State {
    /// Whether the scanner is between tokens
    pub fn is_normal(self) -> bool {
        self == State::Normal
    }
}

/// Text the scanner can walk: byte slices and string slices
pub trait Input {
    fn raw(&self) -> &[u8];

    /// Smallest valid split point at or after `n`
    fn boundary(&self, n: usize) -> usize;

    /// The first `n` bytes; `n` must be a valid split point
    fn prefix(&self, n: usize) -> &Self;
}

impl Input for [u8] {
    fn raw(&self) -> &[u8] {
        self
    }

    fn boundary(&self, n: usize) -> usize {
        n.min(self.len())
    }

    fn prefix(&self, n: usize) -> &Self {
        &self[..n]
    }
}

impl Input for str {
    fn raw(&self) -> &[u8] {
        self.as_bytes()
    }

    fn boundary(&self, n: usize) -> usize {
        let mut n = n.min(self.len());
        while !self.is_char_boundary(n) {
            n += 1;
        }
        n
    }

    fn prefix(&self, n: usize) -> &Self {
        &self[..n]
    }
}

/// One decoded token
#[derive(Debug, PartialEq, Eq)]
pub struct Token<'a, I: ?Sized> {
    /// The bytes of the token, always a prefix of the input
    pub seq: &'a I,
    /// Cells the token occupies; 0 for everything but printable text
    pub width: usize,
    /// Bytes to drop from the input before the next call
    pub consumed: usize,
    /// State to pass to the next call
    pub state: State,
}

fn token<I: Input + ?Sized>(input: &I, end: usize, width: usize, state: State) -> Token<'_, I> {
    let end = input.boundary(end);
    Token {
        seq: input.prefix(end),
        width,
        consumed: end,
        state,
    }
}

fn string_kind(byte: u8) -> Option<Kind> {
    match byte {
        OSC | b']' => Some(Kind::Osc),
        APC | b'_' => Some(Kind::Apc),
        SOS | b'X' => Some(Kind::Sos),
        PM | b'^' => Some(Kind::Pm),
        _ => None,
    }
}

/// Decode the first token of `input`.
///
/// `state` is [`State::Normal`] for a fresh stream, otherwise the state
/// returned by the previous call. When `parser` is given, the command,
/// parameters and string payload of the sequence are collected into it;
/// printable text and control bytes clear it.
///
/// A token may consume zero bytes when a resumed sequence is cut short by
/// the first byte of `input`. The returned state is then `Normal` and the
/// caller simply decodes again.
pub fn decode_sequence<'a, I: Input + ?Sized>(
    input: &'a I,
    state: State,
    mut parser: Option<&mut Parser>,
) -> Token<'a, I> {
    let bytes = input.raw();
    let mut state = state;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];

        match state {
            State::Normal => {
                match c {
                    ESC => {
                        if let Some(p) = parser.as_deref_mut() {
                            p.reset();
                        }
                        state = State::Escape;
                        i += 1;
                        continue;
                    }
                    CSI | DCS => {
                        if let Some(p) = parser.as_deref_mut() {
                            p.reset();
                        }
                        let kind = if c == CSI { Kind::Csi } else { Kind::Dcs };
                        state = State::Marker(kind);
                        i += 1;
                        continue;
                    }
                    _ => {}
                }

                if let Some(kind) = string_kind(c).filter(|_| c >= 0x80) {
                    if let Some(p) = parser.as_deref_mut() {
                        p.begin_string();
                    }
                    state = State::String(kind);
                    i += 1;
                    continue;
                }

                if let Some(p) = parser.as_deref_mut() {
                    p.clear_token();
                }

                if c > US && c < DEL {
                    return token(input, i + 1, 1, State::Normal);
                }
                if c < 0xC0 {
                    // C0, DEL, C1 and stray continuation bytes
                    return token(input, i + 1, 0, State::Normal);
                }

                let (len, width) = first_grapheme(&bytes[i..]);
                return token(input, i + len.max(1), width, State::Normal);
            }

            State::Marker(kind) => {
                if (b'<'..=b'?').contains(&c) {
                    if let Some(p) = parser.as_deref_mut() {
                        p.set_marker(c);
                    }
                    i += 1;
                } else {
                    state = State::Params(kind);
                }
            }

            State::Params(kind) => match c {
                b'0'..=b'9' => {
                    if let Some(p) = parser.as_deref_mut() {
                        p.push_digit(c - b'0');
                    }
                    i += 1;
                }
                b':' | b';' => {
                    if let Some(p) = parser.as_deref_mut() {
                        p.next_param(c == b':');
                    }
                    i += 1;
                }
                _ => state = State::Intermediate(kind),
            },

            State::Intermediate(kind) => {
                if (0x20..=0x2F).contains(&c) {
                    if let Some(p) = parser.as_deref_mut() {
                        p.set_intermediate(c);
                    }
                    i += 1;
                    continue;
                }

                if let Some(p) = parser.as_deref_mut() {
                    p.finish_params();
                }

                if !(0x40..=0x7E).contains(&c) {
                    return token(input, i, 0, State::Normal);
                }

                if let Some(p) = parser.as_deref_mut() {
                    p.set_final(c);
                }
                if kind == Kind::Dcs {
                    if let Some(p) = parser.as_deref_mut() {
                        p.clear_data();
                    }
                    state = State::String(Kind::Dcs);
                    i += 1;
                    continue;
                }
                return token(input, i + 1, 0, State::Normal);
            }

            State::Escape => {
                match c {
                    b'[' | b'P' => {
                        if let Some(p) = parser.as_deref_mut() {
                            p.reset();
                        }
                        let kind = if c == b'[' { Kind::Csi } else { Kind::Dcs };
                        state = State::Marker(kind);
                        i += 1;
                        continue;
                    }
                    b']' | b'X' | b'^' | b'_' => {
                        if let Some(p) = parser.as_deref_mut() {
                            p.begin_string();
                        }
                        if let Some(kind) = string_kind(c) {
                            state = State::String(kind);
                        }
                        i += 1;
                        continue;
                    }
                    _ => {}
                }

                match c {
                    0x20..=0x2F => {
                        if let Some(p) = parser.as_deref_mut() {
                            p.set_intermediate(c);
                        }
                        i += 1;
                    }
                    0x30..=0x7E => {
                        if let Some(p) = parser.as_deref_mut() {
                            p.set_final(c);
                        }
                        return token(input, i + 1, 0, State::Normal);
                    }
                    _ => return token(input, i, 0, State::Normal),
                }
            }

            State::String(kind) => {
                let is_osc = kind == Kind::Osc;
                match c {
                    BEL if is_osc => {
                        finish_osc(parser.as_deref_mut());
                        return token(input, i + 1, 0, State::Normal);
                    }
                    CAN | SUB => {
                        if is_osc {
                            finish_osc(parser.as_deref_mut());
                        }
                        return token(input, i, 0, State::Normal);
                    }
                    ST => {
                        if is_osc {
                            finish_osc(parser.as_deref_mut());
                        }
                        return token(input, i + 1, 0, State::Normal);
                    }
                    ESC => match bytes.get(i + 1) {
                        Some(b'\\') => {
                            if is_osc {
                                finish_osc(parser.as_deref_mut());
                            }
                            return token(input, i + 2, 0, State::Normal);
                        }
                        Some(_) => return token(input, i, 0, State::Normal),
                        None => {
                            state = State::StringEscape(kind);
                            i += 1;
                            continue;
                        }
                    },
                    _ => {}
                }

                if let Some(p) = parser.as_deref_mut() {
                    if p.push_data(c) && c == b';' && is_osc {
                        p.parse_osc_command();
                    }
                }
                i += 1;
            }

            State::StringEscape(kind) => {
                if c == b'\\' {
                    if kind == Kind::Osc {
                        finish_osc(parser.as_deref_mut());
                    }
                    return token(input, i + 1, 0, State::Normal);
                }
                // The pending ESC starts a new sequence
                if let Some(p) = parser.as_deref_mut() {
                    p.reset();
                }
                state = State::Escape;
            }
        }
    }

    Token {
        seq: input.prefix(bytes.len()),
        width: 0,
        consumed: bytes.len(),
        state,
    }
}

fn finish_osc(parser: Option<&mut Parser>) {
    if let Some(p) = parser {
        p.parse_osc_command();
    }
}
