//! Input Decoding Module
//!
//! Turns the byte stream a terminal sends to an application back into
//! events: typed text, control keys, mouse reports and other escape
//! sequences.
//!
//! # Mouse Decoding
//!
//! Mouse reports arrive in one of two encodings:
//! - X10: `CSI M` followed by three raw bytes
//! - SGR: `CSI < Cb ; Cx ; Cy M` (press/motion) or `m` (release)

mod mouse;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use mouse::{
    decode_sgr_mouse, decode_x10_mouse, decode_x10_report, has_x10_prefix, Mouse, MouseButton,
    MouseEvent,
};

use crate::parser::ansi::{has_csi_prefix, APC, CSI, DCS, ESC, OSC, PM, SOS};
use crate::parser::grapheme::is_truncated;
use crate::parser::{decode_sequence, Command, Parser, State};

/// Bytes of a buffered sequence kept beyond the parser's payload capacity,
/// for the introducer, parameters and terminator
const SEQUENCE_HEADROOM: usize = 64;

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Check if any modifier is pressed
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// Renders as `ctrl+alt+shift+`, omitting released modifiers
impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        Ok(())
    }
}

/// A decoded input event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// One grapheme cluster and the cells it occupies
    Text { text: String, width: usize },
    /// A single C0, DEL or C1 control byte
    Control(u8),
    Mouse(MouseEvent),
    /// Any other escape sequence, complete or cut short
    Sequence { bytes: Vec<u8>, command: Command },
}

/// Incremental input decoder.
///
/// Feeds arbitrary chunks through the sequence scanner and keeps whatever
/// is needed to finish a split token on the next call: an unfinished
/// sequence, a truncated UTF-8 character, or the raw bytes of an X10
/// mouse report.
#[derive(Debug, Default)]
pub struct EventDecoder {
    state: State,
    parser: Parser,
    /// Bytes of the sequence being scanned
    pending: Vec<u8>,
    /// Truncated UTF-8 from the end of the last chunk
    carry: Vec<u8>,
    /// `CSI M` plus the report bytes received so far
    x10: Option<Vec<u8>>,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parser(parser: Parser) -> Self {
        Self {
            parser,
            ..Self::default()
        }
    }

    /// Whether no partial token is buffered
    pub fn is_idle(&self) -> bool {
        self.state.is_normal()
            && self.pending.is_empty()
            && self.carry.is_empty()
            && self.x10.is_none()
    }

    /// Decode a chunk of input
    pub fn feed(&mut self, input: &[u8]) -> Vec<Event> {
        let mut events = Vec::new();
        let mut buf = std::mem::take(&mut self.carry);
        buf.extend_from_slice(input);
        let mut rest = &buf[..];

        while let Some(&first) = rest.first() {
            if let Some(report) = self.x10.as_mut() {
                report.push(first);
                rest = &rest[1..];
                if let Some(event) = decode_x10_report(report) {
                    events.push(Event::Mouse(event));
                    self.x10 = None;
                }
                continue;
            }

            if matches!(self.state, State::StringEscape(_)) && first != b'\\' {
                // The held ESC cut the string short and opens a new sequence.
                // It is missing from a string already at the length limit.
                let mut cut = std::mem::take(&mut self.pending);
                if cut.last() == Some(&ESC) {
                    cut.pop();
                }
                if !cut.is_empty() {
                    events.extend(self.classify(cut, 0));
                }
                self.pending.push(ESC);
                self.parser.reset();
                self.state = State::Escape;
            }

            let tok = decode_sequence(rest, self.state, Some(&mut self.parser));
            let (seq, width) = (tok.seq, tok.width);
            self.state = tok.state;
            rest = &rest[tok.consumed..];

            if !self.state.is_normal() {
                self.buffer(seq);
                continue;
            }

            let in_sequence = !self.pending.is_empty()
                || matches!(seq.first(), Some(&(ESC | CSI | DCS | OSC | APC | SOS | PM)));
            let bytes = if in_sequence {
                self.buffer(seq);
                std::mem::take(&mut self.pending)
            } else {
                seq.to_vec()
            };
            if bytes.is_empty() {
                continue;
            }

            if rest.is_empty() && is_truncated(&bytes) {
                self.carry = bytes;
                break;
            }

            if let Some(event) = self.classify(bytes, width) {
                events.push(event);
            }
        }

        events
    }

    /// Append to the sequence being scanned, dropping bytes past the limit
    fn buffer(&mut self, seq: &[u8]) {
        let limit = self.parser.max_data() + SEQUENCE_HEADROOM;
        let room = limit.saturating_sub(self.pending.len());
        self.pending.extend_from_slice(&seq[..seq.len().min(room)]);
    }

    fn classify(&mut self, bytes: Vec<u8>, width: usize) -> Option<Event> {
        let first = bytes[0];
        let is_sequence = bytes.len() > 1 && matches!(first, ESC | CSI | DCS | OSC | APC | SOS | PM);

        if is_sequence {
            if matches!(bytes.as_slice(), [ESC, b'[', b'M'] | [CSI, b'M']) {
                log::trace!("x10 mouse report started");
                self.x10 = Some(bytes);
                return None;
            }
            if has_csi_prefix(&bytes[..]) {
                if let Some(event) = self.parser.mouse_event() {
                    return Some(Event::Mouse(event));
                }
            }
            return Some(Event::Sequence {
                bytes,
                command: self.parser.command(),
            });
        }

        if width > 0 || first >= 0xC0 {
            return Some(Event::Text {
                text: String::from_utf8_lossy(&bytes).into_owned(),
                width,
            });
        }

        Some(Event::Control(first))
    }
}
