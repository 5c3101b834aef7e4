//! Packed commands and parameters
//!
//! The scanner never allocates per token. Instead of collecting markers,
//! intermediates and sub-parameter lists into vectors, it packs them into
//! plain integers:
//!
//! - A [`Command`] holds the final byte in bits 0..8, the last marker byte
//!   (`<`, `=`, `>` or `?`) in bits 8..16 and the last intermediate byte
//!   (0x20-0x2F) in bits 16..24.
//! - A [`Parameter`] holds a numeric value in bits 0..31 and a "has more"
//!   flag in bit 31 meaning the next slot is a colon separated sub-parameter
//!   of this one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mask applied to each byte stored in a [`Command`]
pub const COMMAND_MASK: u32 = 0xff;
/// Bit offset of the marker byte
pub const MARKER_SHIFT: u32 = 8;
/// Bit offset of the intermediate byte
pub const INTERMEDIATE_SHIFT: u32 = 16;

/// Bit set on a [`Parameter`] followed by a sub-parameter
pub const HAS_MORE_FLAG: u32 = 1 << 31;
/// Mask selecting the numeric part of a [`Parameter`]
pub const PARAM_MASK: u32 = !HAS_MORE_FLAG;
/// Largest value a parameter can accumulate; one below the missing sentinel
pub const MAX_PARAM: u32 = PARAM_MASK - 1;

/// A packed sequence command
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command(pub u32);

impl Command {
    /// Command of a string sequence whose OSC number was not (yet) parsed
    pub const MISSING: Command = Command(PARAM_MASK);

    /// Pack a command from its marker, intermediate and final bytes.
    ///
    /// Only the low 8 bits of each argument are used. Pass 0 for an absent
    /// marker or intermediate.
    pub const fn new(marker: u32, intermediate: u32, final_byte: u32) -> Self {
        Command(
            (final_byte & COMMAND_MASK)
                | (marker & COMMAND_MASK) << MARKER_SHIFT
                | (intermediate & COMMAND_MASK) << INTERMEDIATE_SHIFT,
        )
    }

    /// The final byte, 0 when the sequence is incomplete or invalid
    pub const fn final_byte(self) -> u8 {
        (self.0 & COMMAND_MASK) as u8
    }

    /// The last marker byte, 0 if there was none
    pub const fn marker(self) -> u8 {
        (self.0 >> MARKER_SHIFT & COMMAND_MASK) as u8
    }

    /// The last intermediate byte, 0 if there was none
    pub const fn intermediate(self) -> u8 {
        (self.0 >> INTERMEDIATE_SHIFT & COMMAND_MASK) as u8
    }

    pub const fn is_missing(self) -> bool {
        self.0 == Self::MISSING.0
    }

    /// Numeric OSC command, if one was parsed
    pub const fn osc_number(self) -> Option<u32> {
        if self.is_missing() {
            None
        } else {
            Some(self.0)
        }
    }

    pub(crate) fn set_final(&mut self, byte: u8) {
        self.0 = (self.0 & !COMMAND_MASK) | u32::from(byte);
    }

    pub(crate) fn set_marker(&mut self, byte: u8) {
        self.0 = (self.0 & !(COMMAND_MASK << MARKER_SHIFT)) | u32::from(byte) << MARKER_SHIFT;
    }

    pub(crate) fn set_intermediate(&mut self, byte: u8) {
        self.0 = (self.0 & !(COMMAND_MASK << INTERMEDIATE_SHIFT))
            | u32::from(byte) << INTERMEDIATE_SHIFT;
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_missing() {
            return f.write_str("Command(missing)");
        }
        let show = |b: u8| if b == 0 { ' ' } else { b as char };
        write!(
            f,
            "Command({:?} marker={:?} intermediate={:?})",
            show(self.final_byte()),
            show(self.marker()),
            show(self.intermediate())
        )
    }
}

/// A packed sequence parameter
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter(pub u32);

impl Default for Parameter {
    fn default() -> Self {
        Self::MISSING
    }
}

impl Parameter {
    /// An omitted parameter, e.g. the first one in `CSI ; 5 H`
    pub const MISSING: Parameter = Parameter(PARAM_MASK);

    /// Pack a value and its "has more sub-parameters" flag.
    ///
    /// Values outside the 31-bit range are masked.
    pub const fn new(value: u32, has_more: bool) -> Self {
        let mut raw = value & PARAM_MASK;
        if has_more {
            raw |= HAS_MORE_FLAG;
        }
        Parameter(raw)
    }

    /// The parameter value, or `default` when it was omitted
    pub const fn value(self, default: u32) -> u32 {
        let v = self.0 & PARAM_MASK;
        if v == PARAM_MASK {
            default
        } else {
            v
        }
    }

    /// Whether the next slot is a colon separated sub-parameter of this one
    pub const fn has_more(self) -> bool {
        self.0 & HAS_MORE_FLAG != 0
    }

    pub const fn is_missing(self) -> bool {
        self.0 & PARAM_MASK == PARAM_MASK
    }

    /// Append a decimal digit, turning a missing parameter into 0 first.
    /// Saturates at [`MAX_PARAM`].
    pub(crate) fn push_digit(&mut self, digit: u8) {
        let flag = self.0 & HAS_MORE_FLAG;
        let current = if self.is_missing() { 0 } else { self.0 & PARAM_MASK };
        let next = current
            .saturating_mul(10)
            .saturating_add(u32::from(digit))
            .min(MAX_PARAM);
        self.0 = flag | next;
    }

    pub(crate) fn set_has_more(&mut self) {
        self.0 |= HAS_MORE_FLAG;
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_missing(), self.has_more()) {
            (true, false) => f.write_str("_"),
            (true, true) => f.write_str("_:"),
            (false, false) => write!(f, "{}", self.value(0)),
            (false, true) => write!(f, "{}:", self.value(0)),
        }
    }
}
