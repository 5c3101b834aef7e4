//! Control characters and sequence introducers
//!
//! Byte values of the C0/C1 controls the scanner cares about, and prefix
//! checks for the 7-bit and 8-bit forms of every sequence introducer.

use super::state::Input;

/// Bell, also terminates OSC strings (xterm extension)
pub const BEL: u8 = 0x07;
/// Cancel
pub const CAN: u8 = 0x18;
/// Substitute
pub const SUB: u8 = 0x1A;
/// Escape
pub const ESC: u8 = 0x1B;
/// Unit separator, the last C0 control
pub const US: u8 = 0x1F;
/// Delete
pub const DEL: u8 = 0x7F;

/// Device Control String (8-bit)
pub const DCS: u8 = 0x90;
/// Start of String (8-bit)
pub const SOS: u8 = 0x98;
/// Control Sequence Introducer (8-bit)
pub const CSI: u8 = 0x9B;
/// String Terminator (8-bit)
pub const ST: u8 = 0x9C;
/// Operating System Command (8-bit)
pub const OSC: u8 = 0x9D;
/// Privacy Message (8-bit)
pub const PM: u8 = 0x9E;
/// Application Program Command (8-bit)
pub const APC: u8 = 0x9F;

fn has_introducer<I: Input + ?Sized>(b: &I, c1: u8, final_byte: u8) -> bool {
    match b.raw() {
        [first, ..] if *first == c1 => true,
        [ESC, second, ..] => *second == final_byte,
        _ => false,
    }
}

/// `CSI` or `ESC [`
pub fn has_csi_prefix<I: Input + ?Sized>(b: &I) -> bool {
    has_introducer(b, CSI, b'[')
}

/// `OSC` or `ESC ]`
pub fn has_osc_prefix<I: Input + ?Sized>(b: &I) -> bool {
    has_introducer(b, OSC, b']')
}

/// `APC` or `ESC _`
pub fn has_apc_prefix<I: Input + ?Sized>(b: &I) -> bool {
    has_introducer(b, APC, b'_')
}

/// `DCS` or `ESC P`
pub fn has_dcs_prefix<I: Input + ?Sized>(b: &I) -> bool {
    has_introducer(b, DCS, b'P')
}

/// `SOS` or `ESC X`
pub fn has_sos_prefix<I: Input + ?Sized>(b: &I) -> bool {
    has_introducer(b, SOS, b'X')
}

/// `PM` or `ESC ^`
pub fn has_pm_prefix<I: Input + ?Sized>(b: &I) -> bool {
    has_introducer(b, PM, b'^')
}

/// `ST` or `ESC \`
pub fn has_st_prefix<I: Input + ?Sized>(b: &I) -> bool {
    has_introducer(b, ST, b'\\')
}

pub fn has_esc_prefix<I: Input + ?Sized>(b: &I) -> bool {
    b.raw().first() == Some(&ESC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_and_eight_bit_prefixes() {
        assert!(has_csi_prefix(&b"\x1b[31m"[..]));
        assert!(has_csi_prefix(&[CSI, b'm'][..]));
        assert!(has_osc_prefix("\x1b]0;title\x07"));
        assert!(has_dcs_prefix(&[DCS][..]));
        assert!(has_apc_prefix("\x1b_payload"));
        assert!(has_sos_prefix("\x1bX"));
        assert!(has_pm_prefix("\x1b^"));
        assert!(has_st_prefix("\x1b\\"));
        assert!(has_esc_prefix("\x1b"));
    }

    #[test]
    fn test_prefix_needs_both_bytes() {
        assert!(!has_csi_prefix("\x1b"));
        assert!(!has_csi_prefix(""));
        assert!(!has_osc_prefix("\x1b["));
        assert!(!has_esc_prefix("a"));
    }
}
