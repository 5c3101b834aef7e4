//! Mouse report decoding
//!
//! Terminals report pointer activity in one of two wire formats once an
//! application enables mouse tracking:
//!
//! - X10: `CSI M Cb Cx Cy`, three raw bytes each offset by 32, with 1-based
//!   coordinates (so coordinates above 222 cannot be represented)
//! - SGR: `CSI < Cb ; Cx ; Cy M` for presses and motion, with final `m` for
//!   releases, and 1-based decimal coordinates
//!
//! Both carry the same button byte:
//!
//! ```text
//! bit 7    extended buttons (backward, forward, 10, 11)
//! bit 6    wheel (up, down, left, right)
//! bit 5    motion
//! bit 4    ctrl
//! bit 3    alt
//! bit 2    shift
//! bits 0-1 button (left, middle, right, none/release)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Modifiers;
use crate::parser::ansi::{CSI, ESC};
use crate::parser::{Command, Parameter};

const BIT_SHIFT: u32 = 0b0000_0100;
const BIT_ALT: u32 = 0b0000_1000;
const BIT_CTRL: u32 = 0b0001_0000;
const BIT_MOTION: u32 = 0b0010_0000;
const BIT_WHEEL: u32 = 0b0100_0000;
const BIT_EXTENDED: u32 = 0b1000_0000;
const BUTTON_MASK: u32 = 0b0000_0011;

/// X10 coordinates and button bytes are offset by 32
const X10_OFFSET: u8 = 32;

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    None,
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
    Backward,
    Forward,
    Button10,
    Button11,
    Unknown,
}

impl MouseButton {
    const LOW: [MouseButton; 4] = [
        MouseButton::Left,
        MouseButton::Middle,
        MouseButton::Right,
        MouseButton::None,
    ];
    const WHEEL: [MouseButton; 4] = [
        MouseButton::WheelUp,
        MouseButton::WheelDown,
        MouseButton::WheelLeft,
        MouseButton::WheelRight,
    ];
    const EXTENDED: [MouseButton; 4] = [
        MouseButton::Backward,
        MouseButton::Forward,
        MouseButton::Button10,
        MouseButton::Button11,
    ];

    pub fn is_wheel(self) -> bool {
        Self::WHEEL.contains(&self)
    }

    pub fn name(self) -> &'static str {
        match self {
            MouseButton::None => "",
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
            MouseButton::WheelUp => "wheelup",
            MouseButton::WheelDown => "wheeldown",
            MouseButton::WheelLeft => "wheelleft",
            MouseButton::WheelRight => "wheelright",
            MouseButton::Backward => "backward",
            MouseButton::Forward => "forward",
            MouseButton::Button10 => "button10",
            MouseButton::Button11 => "button11",
            MouseButton::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pointer position, button and modifiers of a report.
///
/// Coordinates are 0-based cells. X10 reports may decode to negative values
/// when the terminal wrapped a coordinate past 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Mouse {
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
    pub mods: Modifiers,
}

impl fmt::Display for Mouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mods, self.button)
    }
}

/// A decoded mouse report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseEvent {
    Click(Mouse),
    Release(Mouse),
    Motion(Mouse),
    Wheel(Mouse),
}

impl MouseEvent {
    pub fn mouse(&self) -> &Mouse {
        match self {
            MouseEvent::Click(m)
            | MouseEvent::Release(m)
            | MouseEvent::Motion(m)
            | MouseEvent::Wheel(m) => m,
        }
    }
}

impl fmt::Display for MouseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseEvent::Motion(m) if m.button == MouseButton::None => write!(f, "{m}motion"),
            MouseEvent::Motion(m) => write!(f, "{m}+motion"),
            MouseEvent::Click(m) | MouseEvent::Release(m) | MouseEvent::Wheel(m) => {
                write!(f, "{m}")
            }
        }
    }
}

/// Split a button byte into button, modifiers and the motion flag.
/// The motion bit is ignored for wheel buttons.
fn decode_button(b: u32) -> (MouseButton, Modifiers, bool) {
    let low = (b & BUTTON_MASK) as usize;
    let button = if b & BIT_EXTENDED != 0 {
        MouseButton::EXTENDED[low]
    } else if b & BIT_WHEEL != 0 {
        MouseButton::WHEEL[low]
    } else {
        MouseButton::LOW[low]
    };

    let mods = Modifiers {
        shift: b & BIT_SHIFT != 0,
        ctrl: b & BIT_CTRL != 0,
        alt: b & BIT_ALT != 0,
    };
    let motion = b & BIT_MOTION != 0 && !button.is_wheel();

    (button, mods, motion)
}

/// Decode the three raw bytes following `CSI M`
pub fn decode_x10_mouse(report: [u8; 3]) -> MouseEvent {
    let [cb, cx, cy] = report;
    let b = if cb >= X10_OFFSET { cb - X10_OFFSET } else { cb };
    let (button, mods, motion) = decode_button(u32::from(b));

    let m = Mouse {
        x: i32::from(cx) - i32::from(X10_OFFSET) - 1,
        y: i32::from(cy) - i32::from(X10_OFFSET) - 1,
        button,
        mods,
    };

    if button.is_wheel() {
        MouseEvent::Wheel(m)
    } else if motion {
        MouseEvent::Motion(m)
    } else if button == MouseButton::None {
        MouseEvent::Release(m)
    } else {
        MouseEvent::Click(m)
    }
}

/// Decode a complete X10 report, `ESC [ M Cb Cx Cy` or `CSI M Cb Cx Cy`
pub fn decode_x10_report(buf: &[u8]) -> Option<MouseEvent> {
    let rest = match buf {
        [CSI, b'M', rest @ ..] => rest,
        [ESC, b'[', b'M', rest @ ..] => rest,
        _ => return None,
    };
    match rest {
        [cb, cx, cy, ..] => Some(decode_x10_mouse([*cb, *cx, *cy])),
        _ => None,
    }
}

/// Decode an SGR report from a CSI command and its parameters.
///
/// Returns `None` unless the command is `CSI < ... M` or `CSI < ... m`.
pub fn decode_sgr_mouse(cmd: Command, params: &[Parameter]) -> Option<MouseEvent> {
    if cmd.marker() != b'<' || cmd.intermediate() != 0 {
        return None;
    }
    let release = match cmd.final_byte() {
        b'M' => false,
        b'm' => true,
        _ => return None,
    };

    let param = |i: usize, default: u32| params.get(i).map_or(default, |p| p.value(default));
    let cb = param(0, 0);
    let (button, mods, motion) = if cb > 0xff {
        (MouseButton::Unknown, Modifiers::default(), false)
    } else {
        decode_button(cb)
    };

    let coord = |v: u32| i32::try_from(v).unwrap_or(i32::MAX) - 1;
    let m = Mouse {
        x: coord(param(1, 1)),
        y: coord(param(2, 1)),
        button,
        mods,
    };

    Some(if release {
        MouseEvent::Release(m)
    } else if button.is_wheel() {
        MouseEvent::Wheel(m)
    } else if motion {
        MouseEvent::Motion(m)
    } else {
        MouseEvent::Click(m)
    })
}

/// Whether `buf` starts with the `CSI M` introducer of an X10 report
pub fn has_x10_prefix(buf: &[u8]) -> bool {
    matches!(buf, [CSI, b'M', ..] | [ESC, b'[', b'M', ..])
}
