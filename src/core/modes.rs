//! Terminal mode flags
//!
//! ANSI modes (`CSI Pm h`) and DEC private modes (`CSI ? Pm h`) live in
//! separate tables keyed by mode number. A mode that was never set or reset
//! has no entry. Both tables iterate and serialize in mode-number order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Line feed/new line mode (LNM)
pub const MODE_LINEFEED_NEWLINE: u32 = 20;

/// Text cursor enable mode (DECTCEM)
pub const DEC_MODE_CURSOR_VISIBLE: u32 = 25;
/// Alternate screen buffer
pub const DEC_MODE_ALT_SCREEN: u32 = 1047;
/// Alternate screen buffer, cleared on entry
pub const DEC_MODE_ALT_SCREEN_CLEAR: u32 = 1049;

/// State of a single mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeSetting {
    Set,
    Reset,
}

impl ModeSetting {
    pub fn is_set(self) -> bool {
        self == ModeSetting::Set
    }
}

/// Terminal mode tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    ansi: BTreeMap<u32, ModeSetting>,
    dec: BTreeMap<u32, ModeSetting>,
}

impl Default for Modes {
    fn default() -> Self {
        let mut dec = BTreeMap::new();
        dec.insert(DEC_MODE_CURSOR_VISIBLE, ModeSetting::Set);
        Self {
            ansi: BTreeMap::new(),
            dec,
        }
    }
}

impl Modes {
    /// Create new default modes
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all modes to default values
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set an ANSI mode (CSI Ps h)
    pub fn set_ansi_mode(&mut self, mode: u32) {
        self.ansi.insert(mode, ModeSetting::Set);
    }

    /// Reset an ANSI mode (CSI Ps l)
    pub fn reset_ansi_mode(&mut self, mode: u32) {
        self.ansi.insert(mode, ModeSetting::Reset);
    }

    /// Set a DEC private mode (CSI ? Ps h)
    pub fn set_dec_mode(&mut self, mode: u32) {
        self.dec.insert(mode, ModeSetting::Set);
    }

    /// Reset a DEC private mode (CSI ? Ps l)
    pub fn reset_dec_mode(&mut self, mode: u32) {
        self.dec.insert(mode, ModeSetting::Reset);
    }

    /// Recorded state of an ANSI mode
    pub fn ansi(&self, mode: u32) -> Option<ModeSetting> {
        self.ansi.get(&mode).copied()
    }

    /// Recorded state of a DEC private mode
    pub fn dec(&self, mode: u32) -> Option<ModeSetting> {
        self.dec.get(&mode).copied()
    }

    pub fn is_dec_set(&self, mode: u32) -> bool {
        self.dec(mode).is_some_and(ModeSetting::is_set)
    }

    pub fn is_ansi_set(&self, mode: u32) -> bool {
        self.ansi(mode).is_some_and(ModeSetting::is_set)
    }
}
