//! Parser context
//!
//! Scratch storage the scanner fills in while it walks a sequence: the
//! packed command, the parameter slots and the string payload. Capacities
//! are fixed at construction and nothing is allocated afterwards; overflow
//! is dropped silently.

use super::params::{Command, Parameter};
use crate::app::Config;
use crate::input::{decode_sgr_mouse, MouseEvent};

/// Default number of parameter slots
pub const DEFAULT_MAX_PARAMS: usize = 32;
/// Default size of the string payload buffer
pub const DEFAULT_MAX_DATA: usize = 4096;

/// Collects the command, parameters and payload of the current sequence
#[derive(Debug, Clone)]
pub struct Parser {
    params: Vec<Parameter>,
    params_len: usize,
    cmd: Command,
    data: Vec<u8>,
    data_len: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PARAMS, DEFAULT_MAX_DATA)
    }
}

impl Parser {
    /// Create a context with room for `max_params` parameters and
    /// `max_data` payload bytes
    pub fn new(max_params: usize, max_data: usize) -> Self {
        Self {
            params: vec![Parameter::MISSING; max_params],
            params_len: 0,
            cmd: Command::default(),
            data: vec![0; max_data],
            data_len: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_params, config.max_data)
    }

    /// Forget everything collected so far
    pub fn reset(&mut self) {
        if let Some(first) = self.params.first_mut() {
            *first = Parameter::MISSING;
        }
        self.params_len = 0;
        self.cmd = Command::default();
        self.data_len = 0;
    }

    /// The packed command of the last sequence.
    ///
    /// For OSC strings this is the numeric OSC command, or
    /// [`Command::MISSING`] if the payload did not start with digits.
    pub fn command(&self) -> Command {
        self.cmd
    }

    /// Parameters of the last CSI or DCS sequence
    pub fn params(&self) -> &[Parameter] {
        &self.params[..self.params_len.min(self.params.len())]
    }

    /// Value of parameter `i`, or `default` if it is omitted or absent
    pub fn param(&self, i: usize, default: u32) -> u32 {
        self.params()
            .get(i)
            .map_or(default, |p| p.value(default))
    }

    /// Payload of the last OSC, DCS, APC, SOS or PM string
    pub fn data(&self) -> &[u8] {
        &self.data[..self.data_len]
    }

    /// Payload bytes kept per string sequence
    pub fn max_data(&self) -> usize {
        self.data.len()
    }

    /// The SGR mouse report held in the context, if the last sequence was one
    pub fn mouse_event(&self) -> Option<MouseEvent> {
        decode_sgr_mouse(self.cmd, self.params())
    }

    pub(crate) fn clear_token(&mut self) {
        self.data_len = 0;
        self.params_len = 0;
        self.cmd = Command::default();
    }

    pub(crate) fn begin_string(&mut self) {
        self.cmd = Command::MISSING;
        self.data_len = 0;
    }

    pub(crate) fn clear_data(&mut self) {
        self.data_len = 0;
    }

    pub(crate) fn set_marker(&mut self, byte: u8) {
        self.cmd.set_marker(byte);
    }

    pub(crate) fn set_intermediate(&mut self, byte: u8) {
        self.cmd.set_intermediate(byte);
    }

    pub(crate) fn set_final(&mut self, byte: u8) {
        self.cmd.set_final(byte);
    }

    pub(crate) fn push_digit(&mut self, digit: u8) {
        if let Some(slot) = self.params.get_mut(self.params_len) {
            slot.push_digit(digit);
        }
    }

    /// Move to the next parameter slot. `sub` marks the current slot as
    /// followed by a sub-parameter.
    pub(crate) fn next_param(&mut self, sub: bool) {
        if self.params_len >= self.params.len() {
            return;
        }
        if sub {
            self.params[self.params_len].set_has_more();
        }
        self.params_len += 1;
        if let Some(slot) = self.params.get_mut(self.params_len) {
            *slot = Parameter::MISSING;
        }
    }

    /// Count the slot being accumulated once the parameter list ends
    pub(crate) fn finish_params(&mut self) {
        let started = self.params_len > 0
            || self.params.first().is_some_and(|p| !p.is_missing());
        if started && self.params_len < self.params.len() {
            self.params_len += 1;
        }
    }

    pub(crate) fn push_data(&mut self, byte: u8) -> bool {
        if self.data_len >= self.data.len() {
            return false;
        }
        self.data[self.data_len] = byte;
        self.data_len += 1;
        true
    }

    /// Parse the OSC command number from the leading digits of the
    /// payload. Does nothing once a command is known.
    pub(crate) fn parse_osc_command(&mut self) {
        if !self.cmd.is_missing() {
            return;
        }
        let mut value: Option<u32> = None;
        for &d in self.data() {
            if !d.is_ascii_digit() {
                break;
            }
            let acc = value.unwrap_or(0);
            value = Some(
                acc.saturating_mul(10)
                    .saturating_add(u32::from(d - b'0'))
                    .min(super::params::MAX_PARAM),
            );
        }
        if let Some(value) = value {
            self.cmd = Command(value);
        }
    }
}
