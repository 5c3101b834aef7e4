//! Terminal Executor
//!
//! Ties together the sequence scanner and the screen model: printable
//! tokens are written to the active screen, control bytes move the cursor
//! and completed CSI and OSC sequences are dispatched on their packed
//! command.

use crate::app::Config;
use crate::core::{
    Buffer, Cell, Color, Modes, Rect, Screen, Snapshot, Underline, DEC_MODE_ALT_SCREEN,
    DEC_MODE_ALT_SCREEN_CLEAR, DEC_MODE_CURSOR_VISIBLE, MODE_LINEFEED_NEWLINE,
};
use crate::parser::ansi::{APC, BEL, CSI, DCS, ESC, OSC, PM, SOS, ST};
use crate::parser::grapheme::is_truncated;
use crate::parser::{decode_sequence, Parameter, Parser, State};

/// Terminal executor that interprets scanner output and updates the screens
#[derive(Debug)]
pub struct Terminal<B: Buffer = Screen> {
    /// Primary and alternate screens
    screens: [B; 2],
    /// Index of the active screen
    active: usize,
    modes: Modes,
    title: String,
    parser: Parser,
    state: State,
    /// Byte identifying the sequence being scanned: the byte after ESC, or
    /// the 7-bit form of a C1 introducer
    intro: Option<u8>,
    /// Truncated UTF-8 from the end of the last chunk
    carry: Vec<u8>,
}

impl Terminal<Screen> {
    /// Create a new terminal with the given dimensions
    pub fn new(cols: usize, rows: usize) -> Self {
        Self::with_buffers(Screen::new(cols, rows), Screen::new(cols, rows), Parser::default())
    }

    pub fn from_config(config: &Config) -> Self {
        let screen = || Screen::with_tab_width(config.cols, config.rows, config.tab_width);
        Self::with_buffers(screen(), screen(), Parser::from_config(config))
    }
}

impl<B: Buffer> Terminal<B> {
    /// Create a terminal over caller-provided primary and alternate screens
    pub fn with_buffers(primary: B, alternate: B, parser: Parser) -> Self {
        Self {
            screens: [primary, alternate],
            active: 0,
            modes: Modes::new(),
            title: String::new(),
            parser,
            state: State::Normal,
            intro: None,
            carry: Vec::new(),
        }
    }

    /// The active screen
    pub fn screen(&self) -> &B {
        &self.screens[self.active]
    }

    pub fn screen_mut(&mut self) -> &mut B {
        &mut self.screens[self.active]
    }

    pub fn primary(&self) -> &B {
        &self.screens[0]
    }

    pub fn alternate(&self) -> &B {
        &self.screens[1]
    }

    pub fn is_alternate_screen(&self) -> bool {
        self.active == 1
    }

    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    /// Window title set by OSC 0 or OSC 2
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Capture the active screen
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_buffer(
            self.screen(),
            &self.modes,
            &self.title,
            self.is_alternate_screen(),
        )
    }

    /// Process output bytes of the attached program.
    ///
    /// Chunks may be split anywhere; an unfinished sequence or character is
    /// completed by the next call.
    pub fn process(&mut self, data: &[u8]) {
        let mut buf = std::mem::take(&mut self.carry);
        buf.extend_from_slice(data);
        let mut rest = &buf[..];

        while !rest.is_empty() {
            let prev = self.state;
            let tok = decode_sequence(rest, prev, Some(&mut self.parser));
            let (seq, width) = (tok.seq, tok.width);
            self.state = tok.state;
            rest = &rest[tok.consumed..];

            match prev {
                State::Normal => self.intro = introducer(seq),
                State::Escape => self.intro = seq.first().copied(),
                State::StringEscape(_) if seq.first() != Some(&b'\\') => {
                    self.intro = seq.first().copied();
                }
                _ => {}
            }

            if !self.state.is_normal() {
                continue;
            }

            match self.intro.take() {
                Some(intro) => self.dispatch_sequence(intro, prev, seq),
                None if prev.is_normal() => {
                    if rest.is_empty() && is_truncated(seq) {
                        self.carry = seq.to_vec();
                        break;
                    }
                    self.print(seq, width);
                }
                None => {}
            }
        }
    }

    fn print(&mut self, seq: &[u8], width: usize) {
        let Some(&first) = seq.first() else {
            return;
        };
        if width > 0 {
            let grapheme = String::from_utf8_lossy(seq);
            self.screen_mut().put(&grapheme, width);
        } else if seq.len() == 1 {
            self.execute_control(first);
        } else {
            log::trace!("zero-width text ignored: {:?}", seq);
        }
    }

    /// Execute a C0 control character
    fn execute_control(&mut self, byte: u8) {
        let screen = &mut self.screens[self.active];
        match byte {
            0x08 => {
                // BS - Backspace
                let cursor = screen.cursor();
                let (col, row) = (cursor.col.saturating_sub(1), cursor.row);
                screen.move_cursor(col, row);
            }
            0x09 => {
                // HT - Horizontal Tab
                let cursor = screen.cursor();
                let (col, row) = (screen.next_tab_stop(cursor.col), cursor.row);
                screen.move_cursor(col, row);
            }
            0x0A | 0x0B | 0x0C => {
                // LF, VT, FF - Line Feed (VT and FF treated as LF)
                if self.modes.is_ansi_set(MODE_LINEFEED_NEWLINE) {
                    screen.cursor_mut().carriage_return();
                }
                screen.linefeed();
            }
            0x0D => {
                // CR - Carriage Return
                screen.cursor_mut().carriage_return();
            }
            _ => {
                log::trace!("control byte {:#04x} ignored", byte);
            }
        }
    }

    fn dispatch_sequence(&mut self, intro: u8, prev: State, seq: &[u8]) {
        let cmd = self.parser.command();
        match intro {
            b'[' => {
                if cmd.final_byte() != 0 {
                    self.handle_csi();
                }
            }
            b']' => {
                if is_string_terminated(prev, seq) {
                    self.handle_osc();
                }
            }
            b'P' | b'X' | b'^' | b'_' => {
                log::trace!("string sequence {:?} ignored", intro as char);
            }
            _ => {
                if cmd.final_byte() != 0 {
                    log::debug!("Unhandled ESC: {:?}", cmd);
                }
            }
        }
    }

    /// Execute a CSI sequence held in the parser context
    fn handle_csi(&mut self) {
        let cmd = self.parser.command();
        match (cmd.marker(), cmd.intermediate(), cmd.final_byte()) {
            (0, 0, b'A' | b'B' | b'C' | b'D' | b'E' | b'F' | b'G' | b'H' | b'I' | b'X')
            | (0, 0, b'd' | b'e' | b'f') => self.handle_cursor(cmd.final_byte()),
            (0, 0, b'J') => self.handle_screen(),
            (0, 0, b'K' | b'L' | b'M' | b'S' | b'T') => self.handle_line(cmd.final_byte()),
            (0, 0, b'm') => self.handle_sgr(),
            (0 | b'?', 0, b'h' | b'l') => self.handle_mode(),
            _ => {
                log::debug!(
                    "Unhandled CSI: params={:?} command={:?}",
                    self.parser.params(),
                    cmd
                );
            }
        }
    }

    /// Cursor motion, tabulation and character erase.
    ///
    /// The count defaults to 1 only when omitted; an explicit 0 moves nothing.
    fn handle_cursor(&mut self, final_byte: u8) {
        let n = self.parser.param(0, 1) as usize;
        let blank = Cell::blank(self.screen().cursor().pen.bg);
        let screen = &mut self.screens[self.active];
        let (width, height) = (screen.width(), screen.height());
        let (mut x, mut y) = (screen.cursor().col, screen.cursor().row);

        match final_byte {
            // CUU - Cursor Up
            b'A' => y = y.saturating_sub(n),
            // CUD - Cursor Down, VPR - Vertical Position Relative
            b'B' | b'e' => y = y.saturating_add(n),
            // CUF - Cursor Forward
            b'C' => x = x.saturating_add(n),
            // CUB - Cursor Backward
            b'D' => x = x.saturating_sub(n),
            b'E' => {
                // CNL - Cursor Next Line
                y = y.saturating_add(n);
                x = 0;
            }
            b'F' => {
                // CPL - Cursor Previous Line
                y = y.saturating_sub(n);
                x = 0;
            }
            // CHA - Cursor Character Absolute
            b'G' => x = n.saturating_sub(1),
            b'H' | b'f' => {
                // CUP - Cursor Position, HVP; origin unless both are given
                if self.parser.params().len() >= 2 {
                    y = (self.parser.param(0, 1) as usize).saturating_sub(1);
                    x = (self.parser.param(1, 1) as usize).saturating_sub(1);
                } else {
                    (x, y) = (0, 0);
                }
            }
            b'I' => {
                // CHT - Cursor Forward Tabulation
                for _ in 0..n.min(width) {
                    x = screen.next_tab_stop(x);
                }
            }
            b'X' => {
                // ECH - Erase Character
                screen.fill(&blank, Rect::new(x, y, n, 1));
                x = x.saturating_add(n);
            }
            // VPA - Vertical Line Position Absolute
            b'd' => y = n.saturating_sub(1),
            _ => return,
        }

        screen.move_cursor(x.min(width.saturating_sub(1)), y.min(height.saturating_sub(1)));
    }

    /// ED - Erase in Display
    fn handle_screen(&mut self) {
        let screen = &mut self.screens[self.active];
        let (w, h) = (screen.width(), screen.height());
        let y = screen.cursor().row;
        match self.parser.param(0, 0) {
            // Erase below, including the cursor row
            0 => screen.clear(Some(Rect::new(0, y, w, h - y))),
            // Erase above, including the cursor row
            1 => screen.clear(Some(Rect::new(0, 0, w, y + 1))),
            2 | 3 => screen.clear(Some(Rect::new(0, 0, w, h))),
            mode => log::debug!("Unhandled ED mode: {}", mode),
        }
    }

    /// EL - Erase in Line, and the line operations that are not supported
    fn handle_line(&mut self, final_byte: u8) {
        if final_byte != b'K' {
            log::debug!(
                "Line operation {:?} not supported: params={:?}",
                final_byte as char,
                self.parser.params()
            );
            return;
        }

        let screen = &mut self.screens[self.active];
        let blank = Cell::blank(screen.cursor().pen.bg);
        let w = screen.width();
        let (x, y) = (screen.cursor().col, screen.cursor().row);
        match self.parser.param(0, 0) {
            0 => screen.fill(&blank, Rect::new(x, y, w.saturating_sub(x), 1)),
            1 => screen.fill(&blank, Rect::new(0, y, x + 1, 1)),
            2 => screen.fill(&blank, Rect::new(0, y, w, 1)),
            mode => log::debug!("Unhandled EL mode: {}", mode),
        }
    }

    /// SGR - Select Graphic Rendition
    fn handle_sgr(&mut self) {
        let params = self.parser.params();
        let pen = &mut self.screens[self.active].cursor_mut().pen;
        if params.is_empty() {
            pen.reset();
            return;
        }

        let mut i = 0;
        while i < params.len() {
            let param = params[i];
            match param.value(0) {
                0 => pen.reset(),
                1 => pen.bold = true,
                2 => pen.faint = true,
                3 => pen.italic = true,
                4 => {
                    if param.has_more() && i + 1 < params.len() {
                        i += 1;
                        match Underline::from_param(params[i].value(0)) {
                            Some(style) => pen.underline = style,
                            None => log::debug!("Unknown underline style: {:?}", params[i]),
                        }
                    } else {
                        pen.underline = Underline::Single;
                    }
                }
                5 => pen.slow_blink = true,
                6 => pen.rapid_blink = true,
                7 => pen.reverse = true,
                8 => pen.conceal = true,
                9 => pen.strikethrough = true,
                22 => {
                    pen.bold = false;
                    pen.faint = false;
                }
                23 => pen.italic = false,
                24 => pen.underline = Underline::None,
                25 => {
                    pen.slow_blink = false;
                    pen.rapid_blink = false;
                }
                27 => pen.reverse = false,
                28 => pen.conceal = false,
                29 => pen.strikethrough = false,
                n @ 30..=37 => pen.fg = Color::Basic((n - 30) as u8),
                38 => {
                    if let Some(color) = read_color(&mut i, params) {
                        pen.fg = color;
                    }
                }
                39 => pen.fg = Color::Default,
                n @ 40..=47 => pen.bg = Color::Basic((n - 40) as u8),
                48 => {
                    if let Some(color) = read_color(&mut i, params) {
                        pen.bg = color;
                    }
                }
                49 => pen.bg = Color::Default,
                58 => {
                    if let Some(color) = read_color(&mut i, params) {
                        pen.underline_color = color;
                    }
                }
                59 => pen.underline_color = Color::Default,
                n @ 90..=97 => pen.fg = Color::Basic((n - 90 + 8) as u8),
                n @ 100..=107 => pen.bg = Color::Basic((n - 100 + 8) as u8),
                n => log::debug!("Unhandled SGR: {}", n),
            }
            i += 1;
        }
    }

    /// SM/RM and DECSET/DECRST; only the first parameter is applied
    fn handle_mode(&mut self) {
        let Some(first) = self.parser.params().first() else {
            return;
        };
        let mode = first.value(0);
        let cmd = self.parser.command();
        let set = cmd.final_byte() == b'h';

        if cmd.marker() != b'?' {
            if set {
                self.modes.set_ansi_mode(mode);
            } else {
                self.modes.reset_ansi_mode(mode);
            }
            if mode != MODE_LINEFEED_NEWLINE {
                log::debug!("ANSI mode {} recorded but not interpreted", mode);
            }
            return;
        }

        if set {
            self.modes.set_dec_mode(mode);
        } else {
            self.modes.reset_dec_mode(mode);
        }

        match mode {
            DEC_MODE_CURSOR_VISIBLE => self.screen_mut().cursor_mut().visible = set,
            DEC_MODE_ALT_SCREEN | DEC_MODE_ALT_SCREEN_CLEAR => {
                if set {
                    self.switch_screen(1);
                    if mode == DEC_MODE_ALT_SCREEN_CLEAR {
                        self.screen_mut().clear(None);
                    }
                } else {
                    self.switch_screen(0);
                }
            }
            _ => log::debug!("DEC mode {} recorded but not interpreted", mode),
        }
    }

    /// Make screen `index` active; the pen and cursor visibility follow
    fn switch_screen(&mut self, index: usize) {
        if self.active == index {
            return;
        }
        let from = self.screens[self.active].cursor().clone();
        let to = self.screens[index].cursor_mut();
        to.pen = from.pen;
        to.visible = from.visible;
        self.active = index;
        log::debug!(
            "Switched to {} screen",
            if index == 1 { "alternate" } else { "primary" }
        );
    }

    /// Execute an OSC string held in the parser context
    fn handle_osc(&mut self) {
        let payload = self.parser.data();
        match self.parser.command().osc_number() {
            Some(0 | 2) => {
                if let Some(pos) = payload.iter().position(|&b| b == b';') {
                    self.title = String::from_utf8_lossy(&payload[pos + 1..]).into_owned();
                }
            }
            cmd => log::debug!("Unhandled OSC {:?}: {} bytes", cmd, payload.len()),
        }
    }
}

/// Identify the sequence a token starting in the normal state begins
fn introducer(seq: &[u8]) -> Option<u8> {
    match *seq.first()? {
        ESC => seq.get(1).copied(),
        CSI => Some(b'['),
        DCS => Some(b'P'),
        OSC => Some(b']'),
        SOS => Some(b'X'),
        PM => Some(b'^'),
        APC => Some(b'_'),
        _ => None,
    }
}

/// Whether a string token ended on its terminator rather than being cut
/// short
fn is_string_terminated(prev: State, seq: &[u8]) -> bool {
    match seq {
        [.., BEL | ST] | [.., ESC, b'\\'] => true,
        [b'\\'] => matches!(prev, State::StringEscape(_)),
        _ => false,
    }
}

/// Read an extended colour (`5;n` or `2;r;g;b`) following the SGR
/// parameter at `*i`, advancing `*i` past it. Malformed groups consume
/// nothing.
fn read_color(i: &mut usize, params: &[Parameter]) -> Option<Color> {
    let at = |k: usize| params.get(*i + k).map(|p| p.value(0));
    let channel = |v: u32| v.min(255) as u8;

    match at(1)? {
        2 => {
            let (r, g, b) = (at(2)?, at(3)?, at(4)?);
            *i += 4;
            Some(Color::Rgb(channel(r), channel(g), channel(b)))
        }
        5 => {
            let index = at(2)?;
            *i += 2;
            Some(Color::Extended(channel(index)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ModeSetting, Pen};

    fn text(term: &Terminal) -> String {
        term.snapshot().to_text()
    }

    fn cursor(term: &Terminal) -> (usize, usize) {
        (term.screen().cursor().col, term.screen().cursor().row)
    }

    #[test]
    fn test_terminal_print() {
        let mut term = Terminal::new(80, 24);
        term.process(b"Hello, World!");

        assert_eq!(text(&term), "Hello, World!\n");
        assert_eq!(cursor(&term), (13, 0));
    }

    #[test]
    fn test_terminal_newline() {
        let mut term = Terminal::new(20, 5);
        term.process(b"Line 1\r\nLine 2");

        assert_eq!(text(&term), "Line 1\nLine 2\n");
        assert_eq!(cursor(&term), (6, 1));
    }

    #[test]
    fn test_terminal_linefeed_newline_mode() {
        let mut term = Terminal::new(20, 5);
        term.process(b"\x1b[20hab\ncd");

        assert_eq!(text(&term), "ab\ncd\n");
        assert_eq!(term.modes().ansi(20), Some(ModeSetting::Set));
    }

    #[test]
    fn test_terminal_backspace_and_tab() {
        let mut term = Terminal::new(20, 2);
        term.process(b"ab\x08c\tx");

        assert_eq!(text(&term), "ac      x\n");
        assert_eq!(cursor(&term), (9, 0));

        term.process(b"\r\x08");
        assert_eq!(cursor(&term), (0, 0));
    }

    #[test]
    fn test_terminal_cursor_movement() {
        let mut term = Terminal::new(80, 24);

        term.process(b"\x1b[10;5HX");
        assert_eq!(cursor(&term), (5, 9));

        term.process(b"\x1b[2A");
        assert_eq!(cursor(&term), (5, 7));
        term.process(b"\x1b[3B");
        assert_eq!(cursor(&term), (5, 10));
        term.process(b"\x1b[4C");
        assert_eq!(cursor(&term), (9, 10));
        term.process(b"\x1b[2D");
        assert_eq!(cursor(&term), (7, 10));
        term.process(b"\x1b[2E");
        assert_eq!(cursor(&term), (0, 12));
        term.process(b"\x1b[5G\x1b[F");
        assert_eq!(cursor(&term), (0, 11));
        term.process(b"\x1b[3d");
        assert_eq!(cursor(&term), (0, 2));
        term.process(b"\x1b[2e");
        assert_eq!(cursor(&term), (0, 4));
    }

    #[test]
    fn test_terminal_cursor_zero_count_moves_nothing() {
        let mut term = Terminal::new(80, 24);
        term.process(b"\x1b[5;5H\x1b[0A");
        assert_eq!(cursor(&term), (4, 4));
        term.process(b"\x1b[0C\x1b[0E");
        assert_eq!(cursor(&term), (0, 4));
        term.process(b"\x1b[0G\x1b[0d");
        assert_eq!(cursor(&term), (0, 0));

        // Omitted count still means 1
        term.process(b"\x1b[B\x1b[C");
        assert_eq!(cursor(&term), (1, 1));
    }

    #[test]
    fn test_terminal_cursor_position_defaults() {
        let mut term = Terminal::new(80, 24);

        term.process(b"\x1b[5;5H\x1b[H");
        assert_eq!(cursor(&term), (0, 0));

        term.process(b"\x1b[;7H");
        assert_eq!(cursor(&term), (6, 0));

        // A lone row is not a position
        term.process(b"\x1b[5;5H\x1b[3H");
        assert_eq!(cursor(&term), (0, 0));

        term.process(b"\x1b[0;0H");
        assert_eq!(cursor(&term), (0, 0));

        term.process(b"\x1b[4;2f");
        assert_eq!(cursor(&term), (1, 3));
    }

    #[test]
    fn test_terminal_cursor_clamped() {
        let mut term = Terminal::new(10, 5);

        term.process(b"\x1b[100;100H");
        assert_eq!(cursor(&term), (9, 4));

        term.process(b"\x1b[50A\x1b[50D");
        assert_eq!(cursor(&term), (0, 0));

        term.process(b"\x1b[99999999999B\x1b[99999999999C");
        assert_eq!(cursor(&term), (9, 4));
    }

    #[test]
    fn test_terminal_tabulation() {
        let mut term = Terminal::new(30, 2);
        term.process(b"\x1b[2I");
        assert_eq!(cursor(&term), (16, 0));
        term.process(b"\x1b[9I");
        assert_eq!(cursor(&term), (29, 0));
    }

    #[test]
    fn test_terminal_erase_characters() {
        let mut term = Terminal::new(10, 2);
        term.process(b"abcdefgh\x1b[1;3H\x1b[44m\x1b[3X");

        assert_eq!(text(&term), "ab   fgh\n");
        assert_eq!(cursor(&term), (5, 0));
        let erased = term.screen().cell(2, 0).cloned().unwrap_or_default();
        assert_eq!(erased, Cell::blank(Color::BLUE));
    }

    #[test]
    fn test_terminal_erase_line() {
        let mut term = Terminal::new(10, 3);

        term.process(b"XXXXXXXXXX");
        term.process(b"\x1b[1;5H\x1b[K");
        assert_eq!(text(&term), "XXXX\n");
        assert_eq!(cursor(&term), (4, 0));

        term.process(b"\x1b[1;1HXXXXXXXXXX\x1b[1;5H\x1b[1K");
        assert_eq!(text(&term), "     XXXXX\n");

        term.process(b"\x1b[2K");
        assert_eq!(text(&term), "\n");
    }

    #[test]
    fn test_terminal_erase_line_keeps_background_only() {
        let mut term = Terminal::new(4, 1);
        term.process(b"\x1b[1;31;42m\x1b[2K");

        let cell = term.screen().cell(3, 0).cloned().unwrap_or_default();
        assert_eq!(cell.pen.bg, Color::GREEN);
        assert_eq!(cell.pen.fg, Color::Default);
        assert!(!cell.pen.bold);
    }

    #[test]
    fn test_terminal_erase_display() {
        let mut term = Terminal::new(5, 3);
        term.process(b"aaaaabbbbbccc");
        term.process(b"\x1b[2;2H\x1b[J");
        assert_eq!(text(&term), "aaaaa\n");

        term.process(b"\x1b[1;1Haaaaabbbbbccc\x1b[2;2H\x1b[1J");
        assert_eq!(text(&term), "\n\nccc\n");

        term.process(b"\x1b[2J");
        assert_eq!(text(&term), "\n");
    }

    #[test]
    fn test_terminal_line_operations_are_ignored() {
        let mut term = Terminal::new(10, 3);
        term.process(b"one\r\ntwo\x1b[L\x1b[M\x1b[S\x1b[T");

        assert_eq!(text(&term), "one\ntwo\n");
        assert_eq!(cursor(&term), (3, 1));
    }

    #[test]
    fn test_terminal_colors() {
        let mut term = Terminal::new(80, 24);
        term.process(b"\x1b[31;44mColored");

        let pen = term.screen().cursor().pen;
        assert_eq!(pen.fg, Color::RED);
        assert_eq!(pen.bg, Color::BLUE);
        assert_eq!(term.screen().cell(0, 0).map(|c| c.pen.fg), Some(Color::RED));
    }

    #[test]
    fn test_terminal_bright_colors() {
        let mut term = Terminal::new(80, 24);
        term.process(b"\x1b[91;107m");

        let pen = term.screen().cursor().pen;
        assert_eq!(pen.fg, Color::BRIGHT_RED);
        assert_eq!(pen.bg, Color::BRIGHT_WHITE);
    }

    #[test]
    fn test_terminal_sgr_reset() {
        let mut term = Terminal::new(80, 24);

        term.process(b"\x1b[1;3;4;5;7;9;31mBold Red\x1b[0m");
        assert_eq!(term.screen().cursor().pen, Pen::default());

        term.process(b"\x1b[1;31m\x1b[m");
        assert_eq!(term.screen().cursor().pen, Pen::default());
    }

    #[test]
    fn test_terminal_sgr_attributes_and_clears() {
        let mut term = Terminal::new(80, 24);
        term.process(b"\x1b[1;2;3;4;5;6;7;8;9m");

        let pen = term.screen().cursor().pen;
        assert!(pen.bold && pen.faint && pen.italic);
        assert_eq!(pen.underline, Underline::Single);
        assert!(pen.slow_blink && pen.rapid_blink);
        assert!(pen.reverse && pen.conceal && pen.strikethrough);

        term.process(b"\x1b[22;23;24;25;27;28;29m");
        assert_eq!(term.screen().cursor().pen, Pen::default());
    }

    #[test]
    fn test_terminal_underline_styles() {
        let mut term = Terminal::new(80, 24);

        term.process(b"\x1b[4:3m");
        assert_eq!(term.screen().cursor().pen.underline, Underline::Curly);

        // The sub-parameter is consumed, so 1 is not read as bold
        term.process(b"\x1b[4:1m");
        assert_eq!(term.screen().cursor().pen.underline, Underline::Single);
        assert!(!term.screen().cursor().pen.bold);

        term.process(b"\x1b[4:0m");
        assert_eq!(term.screen().cursor().pen.underline, Underline::None);
    }

    #[test]
    fn test_terminal_extended_colors() {
        let mut term = Terminal::new(80, 24);

        term.process(b"\x1b[38;2;255;128;64m");
        assert_eq!(term.screen().cursor().pen.fg, Color::Rgb(255, 128, 64));

        term.process(b"\x1b[48;5;200m");
        assert_eq!(term.screen().cursor().pen.bg, Color::Extended(200));

        term.process(b"\x1b[58:2:1:2:3m");
        assert_eq!(
            term.screen().cursor().pen.underline_color,
            Color::Rgb(1, 2, 3)
        );

        term.process(b"\x1b[38;2;999;0;0m");
        assert_eq!(term.screen().cursor().pen.fg, Color::Rgb(255, 0, 0));

        term.process(b"\x1b[39;49;59m");
        assert_eq!(term.screen().cursor().pen, Pen::default());
    }

    #[test]
    fn test_terminal_malformed_color_consumes_nothing() {
        let mut term = Terminal::new(80, 24);

        // Unknown colour space: 38 is skipped and 1 still applies
        term.process(b"\x1b[38;1m");
        assert_eq!(term.screen().cursor().pen.fg, Color::Default);
        assert!(term.screen().cursor().pen.bold);

        // Truncated RGB group
        term.process(b"\x1b[0;48;2;10;20m");
        assert_eq!(term.screen().cursor().pen.bg, Color::Default);
    }

    #[test]
    fn test_terminal_cursor_visibility() {
        let mut term = Terminal::new(80, 24);

        term.process(b"\x1b[?25l");
        assert!(!term.screen().cursor().visible);
        assert_eq!(term.modes().dec(25), Some(ModeSetting::Reset));

        term.process(b"\x1b[?25h");
        assert!(term.screen().cursor().visible);
    }

    #[test]
    fn test_terminal_mode_first_parameter_only() {
        let mut term = Terminal::new(80, 24);
        term.process(b"\x1b[?2004;25l");

        assert_eq!(term.modes().dec(2004), Some(ModeSetting::Reset));
        assert!(term.modes().is_dec_set(25));
        assert!(term.screen().cursor().visible);
    }

    #[test]
    fn test_terminal_mode_tables_are_separate() {
        let mut term = Terminal::new(80, 24);
        term.process(b"\x1b[4h\x1b[?4l");

        assert_eq!(term.modes().ansi(4), Some(ModeSetting::Set));
        assert_eq!(term.modes().dec(4), Some(ModeSetting::Reset));
    }

    #[test]
    fn test_terminal_alternate_screen() {
        let mut term = Terminal::new(80, 24);

        term.process(b"Primary");
        term.process(b"\x1b[?1049h");
        assert!(term.is_alternate_screen());
        assert_eq!(text(&term), "\n");

        term.process(b"Alternate");
        assert_eq!(text(&term), "Alternate\n");

        term.process(b"\x1b[?1049l");
        assert!(!term.is_alternate_screen());
        assert_eq!(text(&term), "Primary\n");
    }

    #[test]
    fn test_terminal_alternate_screen_1047_keeps_contents() {
        let mut term = Terminal::new(20, 2);

        term.process(b"\x1b[?1047hold");
        term.process(b"\x1b[?1047l");
        assert!(!term.is_alternate_screen());

        term.process(b"\x1b[?1047h");
        assert_eq!(text(&term), "old\n");

        // 1049 clears on entry
        term.process(b"\x1b[?1047l\x1b[?1049h");
        assert_eq!(text(&term), "\n");
    }

    #[test]
    fn test_terminal_screen_switch_carries_pen() {
        let mut term = Terminal::new(20, 2);

        term.process(b"\x1b[31m\x1b[?25l\x1b[?1047h");
        assert_eq!(term.screen().cursor().pen.fg, Color::RED);
        assert!(!term.screen().cursor().visible);

        term.process(b"\x1b[32m\x1b[?1047l");
        assert_eq!(term.screen().cursor().pen.fg, Color::GREEN);
    }

    #[test]
    fn test_terminal_title() {
        let mut term = Terminal::new(80, 24);

        term.process(b"\x1b]0;My Terminal Title\x07");
        assert_eq!(term.title(), "My Terminal Title");

        term.process(b"\x1b]2;Other\x1b\\");
        assert_eq!(term.title(), "Other");

        term.process(b"\x9d2;Eight bit\x9c");
        assert_eq!(term.title(), "Eight bit");
    }

    #[test]
    fn test_terminal_title_cancelled() {
        let mut term = Terminal::new(80, 24);
        term.process(b"\x1b]2;first\x07");
        term.process(b"\x1b]2;second\x18");

        assert_eq!(term.title(), "first");
        assert_eq!(text(&term), "\n");
    }

    #[test]
    fn test_terminal_unhandled_osc_ignored() {
        let mut term = Terminal::new(80, 24);
        term.process(b"\x1b]52;c;aGVsbG8=\x07ok");

        assert_eq!(term.title(), "");
        assert_eq!(text(&term), "ok\n");
    }

    #[test]
    fn test_terminal_split_sequences() {
        let mut term = Terminal::new(80, 24);

        term.process(b"\x1b");
        term.process(b"[3");
        term.process(b"1mA");
        assert_eq!(term.screen().cursor().pen.fg, Color::RED);

        term.process(b"\x1b]2;spl");
        term.process(b"it\x1b");
        term.process(b"\\B");
        assert_eq!(term.title(), "split");
        assert_eq!(text(&term), "AB\n");
    }

    #[test]
    fn test_terminal_split_utf8() {
        let mut term = Terminal::new(80, 24);
        let bytes = "a世b".as_bytes();

        term.process(&bytes[..2]);
        term.process(&bytes[2..3]);
        term.process(&bytes[3..]);

        assert_eq!(text(&term), "a世b\n");
        assert_eq!(cursor(&term), (4, 0));
    }

    #[test]
    fn test_terminal_aborted_sequence() {
        let mut term = Terminal::new(80, 24);

        // The invalid byte is not consumed by the sequence
        term.process(b"\x1b[31\x07x");
        assert_eq!(term.screen().cursor().pen.fg, Color::Default);
        assert_eq!(text(&term), "x\n");
    }

    #[test]
    fn test_terminal_dcs_is_ignored() {
        let mut term = Terminal::new(80, 24);
        term.process(b"\x1bP1$r0m\x1b\\ok");

        assert_eq!(text(&term), "ok\n");
        assert_eq!(term.screen().cursor().pen, Pen::default());
    }

    #[test]
    fn test_terminal_wide_text() {
        let mut term = Terminal::new(80, 24);
        term.process("世界!".as_bytes());

        assert_eq!(text(&term), "世界!\n");
        assert_eq!(cursor(&term), (5, 0));
    }

    #[test]
    fn test_terminal_from_config() {
        let config = Config {
            cols: 12,
            rows: 3,
            tab_width: 4,
            ..Config::default()
        };
        let mut term = Terminal::from_config(&config);
        term.process(b"\t");

        assert_eq!(term.screen().width(), 12);
        assert_eq!(term.screen().height(), 3);
        assert_eq!(cursor(&term), (4, 0));
    }

    #[test]
    fn test_terminal_snapshot_is_deterministic() {
        let input = b"\x1b[1;32mhello\x1b[0m\r\n\x1b]2;t\x07world";
        let mut a = Terminal::new(20, 4);
        let mut b = Terminal::new(20, 4);
        a.process(input);
        for byte in input {
            b.process(std::slice::from_ref(byte));
        }

        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.snapshot().title, "t");
    }
}
