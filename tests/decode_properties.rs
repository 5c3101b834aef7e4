//! Property tests for the sequence scanner, the input decoder and the
//! terminal interpreter

use std::time::{Duration, Instant};

use proptest::prelude::*;

use vtscan::core::Buffer;
use vtscan::input::{decode_x10_mouse, EventDecoder};
use vtscan::parser::{decode_sequence, Command, Parameter, Parser, State, PARAM_MASK};
use vtscan::Terminal;

/// Bytes that exercise every scanner state
const ALPHABET: &[u8] = b"\x1b\x07\x18\x9b\x9c\x9d[]P_X^\\;:?<0123456789mMHJKhlAz $\r\n";

fn stream() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(ALPHABET), 0..64)
}

/// Feed `chunks` through a fresh scanner, collecting completed tokens
fn tokens(chunks: &[&[u8]]) -> (Vec<Vec<u8>>, State) {
    let mut parser = Parser::default();
    let mut state = State::Normal;
    let mut pending = Vec::new();
    let mut out = Vec::new();

    for chunk in chunks {
        let mut rest = *chunk;
        while !rest.is_empty() {
            let prev = state;
            let tok = decode_sequence(rest, state, Some(&mut parser));
            state = tok.state;
            rest = &rest[tok.consumed..];

            if matches!(prev, State::StringEscape(_)) && tok.seq.first() != Some(&b'\\') {
                // The held ESC began a new sequence
                let esc = pending.pop();
                if !pending.is_empty() {
                    out.push(std::mem::take(&mut pending));
                }
                pending.extend(esc);
            }

            pending.extend_from_slice(tok.seq);
            if state.is_normal() && !pending.is_empty() {
                out.push(std::mem::take(&mut pending));
            }
        }
    }

    (out, state)
}

/// Best-of-three time to scan `input` token by token
fn scan_time(input: &[u8]) -> Duration {
    (0..3)
        .map(|_| {
            let start = Instant::now();
            let mut parser = Parser::default();
            let mut state = State::Normal;
            let mut rest = input;
            while !rest.is_empty() {
                let tok = decode_sequence(rest, state, Some(&mut parser));
                state = tok.state;
                rest = &rest[tok.consumed..];
            }
            start.elapsed()
        })
        .min()
        .unwrap_or_default()
}

#[test]
fn scan_cost_linear_in_wide_text() {
    let small = "世界".repeat(10_000);
    let large = "世界".repeat(40_000);

    let t_small = scan_time(small.as_bytes());
    let t_large = scan_time(large.as_bytes());

    // Four times the input; quadratic scanning would take about sixteen times as long
    assert!(
        t_large < (t_small * 10).max(Duration::from_millis(50)),
        "small {t_small:?}, large {t_large:?}"
    );
}

proptest! {
    /// Splitting the input anywhere yields the same tokens
    #[test]
    fn scanner_resumes_at_any_split(input in stream(), split in any::<prop::sample::Index>()) {
        let at = split.index(input.len() + 1);
        let whole = tokens(&[&input[..]]);
        let parts = tokens(&[&input[..at], &input[at..]]);
        prop_assert_eq!(whole, parts);
    }

    /// Byte-at-a-time decoding matches whole-buffer decoding
    #[test]
    fn scanner_resumes_byte_by_byte(input in stream()) {
        let whole = tokens(&[&input[..]]);
        let bytes: Vec<&[u8]> = input.chunks(1).collect();
        prop_assert_eq!(whole, tokens(&bytes));
    }

    /// Tokens are prefixes of the input and account for every byte
    #[test]
    fn scanner_tokens_cover_input(input in stream()) {
        let (toks, state) = tokens(&[&input[..]]);
        let joined: Vec<u8> = toks.concat();
        prop_assert!(input.starts_with(&joined));
        if state.is_normal() {
            prop_assert_eq!(joined.len(), input.len());
        }
    }

    /// A byte that cannot continue a CSI parameter list is left in the input
    #[test]
    fn abort_does_not_consume(
        params in "[0-9;:]{1,12}",
        bad in prop_oneof![0u8..0x20, 0x3Cu8..0x40, 0x7Fu8..=0xFF],
    ) {
        let mut input = b"\x1b[".to_vec();
        input.extend_from_slice(params.as_bytes());
        let prefix_len = input.len();
        input.push(bad);
        input.push(b'x');

        let mut parser = Parser::default();
        let tok = decode_sequence(&input[..], State::Normal, Some(&mut parser));
        prop_assert_eq!(tok.consumed, prefix_len);
        prop_assert_eq!(tok.state, State::Normal);
        prop_assert_eq!(parser.command().final_byte(), 0);
        prop_assert_eq!(input[tok.consumed], bad);
    }

    /// Digit runs saturate instead of overflowing into the flag bit
    #[test]
    fn parameters_never_set_flag_by_overflow(digits in "[0-9]{1,40}") {
        let input = format!("\x1b[{digits}m");
        let mut parser = Parser::default();
        decode_sequence(input.as_bytes(), State::Normal, Some(&mut parser));

        let param = parser.params()[0];
        prop_assert!(!param.has_more());
        prop_assert!(!param.is_missing());
    }

    #[test]
    fn command_packing(marker in any::<u32>(), inter in any::<u32>(), fin in any::<u32>()) {
        let cmd = Command::new(marker, inter, fin);
        prop_assert_eq!(cmd.marker(), marker as u8);
        prop_assert_eq!(cmd.intermediate(), inter as u8);
        prop_assert_eq!(cmd.final_byte(), fin as u8);
    }

    #[test]
    fn parameter_packing(value in 0u32..PARAM_MASK, has_more in any::<bool>()) {
        let param = Parameter::new(value, has_more);
        prop_assert_eq!(param.value(7), value);
        prop_assert_eq!(param.has_more(), has_more);
    }

    /// X10 coordinates are the raw byte minus 33, wrapping below zero
    #[test]
    fn x10_coordinates(cb in 32u8..36, cx in any::<u8>(), cy in any::<u8>()) {
        let event = decode_x10_mouse([cb, cx, cy]);
        prop_assert_eq!(event.mouse().x, i32::from(cx) - 33);
        prop_assert_eq!(event.mouse().y, i32::from(cy) - 33);
    }

    /// Chunking never changes the decoded input events
    #[test]
    fn decoder_events_independent_of_chunking(input in stream(), split in any::<prop::sample::Index>()) {
        let at = split.index(input.len() + 1);

        let mut whole = EventDecoder::new();
        let expected = whole.feed(&input);

        let mut parts = EventDecoder::new();
        let mut events = parts.feed(&input[..at]);
        events.extend(parts.feed(&input[at..]));

        prop_assert_eq!(events, expected);
        prop_assert_eq!(parts.is_idle(), whole.is_idle());
    }

    /// The cursor stays on screen whatever the program writes
    #[test]
    fn terminal_cursor_in_bounds(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut term = Terminal::new(20, 6);
        term.process(&input);

        let cursor = term.screen().cursor();
        prop_assert!(cursor.col < 20, "col {}", cursor.col);
        prop_assert!(cursor.row < 6, "row {}", cursor.row);
    }

    /// Cursor positioning clamps into the screen
    #[test]
    fn terminal_cup_in_bounds(row in 0u32..500, col in 0u32..500) {
        let mut term = Terminal::new(80, 24);
        term.process(format!("\x1b[{row};{col}H").as_bytes());

        let cursor = term.screen().cursor();
        prop_assert_eq!(cursor.row, (row as usize).saturating_sub(1).min(23));
        prop_assert_eq!(cursor.col, (col as usize).saturating_sub(1).min(79));
    }

    /// A position needs both row and column; anything less homes the cursor
    #[test]
    fn terminal_cup_single_param_homes(row in 0u32..500, start in 1u32..24) {
        let mut term = Terminal::new(80, 24);
        term.process(format!("\x1b[{start};{start}H\x1b[{row}H").as_bytes());

        let cursor = term.screen().cursor();
        prop_assert_eq!((cursor.col, cursor.row), (0, 0));
    }

    /// Terminal state does not depend on how output is chunked
    #[test]
    fn terminal_independent_of_chunking(input in stream(), split in any::<prop::sample::Index>()) {
        let at = split.index(input.len() + 1);

        let mut whole = Terminal::new(20, 6);
        whole.process(&input);

        let mut parts = Terminal::new(20, 6);
        parts.process(&input[..at]);
        parts.process(&input[at..]);

        prop_assert_eq!(whole.snapshot(), parts.snapshot());
    }
}
