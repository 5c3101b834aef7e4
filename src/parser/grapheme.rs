//! Grapheme segmentation for printable tokens
//!
//! The scanner emits whole grapheme clusters (so a base character and its
//! combining marks, or an emoji ZWJ sequence, are one token) together with
//! the number of terminal cells they occupy.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Variation selector 16, requests emoji presentation
const VS16: char = '\u{FE0F}';

/// Bytes examined for the first cluster before widening the window
const INITIAL_WINDOW: usize = 32;

/// Length in bytes and cell width of the first grapheme cluster in `bytes`.
///
/// Malformed UTF-8 yields the malformed prefix with width 0. A sequence cut
/// off at the end of the buffer yields the remaining bytes with width 0.
/// Returns `(0, 0)` only for empty input.
///
/// Only a window proportional to the cluster's own length is examined, so
/// decoding a run of text token by token stays linear in its length.
pub fn first_grapheme(bytes: &[u8]) -> (usize, usize) {
    let (len, width, _) = scan_first_grapheme(bytes);
    (len, width)
}

/// As [`first_grapheme`], also returning the number of bytes examined
fn scan_first_grapheme(bytes: &[u8]) -> (usize, usize, usize) {
    let mut window = INITIAL_WINDOW;
    loop {
        let limit = window.min(bytes.len());
        // Clusters starting with a non-ASCII scalar never contain ASCII
        let end = bytes[..limit]
            .iter()
            .position(|&b| b < 0x80)
            .unwrap_or(limit);
        let run = &bytes[..end];
        // The run ends inside the window rather than at its edge
        let complete = end < limit || limit == bytes.len();

        let (text, cut_by_window) = match std::str::from_utf8(run) {
            Ok(text) => (text, !complete),
            Err(err) => {
                let cut = err.error_len().is_none() && !complete;
                match std::str::from_utf8(&run[..err.valid_up_to()]) {
                    Ok(text) if !text.is_empty() => (text, cut),
                    _ if cut => {
                        window *= 2;
                        continue;
                    }
                    _ => return (err.error_len().unwrap_or(run.len()), 0, limit),
                }
            }
        };

        match text.graphemes(true).next() {
            Some(cluster) if cluster.len() == text.len() && cut_by_window => window *= 2,
            Some(cluster) => return (cluster.len(), cluster_width(cluster), limit),
            None => return (0, 0, limit),
        }
    }
}

/// Whether `bytes` is a UTF-8 sequence cut off before its end, as left at
/// the end of a chunk
pub fn is_truncated(bytes: &[u8]) -> bool {
    bytes.first().is_some_and(|&b| b >= 0xC0)
        && matches!(std::str::from_utf8(bytes), Err(e) if e.error_len().is_none())
}

/// Cell width of a grapheme cluster, at most 2
pub fn cluster_width(cluster: &str) -> usize {
    if cluster.contains(VS16) {
        return 2;
    }
    cluster
        .chars()
        .next()
        .and_then(|c| c.width())
        .unwrap_or(0)
        .min(2)
}
