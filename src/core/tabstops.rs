//! Tab stop bookkeeping

use serde::{Deserialize, Serialize};

/// Default distance between tab stops
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Horizontal tab stops of one screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabStops {
    stops: Vec<bool>,
}

impl TabStops {
    /// Stops every `interval` columns across `cols` columns
    pub fn new(cols: usize, interval: usize) -> Self {
        let mut stops = vec![false; cols];
        if interval > 0 {
            for i in (interval..cols).step_by(interval) {
                stops[i] = true;
            }
        }
        Self { stops }
    }

    /// The next stop after `col`, or the last column if there is none
    pub fn next(&self, col: usize) -> usize {
        let last = self.stops.len().saturating_sub(1);
        ((col + 1)..self.stops.len())
            .find(|&i| self.stops[i])
            .unwrap_or(last)
    }
}
