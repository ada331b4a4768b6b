//! Slot Layout Engine.
//!
//! Turns a card count into a pyramid of slots. Row sizes follow the odd
//! numbers 1, 3, 5, ... and whatever cannot fill the next full row is added
//! to the last complete one. Rows are returned top to bottom, smallest first,
//! and each row is centered against the total slot count:
//!
//! ```text
//! layout(9)            layout(6)
//!         [5]                  [3]
//!      [4][5][6]      [1][2][3][4][5]
//!   [3][4][5][6][7]
//! ```

use serde::{Deserialize, Serialize};

/// A position in the pyramid. Both coordinates are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotPosition {
    pub row: usize,
    pub column: usize,
}

impl SlotPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// The generated pyramid. Slots are fresh per card count and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyramidLayout {
    /// Total slots generated; also the grid width rows are centered against.
    pub width: usize,
    pub rows: Vec<Vec<SlotPosition>>,
}

impl PyramidLayout {
    pub fn row_sizes(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    pub fn slot_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn contains(&self, slot: SlotPosition) -> bool {
        self.slots().any(|s| s == slot)
    }

    /// All slots in traversal order: top row first, left to right.
    pub fn slots(&self) -> impl Iterator<Item = SlotPosition> + '_ {
        self.rows.iter().flatten().copied()
    }
}

/// Largest card count `/layout` will build.
pub const MAX_CARDS: usize = 1000;

/// Build the pyramid for `card_count` cards. A count of zero is treated as one.
pub fn layout(card_count: usize) -> PyramidLayout {
    let card_count = card_count.max(1);
    let sizes = row_sizes(card_count);
    let width: usize = sizes.iter().sum();

    let rows = sizes
        .iter()
        .enumerate()
        .map(|(index, &size)| {
            let start_column = (width - size) / 2 + 1;
            (0..size)
                .map(|offset| SlotPosition::new(index + 1, start_column + offset))
                .collect()
        })
        .collect();

    PyramidLayout { width, rows }
}

/// Row sizes, top to bottom, covering at least `card_count` slots.
fn row_sizes(card_count: usize) -> Vec<usize> {
    let mut rows: Vec<usize> = Vec::new();
    let mut remaining = card_count;
    let mut next = 1;

    while remaining > 0 {
        if next <= remaining {
            rows.push(next);
            remaining -= next;
        } else {
            match rows.last_mut() {
                Some(last) => *last += remaining,
                None => rows.push(remaining),
            }
            remaining = 0;
        }
        next += 2;
    }

    let total: usize = rows.iter().sum();
    if total < card_count {
        tracing::error!(
            "Pyramid for {} cards only has {} slots, widening bottom row",
            card_count,
            total
        );
        if let Some(bottom) = rows.iter_mut().max() {
            *bottom += card_count - total;
        }
    }

    rows
}
