//! Printable-area bookkeeping.
//!
//! Keeps a count of non-empty cells per row and per column so that the
//! printable size can grow in O(1) and shrink in O(log n) without scanning
//! the grid.

use std::collections::BTreeMap;

use sheetcalc_engine::engine::{Position, Size};

#[derive(Clone, Debug, Default)]
pub(crate) struct PrintableBounds {
    rows: BTreeMap<i32, usize>,
    cols: BTreeMap<i32, usize>,
    size: Size,
}

impl PrintableBounds {
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size.rows && pos.col < self.size.cols
    }

    /// Record a cell at `pos` becoming non-empty.
    pub fn grow(&mut self, pos: Position) {
        *self.rows.entry(pos.row).or_default() += 1;
        *self.cols.entry(pos.col).or_default() += 1;
        self.size.rows = self.size.rows.max(pos.row + 1);
        self.size.cols = self.size.cols.max(pos.col + 1);
    }

    /// Record the cell at `pos` becoming empty.
    pub fn shrink(&mut self, pos: Position) {
        decrement(&mut self.rows, pos.row);
        decrement(&mut self.cols, pos.col);
        self.size = Size::new(
            self.rows.last_key_value().map_or(0, |(row, _)| row + 1),
            self.cols.last_key_value().map_or(0, |(col, _)| col + 1),
        );
    }
}

fn decrement(counts: &mut BTreeMap<i32, usize>, key: i32) {
    if let Some(count) = counts.get_mut(&key) {
        *count -= 1;
        if *count == 0 {
            counts.remove(&key);
        }
    }
}
