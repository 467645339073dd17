use std::collections::HashMap;

use sheetcalc_engine::engine::{Position, Size};

use crate::bounds::PrintableBounds;
use crate::cell::{Cell, CellKind, CellValue};
use crate::config::SheetConfig;
use crate::error::{Result, SheetError};

/// A sparse grid of cells with dependency tracking and cached formula results.
#[derive(Debug, Default)]
pub struct Sheet {
    /// All cells, including empty placeholders that formulas reference.
    pub(crate) cells: HashMap<Position, Cell>,
    /// Per-row/column occupancy behind the printable size.
    pub(crate) bounds: PrintableBounds,
    pub(crate) config: SheetConfig,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SheetConfig) -> Self {
        Sheet {
            config: config.normalized(),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Smallest area anchored at A1 containing every non-empty cell.
    pub fn printable_size(&self) -> Size {
        self.bounds.size()
    }

    pub(crate) fn check_position(&self, pos: Position) -> Result<()> {
        if self.config.limits.contains(pos) {
            Ok(())
        } else {
            Err(SheetError::InvalidPosition(pos))
        }
    }

    /// Look up a non-empty cell.
    ///
    /// Empty cells, including placeholders created for formula references,
    /// are reported as absent.
    pub fn cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        self.check_position(pos)?;
        Ok(self.visible_cell(pos))
    }

    pub(crate) fn visible_cell(&self, pos: Position) -> Option<CellView<'_>> {
        if !self.bounds.contains(pos) {
            return None;
        }
        self.cells
            .get(&pos)
            .filter(|cell| cell.kind() != CellKind::Empty)
            .map(|cell| CellView {
                sheet: self,
                pos,
                cell,
            })
    }

    /// Value of the cell at `pos`, or `None` if it is empty.
    pub fn value(&self, pos: Position) -> Result<Option<CellValue>> {
        Ok(self.cell(pos)?.map(|view| view.value()))
    }

    /// Text of the cell at `pos`, or `None` if it is empty.
    pub fn text(&self, pos: Position) -> Result<Option<&str>> {
        Ok(self.cell(pos)?.map(|view| view.text()))
    }
}

/// Read-only handle to a cell of a [`Sheet`].
#[derive(Clone, Copy)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    pos: Position,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn kind(&self) -> CellKind {
        self.cell.kind()
    }

    pub fn text(&self) -> &'a str {
        self.cell.text()
    }

    /// Evaluate the cell, using and filling formula caches.
    pub fn value(&self) -> CellValue {
        self.sheet.cell_value(self.pos, self.cell)
    }

    pub fn referenced_cells(&self) -> Vec<Position> {
        self.cell.referenced_cells()
    }

    /// Cells whose formulas read this one, sorted.
    pub fn dependents(&self) -> Vec<Position> {
        let mut dependents: Vec<Position> = self.cell.dependents.iter().copied().collect();
        dependents.sort();
        dependents
    }
}

impl std::fmt::Debug for CellView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellView")
            .field("pos", &self.pos)
            .field("text", &self.text())
            .finish()
    }
}
