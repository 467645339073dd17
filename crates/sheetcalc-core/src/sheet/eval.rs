//! Formula evaluation against the sheet.
//!
//! Reading a formula cell first evaluates any upstream formulas whose cache
//! is empty, bottom-up, using an explicit stack. By the time a formula is
//! evaluated every formula it reads already holds a cached value, so long
//! reference chains never recurse.

use sheetcalc_engine::engine::{FormulaValue, Position, format_value};

use super::Sheet;
use crate::cell::{Cell, CellContent, CellValue, coerce_text, text_value};

impl Sheet {
    /// Value of a cell as shown to users.
    ///
    /// An empty cell has the value 0, not "no value"; formulas that read an
    /// empty or never-set cell see 0 as well.
    pub(crate) fn cell_value(&self, pos: Position, cell: &Cell) -> CellValue {
        match &cell.content {
            CellContent::Empty => CellValue::Number(0.0),
            CellContent::Text(text) => CellValue::Text(text_value(text).to_string()),
            CellContent::Formula { .. } => self.formula_value(pos).into(),
        }
    }

    /// Numeric value of `pos` as seen from inside a formula.
    fn resolve(&self, pos: Position) -> FormulaValue {
        let Some(cell) = self.cells.get(&pos) else {
            return Ok(0.0);
        };
        match &cell.content {
            CellContent::Empty => Ok(0.0),
            CellContent::Text(text) => coerce_text(text_value(text)),
            CellContent::Formula { .. } => match cell.cached_value() {
                Some(value) => value,
                None => self.formula_value(pos),
            },
        }
    }

    fn needs_evaluation(&self, pos: Position) -> bool {
        self.cells.get(&pos).is_some_and(|cell| {
            matches!(cell.content, CellContent::Formula { .. }) && cell.cache.get().is_none()
        })
    }

    /// Evaluate the formula at `root`, filling caches of it and every
    /// uncached formula upstream of it.
    pub(crate) fn formula_value(&self, root: Position) -> FormulaValue {
        let mut stack = vec![(root, false)];

        while let Some((pos, expanded)) = stack.pop() {
            if !self.needs_evaluation(pos) {
                continue;
            }
            let Some(CellContent::Formula { formula, .. }) = self.cells.get(&pos).map(|c| &c.content)
            else {
                continue;
            };

            if expanded {
                let value = formula.evaluate(|p| self.resolve(p));
                log::trace!("evaluated {pos} = {}", format_value(&value));
                if let Some(cell) = self.cells.get(&pos) {
                    let _ = cell.cache.set(value);
                }
            } else {
                stack.push((pos, true));
                stack.extend(
                    formula
                        .referenced_cells()
                        .into_iter()
                        .filter(|p| self.needs_evaluation(*p))
                        .map(|p| (p, false)),
                );
            }
        }

        match self.cells.get(&root).and_then(Cell::cached_value) {
            Some(value) => value,
            None => self.resolve(root),
        }
    }
}
