use std::collections::HashSet;

use sheetcalc_engine::engine::{FormulaValue, Position};

use super::Sheet;
use crate::cell::{CellContent, CellKind};
use crate::error::{Result, SheetError};
use crate::graph::find_cycle;

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// The edit is all-or-nothing: an invalid position, a formula that does
    /// not parse, or a formula that would close a reference cycle leaves the
    /// sheet exactly as it was.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        self.check_position(pos)?;

        let current = self.cells.get(&pos).map_or("", |cell| cell.text());
        if current == text {
            return Ok(());
        }

        let content = CellContent::classify(text, &self.config.limits).inspect_err(|e| {
            log::debug!("rejected formula for {pos}: {e}");
        })?;
        let existed = self.cells.contains_key(&pos);

        // Install tentatively so the cycle check sees the new forward edges.
        let cell = self.cells.entry(pos).or_default();
        let old_content = std::mem::replace(&mut cell.content, content);
        let old_cache = cell.cache.take();

        if cell.kind() == CellKind::Formula {
            let cycle = find_cycle(pos, |p| {
                self.cells
                    .get(&p)
                    .map(|c| c.referenced_cells())
                    .unwrap_or_default()
            });
            if let Some(path) = cycle {
                self.rollback(pos, old_content, old_cache, existed);
                log::debug!("rejected {text:?} at {pos}: circular dependency {path:?}");
                return Err(SheetError::CircularDependency { cell: pos, path });
            }
        }

        let new_refs = self.cells[&pos].referenced_cells();
        self.unlink(pos, &old_content.referenced_cells(), &new_refs);
        self.link(pos, &new_refs);
        self.mark_dependents_stale(pos);
        self.update_bounds(pos, !old_content.is_empty(), !text.is_empty());
        self.drop_if_unused(pos);

        log::debug!("set {pos} to {text:?}");
        Ok(())
    }

    /// Clear the specified cell.
    ///
    /// The cell keeps existing while other formulas still reference it; its
    /// value becomes that of an empty cell and its dependents recompute.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        self.set_cell(pos, "")
    }

    /// Undo a tentative install after a rejected edit.
    fn rollback(
        &mut self,
        pos: Position,
        content: CellContent,
        cache: Option<FormulaValue>,
        existed: bool,
    ) {
        if !existed {
            self.cells.remove(&pos);
            return;
        }
        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.content = content;
            cell.cache.take();
            if let Some(value) = cache {
                let _ = cell.cache.set(value);
            }
        }
    }

    /// Remove reverse edges for references the new content no longer makes.
    fn unlink(&mut self, pos: Position, old_refs: &[Position], new_refs: &[Position]) {
        for dep in old_refs {
            if new_refs.contains(dep) {
                continue;
            }
            if let Some(cell) = self.cells.get_mut(dep) {
                cell.dependents.remove(&pos);
            }
            self.drop_if_unused(*dep);
        }
    }

    /// Register `pos` as a dependent of every cell it references, creating
    /// empty placeholders where needed.
    fn link(&mut self, pos: Position, refs: &[Position]) {
        for dep in refs {
            self.cells.entry(*dep).or_default().dependents.insert(pos);
        }
    }

    /// Drop the memoized value of `changed` and of everything downstream.
    ///
    /// A formula without a cached value cannot have dependents with cached
    /// values, so the walk stops there.
    fn mark_dependents_stale(&mut self, changed: Position) {
        let mut to_process = vec![changed];
        let mut visited = HashSet::new();
        while let Some(pos) = to_process.pop() {
            if !visited.insert(pos) {
                continue;
            }
            let Some(cell) = self.cells.get_mut(&pos) else {
                continue;
            };
            let had_value = cell.cache.take().is_some();
            if pos == changed || had_value {
                to_process.extend(cell.dependents.iter().copied());
            }
        }
        log::debug!("invalidated {} cell(s) after editing {changed}", visited.len());
    }

    fn update_bounds(&mut self, pos: Position, was_filled: bool, is_filled: bool) {
        match (was_filled, is_filled) {
            (false, true) => self.bounds.grow(pos),
            (true, false) => self.bounds.shrink(pos),
            _ => {}
        }
    }

    /// Forget an empty cell that nothing references.
    fn drop_if_unused(&mut self, pos: Position) {
        if self
            .cells
            .get(&pos)
            .is_some_and(|cell| cell.content.is_empty() && !cell.is_referenced())
        {
            self.cells.remove(&pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::{CellKind, CellValue};
    use crate::config::SheetConfig;
    use crate::error::SheetError;
    use crate::sheet::Sheet;
    use sheetcalc_engine::engine::{FormulaError, Limits, Position, Size};

    fn p(name: &str) -> Position {
        Position::from_a1(name)
    }

    fn number(sheet: &Sheet, name: &str) -> f64 {
        match sheet.value(p(name)).unwrap() {
            Some(CellValue::Number(n)) => n,
            other => panic!("expected number in {name}, got {other:?}"),
        }
    }

    #[test]
    fn test_long_column_sum() {
        let mut sheet = Sheet::new();
        let mut terms = Vec::new();
        for row in 0..1200 {
            let pos = Position::new(row, 0);
            sheet.set_cell(pos, "2").unwrap();
            terms.push(pos.to_a1());
        }
        sheet.set_cell(p("B1"), &format!("={}", terms.join("+"))).unwrap();
        assert_eq!(number(&sheet, "B1"), 2400.0);

        sheet.set_cell(p("A1200"), "-2").unwrap();
        assert_eq!(number(&sheet, "B1"), 2396.0);
    }

    #[test]
    fn test_set_rejects_invalid_position() {
        let mut sheet = Sheet::new();
        for pos in [Position::NONE, Position::new(16384, 0), Position::new(0, -1)] {
            assert!(matches!(
                sheet.set_cell(pos, "x"),
                Err(SheetError::InvalidPosition(_))
            ));
        }
        assert!(matches!(
            sheet.clear_cell(Position::NONE),
            Err(SheetError::InvalidPosition(_))
        ));
        assert!(sheet.cell(Position::NONE).is_err());
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
    }

    #[test]
    fn test_config_limits_apply() {
        let mut sheet = Sheet::with_config(SheetConfig {
            limits: Limits {
                max_rows: 3,
                max_cols: 3,
            },
        });
        sheet.set_cell(p("C3"), "ok").unwrap();
        assert!(matches!(
            sheet.set_cell(p("D1"), "x"),
            Err(SheetError::InvalidPosition(_))
        ));

        // References past the limits are invalid references, not cells.
        sheet.set_cell(p("A1"), "=D1+1").unwrap();
        assert_eq!(
            sheet.value(p("A1")).unwrap(),
            Some(CellValue::Error(FormulaError::Ref))
        );
        assert!(!sheet.cells.contains_key(&p("D1")));
    }

    #[test]
    fn test_formula_recomputes_when_input_changes() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("B1"), "=A1").unwrap();
        sheet.set_cell(p("A1"), "10").unwrap();
        assert_eq!(number(&sheet, "B1"), 10.0);

        sheet.set_cell(p("A1"), "20").unwrap();
        assert_eq!(number(&sheet, "B1"), 20.0);
    }

    #[test]
    fn test_clear_makes_dependents_read_zero() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "5").unwrap();
        sheet.set_cell(p("B1"), "=A1+A1").unwrap();
        assert_eq!(number(&sheet, "B1"), 10.0);

        sheet.clear_cell(p("A1")).unwrap();
        assert_eq!(number(&sheet, "B1"), 0.0);
        assert!(sheet.cell(p("A1")).unwrap().is_none());
        // Still referenced, so the placeholder is kept.
        assert!(sheet.cells.contains_key(&p("A1")));
    }

    #[test]
    fn test_invalidation_reaches_transitive_dependents() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "1").unwrap();
        sheet.set_cell(p("B1"), "=A1+1").unwrap();
        sheet.set_cell(p("C1"), "=B1+1").unwrap();
        sheet.set_cell(p("D1"), "=C1+B1").unwrap();
        assert_eq!(number(&sheet, "D1"), 5.0);

        sheet.set_cell(p("A1"), "10").unwrap();
        assert!(sheet.cells[&p("B1")].cached_value().is_none());
        assert!(sheet.cells[&p("C1")].cached_value().is_none());
        assert!(sheet.cells[&p("D1")].cached_value().is_none());
        assert_eq!(number(&sheet, "D1"), 23.0);
    }

    #[test]
    fn test_diamond_is_accepted() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "1").unwrap();
        sheet.set_cell(p("B1"), "=A1").unwrap();
        sheet.set_cell(p("C1"), "=A1").unwrap();
        sheet.set_cell(p("D1"), "=B1+C1").unwrap();
        assert_eq!(number(&sheet, "D1"), 2.0);
    }

    #[test]
    fn test_direct_cycle_rejected_and_cell_unchanged() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=B1").unwrap();

        let err = sheet.set_cell(p("B1"), "=A1").unwrap_err();
        match err {
            SheetError::CircularDependency { cell, path } => {
                assert_eq!(cell, p("B1"));
                assert_eq!(path, vec![p("B1"), p("A1"), p("B1")]);
            }
            other => panic!("expected circular dependency, got {other:?}"),
        }

        assert!(sheet.cell(p("B1")).unwrap().is_none());
        assert_eq!(sheet.cells[&p("B1")].kind(), CellKind::Empty);
        assert!(sheet.cells[&p("B1")].referenced_cells().is_empty());
        assert_eq!(sheet.text(p("A1")).unwrap(), Some("=B1"));
    }

    #[test]
    fn test_self_reference_rejected_without_leaving_a_cell() {
        let mut sheet = Sheet::new();
        assert!(matches!(
            sheet.set_cell(p("C2"), "=C2+1"),
            Err(SheetError::CircularDependency { .. })
        ));
        assert!(!sheet.cells.contains_key(&p("C2")));
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
    }

    #[test]
    fn test_rejected_cycle_restores_previous_formula_and_cache() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "3").unwrap();
        sheet.set_cell(p("B1"), "=A1*2").unwrap();
        sheet.set_cell(p("C1"), "=B1").unwrap();
        assert_eq!(number(&sheet, "C1"), 6.0);

        assert!(sheet.set_cell(p("B1"), "=C1").is_err());
        assert_eq!(sheet.text(p("B1")).unwrap(), Some("=A1*2"));
        assert_eq!(sheet.cells[&p("B1")].cached_value(), Some(Ok(6.0)));
        assert_eq!(sheet.cells[&p("C1")].cached_value(), Some(Ok(6.0)));
        assert!(!sheet.cells[&p("C1")].dependents.contains(&p("B1")));

        sheet.set_cell(p("A1"), "4").unwrap();
        assert_eq!(number(&sheet, "C1"), 8.0);
    }

    #[test]
    fn test_long_cycle_rejected() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=B1").unwrap();
        sheet.set_cell(p("B1"), "=C1").unwrap();
        sheet.set_cell(p("C1"), "=D1").unwrap();
        assert!(matches!(
            sheet.set_cell(p("D1"), "=1+A1"),
            Err(SheetError::CircularDependency { .. })
        ));
        sheet.set_cell(p("D1"), "=1").unwrap();
        assert_eq!(number(&sheet, "A1"), 1.0);
    }

    #[test]
    fn test_parse_error_leaves_cell_unmodified() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=1+2").unwrap();
        assert_eq!(number(&sheet, "A1"), 3.0);

        assert!(matches!(
            sheet.set_cell(p("A1"), "=1+"),
            Err(SheetError::Formula(_))
        ));
        assert_eq!(sheet.text(p("A1")).unwrap(), Some("=1+2"));
        assert_eq!(sheet.cells[&p("A1")].cached_value(), Some(Ok(3.0)));

        assert!(sheet.set_cell(p("B1"), "=)").is_err());
        assert!(!sheet.cells.contains_key(&p("B1")));
    }

    #[test]
    fn test_placeholders_created_for_references() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=B2+C3").unwrap();

        for name in ["B2", "C3"] {
            let cell = &sheet.cells[&p(name)];
            assert_eq!(cell.kind(), CellKind::Empty);
            assert!(cell.dependents.contains(&p("A1")));
        }
        // Placeholders are not part of the printable area.
        assert_eq!(sheet.printable_size(), Size::new(1, 1));
        assert!(sheet.cell(p("B2")).unwrap().is_none());
    }

    #[test]
    fn test_replacing_formula_unlinks_old_references() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=B1+C1").unwrap();
        sheet.set_cell(p("A1"), "=C1").unwrap();

        assert!(!sheet.cells.contains_key(&p("B1")));
        assert!(sheet.cells[&p("C1")].dependents.contains(&p("A1")));

        // B1 no longer feeds A1, so writing it must not affect A1's cache.
        assert_eq!(number(&sheet, "A1"), 0.0);
        sheet.set_cell(p("B1"), "7").unwrap();
        assert_eq!(sheet.cells[&p("A1")].cached_value(), Some(Ok(0.0)));
    }

    #[test]
    fn test_cycle_through_replaced_reference_is_allowed() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=B1").unwrap();
        sheet.set_cell(p("A1"), "5").unwrap();
        sheet.set_cell(p("B1"), "=A1").unwrap();
        assert_eq!(number(&sheet, "B1"), 5.0);
    }

    #[test]
    fn test_same_text_is_noop() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "2").unwrap();
        sheet.set_cell(p("B1"), "=A1").unwrap();
        assert_eq!(number(&sheet, "B1"), 2.0);

        sheet.set_cell(p("A1"), "2").unwrap();
        assert_eq!(sheet.cells[&p("B1")].cached_value(), Some(Ok(2.0)));
        assert_eq!(sheet.printable_size(), Size::new(1, 2));
    }

    #[test]
    fn test_printable_size_tracking() {
        let mut sheet = Sheet::new();
        assert_eq!(sheet.printable_size(), Size::new(0, 0));

        sheet.set_cell(p("C3"), "x").unwrap();
        assert_eq!(sheet.printable_size(), Size::new(3, 3));
        sheet.clear_cell(p("C3")).unwrap();
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
        assert!(sheet.cells.is_empty());
    }

    #[test]
    fn test_printable_size_shrinks_to_remaining_cells() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("B2"), "a").unwrap();
        sheet.set_cell(p("E1"), "b").unwrap();
        sheet.set_cell(p("A7"), "c").unwrap();
        assert_eq!(sheet.printable_size(), Size::new(7, 5));

        sheet.clear_cell(p("A7")).unwrap();
        assert_eq!(sheet.printable_size(), Size::new(2, 5));
        sheet.set_cell(p("E1"), "").unwrap();
        assert_eq!(sheet.printable_size(), Size::new(2, 2));

        // Overwriting a filled cell does not count it twice.
        sheet.set_cell(p("B2"), "again").unwrap();
        sheet.clear_cell(p("B2")).unwrap();
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
    }

    #[test]
    fn test_clear_absent_cell_is_noop() {
        let mut sheet = Sheet::new();
        sheet.clear_cell(p("Z99")).unwrap();
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
        assert!(sheet.cells.is_empty());
    }

    #[test]
    fn test_clearing_formula_releases_references() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=B1").unwrap();
        sheet.clear_cell(p("A1")).unwrap();
        assert!(sheet.cells.is_empty());
    }
}
