//! Tab-separated rendering of the printable area.

use std::io::Write;

use sheetcalc_engine::engine::Position;

use super::{CellView, Sheet};
use crate::error::Result;

impl Sheet {
    /// Write every cell's value, row by row. Cells are separated by tabs and
    /// rows end with a newline; empty cells print as nothing.
    pub fn print_values<W: Write>(&self, out: &mut W) -> Result<()> {
        self.print_with(out, |view| view.value().to_string())
    }

    /// Write every cell's text, laid out like [`Sheet::print_values`].
    pub fn print_texts<W: Write>(&self, out: &mut W) -> Result<()> {
        self.print_with(out, |view| view.text().to_string())
    }

    fn print_with<W, F>(&self, out: &mut W, render: F) -> Result<()>
    where
        W: Write,
        F: Fn(CellView<'_>) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_all(b"\t")?;
                }
                if let Some(view) = self.visible_cell(Position::new(row, col)) {
                    out.write_all(render(view).as_bytes())?;
                }
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::sheet::Sheet;
    use pretty_assertions::assert_eq;
    use sheetcalc_engine::engine::Position;

    fn p(name: &str) -> Position {
        Position::from_a1(name)
    }

    fn render(sheet: &Sheet) -> (String, String) {
        let mut values = Vec::new();
        let mut texts = Vec::new();
        sheet.print_values(&mut values).unwrap();
        sheet.print_texts(&mut texts).unwrap();
        (
            String::from_utf8(values).unwrap(),
            String::from_utf8(texts).unwrap(),
        )
    }

    #[test]
    fn test_print_empty_sheet() {
        assert_eq!(render(&Sheet::new()), (String::new(), String::new()));
    }

    #[test]
    fn test_print_grid() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=(1+2)*3").unwrap();
        sheet.set_cell(p("B1"), "=1/0").unwrap();
        sheet.set_cell(p("A2"), "'=escaped").unwrap();
        sheet.set_cell(p("C2"), "=A1/2").unwrap();

        let (values, texts) = render(&sheet);
        assert_eq!(values, "9\t#ARITHM!\t\n=escaped\t\t4.5\n");
        assert_eq!(texts, "=(1+2)*3\t=1/0\t\n'=escaped\t\t=A1/2\n");
    }

    #[test]
    fn test_print_skips_placeholders() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("B2"), "=A1+A2").unwrap();
        let (values, texts) = render(&sheet);
        assert_eq!(values, "\t\n\t0\n");
        assert_eq!(texts, "\t\n\t=A1+A2\n");
    }
}
