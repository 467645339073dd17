//! sheetcalc - an in-memory spreadsheet with dependency tracking.
//!
//! Cells hold text or formulas. Formulas are recomputed lazily: editing a
//! cell drops the cached results of everything downstream, and the next read
//! evaluates only what is stale. Edits that would create a reference cycle
//! are rejected and leave the sheet untouched.
//!
//! ```
//! use sheetcalc::{CellValue, Position, create_sheet};
//!
//! let mut sheet = create_sheet();
//! sheet.set_cell(Position::from_a1("A1"), "5").unwrap();
//! sheet.set_cell(Position::from_a1("B1"), "=A1+A1").unwrap();
//! assert_eq!(
//!     sheet.value(Position::from_a1("B1")).unwrap(),
//!     Some(CellValue::Number(10.0))
//! );
//! ```

pub mod config;
pub mod error;

use std::path::Path;

pub use error::{Error, Result};
pub use sheetcalc_core::{
    Cell, CellContent, CellKind, CellValue, CellView, Sheet, SheetConfig, SheetError,
};
pub use sheetcalc_engine::engine::{
    Formula, FormulaError, FormulaValue, Limits, ParseError, Position, Size,
};

/// Create an empty sheet with the default grid limits.
pub fn create_sheet() -> Sheet {
    Sheet::new()
}

/// Create an empty sheet configured from `config_path`, or from the default
/// config file location when no path is given.
pub fn open_sheet(config_path: Option<&Path>) -> Result<Sheet> {
    let config = config::load_config(config_path)?;
    Ok(Sheet::with_config(config))
}
