//! sheetcalc-core - sheet model: cells, dependency graph and recalculation.

mod bounds;
pub mod cell;
pub mod config;
pub mod error;
mod graph;
pub mod sheet;

pub use cell::{Cell, CellContent, CellKind, CellValue};
pub use config::SheetConfig;
pub use error::{Result, SheetError};
pub use sheet::{CellView, Sheet};

pub use sheetcalc_engine::engine::{FormulaError, Position, Size};
