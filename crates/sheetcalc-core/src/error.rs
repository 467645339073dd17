//! Error types for sheet operations.

use thiserror::Error;

use sheetcalc_engine::engine::{ParseError, Position};

/// Errors that abort a sheet operation. The sheet is left unchanged.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid position ({}, {})", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error("Formula error: {0}")]
    Formula(#[from] ParseError),

    #[error("Circular dependency detected at {cell}")]
    CircularDependency {
        cell: Position,
        /// Cells along the cycle, starting and ending at the same position.
        path: Vec<Position>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
