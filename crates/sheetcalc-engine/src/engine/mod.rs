//! Spreadsheet engine API.
//!
//! This module provides the pieces a sheet builds on:
//!
//! - [`Position`], [`Size`], [`Limits`] - Cell addresses (A1 notation ↔ row/col indices)
//! - [`Formula`] - Parse, evaluate and pretty-print formula expressions
//! - [`FormulaError`] - Evaluation errors that flow through the sheet as values
//! - [`format_number`], [`format_value`] - Format values for display

mod ast;
mod error;
mod format;
mod formula;
mod lexer;
mod position;

pub use ast::{MAX_NESTING, MAX_OPERATORS};
pub use error::{FormulaError, FormulaValue, ParseError};
pub use format::{DISPLAY_PRECISION, format_number, format_value};
pub use formula::Formula;
pub use position::{Limits, MAX_COLS, MAX_ROWS, ParsePositionError, Position, Size};
