//! Cell content model.
//!
//! - [`CellContent`] - What a cell holds: nothing, literal text, or a parsed formula
//! - [`CellValue`] - What a cell evaluates to
//! - [`Cell`] - Content plus the memoized formula result and reverse dependency edges

use std::cell::OnceCell;
use std::collections::HashSet;
use std::fmt;

use sheetcalc_engine::engine::{
    Formula, FormulaError, FormulaValue, Limits, ParseError, Position, format_number,
};

/// Leading character that marks a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character that forces the rest of the text to be taken literally.
pub const ESCAPE_SIGN: char = '\'';

/// Kind of content stored in a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Text,
    Formula,
}

/// The content of a cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellContent {
    #[default]
    Empty,
    /// Raw text, possibly starting with [`ESCAPE_SIGN`].
    Text(String),
    /// A parsed formula and its canonical text (including the leading `=`).
    Formula { formula: Formula, text: String },
}

impl CellContent {
    /// Classify user input.
    /// - Empty string -> Empty
    /// - `=` followed by at least one character -> Formula (the rest is parsed)
    /// - Anything else, including a lone `=` -> Text, verbatim
    pub fn classify(input: &str, limits: &Limits) -> Result<CellContent, ParseError> {
        match input.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                let formula = Formula::parse_within(expression, limits)?;
                let text = format!("{FORMULA_SIGN}{}", formula.expression());
                Ok(CellContent::Formula { formula, text })
            }
            _ if input.is_empty() => Ok(CellContent::Empty),
            _ => Ok(CellContent::Text(input.to_string())),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            CellContent::Empty => CellKind::Empty,
            CellContent::Text(_) => CellKind::Text,
            CellContent::Formula { .. } => CellKind::Formula,
        }
    }

    /// Text as the user would edit it.
    pub fn text(&self) -> &str {
        match self {
            CellContent::Empty => "",
            CellContent::Text(text) => text,
            CellContent::Formula { text, .. } => text,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// Positions this content reads (forward edges).
    pub fn referenced_cells(&self) -> Vec<Position> {
        match self {
            CellContent::Formula { formula, .. } => formula.referenced_cells(),
            CellContent::Empty | CellContent::Text(_) => Vec::new(),
        }
    }
}

/// Value of a text cell: the stored text without a leading escape sign.
pub fn text_value(text: &str) -> &str {
    text.strip_prefix(ESCAPE_SIGN).unwrap_or(text)
}

/// Coerce the value of a text cell to a number for use inside a formula.
pub(crate) fn coerce_text(value: &str) -> FormulaValue {
    if value.is_empty() {
        return Ok(0.0);
    }
    if value.chars().any(char::is_alphabetic) {
        return Err(FormulaError::Value);
    }
    value.trim().parse::<f64>().map_err(|_| FormulaError::Value)
}

/// The computed value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl From<FormulaValue> for CellValue {
    fn from(value: FormulaValue) -> Self {
        match value {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(e),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Error(e) => write!(f, "{e}"),
        }
    }
}

/// A cell owned by a sheet.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    pub(crate) content: CellContent,
    /// Memoized formula result; only ever set for formula cells.
    pub(crate) cache: OnceCell<FormulaValue>,
    /// Cells whose formulas read this one (reverse edges).
    pub(crate) dependents: HashSet<Position>,
}

impl Cell {
    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn kind(&self) -> CellKind {
        self.content.kind()
    }

    pub fn text(&self) -> &str {
        self.content.text()
    }

    pub fn referenced_cells(&self) -> Vec<Position> {
        self.content.referenced_cells()
    }

    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }

    pub fn cached_value(&self) -> Option<FormulaValue> {
        self.cache.get().copied()
    }

    pub(crate) fn reset_cache(&mut self) {
        self.cache.take();
    }
}
