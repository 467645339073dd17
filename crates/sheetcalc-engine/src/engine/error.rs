//! Error types produced by the formula engine.

use thiserror::Error;

/// Evaluation error carried as a cell value.
///
/// These are not failures of an operation: a formula that divides by zero has
/// the value `#ARITHM!`, and every formula reading it sees the same value.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Error)]
pub enum FormulaError {
    /// The formula reads a position that does not exist on the grid.
    #[error("#REF!")]
    Ref,
    /// A referenced value could not be coerced to a number.
    #[error("#VALUE!")]
    Value,
    /// An arithmetic operation produced a non-finite result.
    #[error("#ARITHM!")]
    Arithmetic,
}

/// Result of evaluating a formula.
pub type FormulaValue = Result<f64, FormulaError>;

/// Formula text that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("invalid number literal {0:?}")]
    InvalidNumber(String),

    #[error("formula nesting exceeds {0} levels")]
    TooDeep(usize),

    #[error("formula has more than {0} operators")]
    TooManyOperators(usize),
}
