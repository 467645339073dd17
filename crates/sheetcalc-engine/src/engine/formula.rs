//! Parsed formulas: the contract between a sheet and the expression engine.
//!
//! A [`Formula`] is built from the text after the leading `=`. It can be
//! evaluated against a resolver that supplies the value of each referenced
//! cell, printed back in canonical form, and asked which cells it reads.

use super::ast::{Expr, Parser};
use super::error::{FormulaValue, ParseError};
use super::lexer::tokenize;
use super::position::{Limits, Position};

#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    ast: Expr,
}

impl Formula {
    /// Parse an expression using the hard grid limits.
    pub fn parse(expression: &str) -> Result<Formula, ParseError> {
        Self::parse_within(expression, &Limits::default())
    }

    /// Parse an expression; addresses outside `limits` become invalid references.
    pub fn parse_within(expression: &str, limits: &Limits) -> Result<Formula, ParseError> {
        let tokens = tokenize(expression)?;
        let ast = Parser::new(&tokens, *limits).parse().inspect_err(|e| {
            log::trace!("rejected formula {expression:?}: {e}");
        })?;
        Ok(Formula { ast })
    }

    /// Evaluate the formula. `resolve` supplies the numeric value of each
    /// referenced cell; an error it returns becomes the formula's value.
    pub fn evaluate<F>(&self, resolve: F) -> FormulaValue
    where
        F: Fn(Position) -> FormulaValue,
    {
        self.ast.evaluate(&resolve)
    }

    /// Canonical text of the expression (without the leading `=`).
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }

    /// Valid positions read by the formula, sorted and deduplicated.
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        self.ast.collect_cells(&mut cells);
        cells.sort();
        cells.dedup();
        cells
    }
}

impl std::str::FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}
