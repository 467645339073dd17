//! Expression tree, recursive-descent parser and canonical printer.

use std::fmt;

use super::error::{FormulaError, FormulaValue, ParseError};
use super::lexer::{Spanned, Token};
use super::position::{Limits, Position};

/// Maximum nesting of parentheses and unary operators.
pub const MAX_NESTING: usize = 512;

/// Maximum number of binary operators in one formula.
pub const MAX_OPERATORS: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }

    fn apply(self, l: f64, r: f64) -> FormulaValue {
        finite(match self {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => l / r,
        })
    }

    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Cell(Position),
    /// An address outside the grid, kept verbatim so it prints back unchanged.
    InvalidRef(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Unary { .. } => UNARY_PRECEDENCE,
            _ => ATOM_PRECEDENCE,
        }
    }

    /// Split a left-deep run of binary operators into its leftmost operand and
    /// the `(op, rhs)` pairs above it, innermost first.
    fn left_spine(&self) -> (&Expr, Vec<(BinaryOp, &Expr)>) {
        let mut chain = Vec::new();
        let mut node = self;
        while let Expr::Binary { op, lhs, rhs } = node {
            chain.push((*op, &**rhs));
            node = &**lhs;
        }
        chain.reverse();
        (node, chain)
    }

    pub(crate) fn evaluate<F>(&self, resolve: &F) -> FormulaValue
    where
        F: Fn(Position) -> FormulaValue,
    {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Cell(pos) => resolve(*pos),
            Expr::InvalidRef(_) => Err(FormulaError::Ref),
            Expr::Unary { op, operand } => {
                let v = operand.evaluate(resolve)?;
                Ok(match op {
                    UnaryOp::Plus => v,
                    UnaryOp::Minus => -v,
                })
            }
            Expr::Binary { .. } => {
                let (first, chain) = self.left_spine();
                let mut acc = first.evaluate(resolve)?;
                for (op, rhs) in chain {
                    acc = op.apply(acc, rhs.evaluate(resolve)?)?;
                }
                Ok(acc)
            }
        }
    }

    pub(crate) fn collect_cells(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Cell(pos) => out.push(*pos),
            Expr::Unary { operand, .. } => operand.collect_cells(out),
            Expr::Binary { .. } => {
                let (first, chain) = self.left_spine();
                first.collect_cells(out);
                for (_, rhs) in chain {
                    rhs.collect_cells(out);
                }
            }
            Expr::Number(_) | Expr::InvalidRef(_) => {}
        }
    }
}

fn finite(n: f64) -> FormulaValue {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(FormulaError::Arithmetic)
    }
}

fn write_wrapped(f: &mut fmt::Formatter<'_>, expr: &Expr, wrap: bool) -> fmt::Result {
    if wrap {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Cell(pos) => write!(f, "{pos}"),
            Expr::InvalidRef(text) => f.write_str(text),
            Expr::Unary { op, operand } => {
                f.write_str(match op {
                    UnaryOp::Plus => "+",
                    UnaryOp::Minus => "-",
                })?;
                write_wrapped(f, operand, operand.precedence() < UNARY_PRECEDENCE)
            }
            Expr::Binary { .. } => {
                // Follow the left spine down to the first operand that needs
                // its own parentheses; that operand prints recursively.
                let mut chain = Vec::new();
                let mut node = self;
                let (first, wrap_first) = loop {
                    let Expr::Binary { op, lhs, rhs } = node else {
                        break (node, false);
                    };
                    chain.push((*op, &**rhs));
                    if lhs.precedence() < op.precedence() {
                        break (&**lhs, true);
                    }
                    node = &**lhs;
                };
                write_wrapped(f, first, wrap_first)?;
                for (op, rhs) in chain.into_iter().rev() {
                    let prec = op.precedence();
                    write!(f, "{}", op.symbol())?;
                    let rhs_wrap = rhs.precedence() < prec
                        || (rhs.precedence() == prec
                            && matches!(op, BinaryOp::Sub | BinaryOp::Div));
                    write_wrapped(f, rhs, rhs_wrap)?;
                }
                Ok(())
            }
        }
    }
}

pub(crate) struct Parser<'a> {
    tokens: &'a [Spanned],
    next: usize,
    depth: usize,
    operators: usize,
    limits: Limits,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Spanned], limits: Limits) -> Self {
        Parser {
            tokens,
            next: 0,
            depth: 0,
            operators: 0,
            limits,
        }
    }

    pub(crate) fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.expr()?;
        match self.tokens.get(self.next) {
            None => Ok(expr),
            Some(extra) => Err(unexpected(extra)),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.next).map(|s| &s.token)
    }

    fn bump(&mut self) -> Result<&'a Spanned, ParseError> {
        let spanned = self.tokens.get(self.next).ok_or(ParseError::UnexpectedEnd)?;
        self.next += 1;
        Ok(spanned)
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::TooDeep(MAX_NESTING));
        }
        Ok(())
    }

    fn count_operator(&mut self) -> Result<(), ParseError> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(ParseError::TooManyOperators(MAX_OPERATORS));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.next += 1;
            self.count_operator()?;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.next += 1;
            self.count_operator()?;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.primary(),
        };
        self.next += 1;
        self.descend()?;
        let operand = self.unary()?;
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let spanned = self.bump()?;
        match &spanned.token {
            Token::Number(n) => Ok(Expr::Number(*n)),
            Token::Cell(name) => {
                let pos = Position::from_a1_within(name, &self.limits);
                if pos == Position::NONE {
                    Ok(Expr::InvalidRef(name.clone()))
                } else {
                    Ok(Expr::Cell(pos))
                }
            }
            Token::LParen => {
                self.descend()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.bump()? {
                    Spanned {
                        token: Token::RParen,
                        ..
                    } => Ok(inner),
                    other => Err(unexpected(other)),
                }
            }
            _ => Err(unexpected(spanned)),
        }
    }
}

fn unexpected(spanned: &Spanned) -> ParseError {
    ParseError::UnexpectedToken {
        found: spanned.token.to_string(),
        offset: spanned.offset,
    }
}
