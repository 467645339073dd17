//! Tokenizer for formula text.
//!
//! Formulas are the text after the leading `=`. Whitespace between tokens is
//! skipped; cell addresses must be uppercase (`a1` is rejected).

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::error::ParseError;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Cell(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {n}"),
            Token::Cell(name) => write!(f, "cell {name}"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

/// A token with its byte offset in the formula text.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"\A(?:(?<ws>\s+)|(?<num>(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)|(?<cell>[A-Z]+[0-9]+)|(?<op>[-+*/()]))",
        )
        .expect("formula token regex must compile")
    })
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let re = token_re();
    let mut tokens = Vec::new();
    let mut offset = 0;

    while offset < input.len() {
        let rest = &input[offset..];
        let Some(caps) = re.captures(rest) else {
            let ch = rest.chars().next().unwrap_or_default();
            return Err(ParseError::UnexpectedChar { ch, offset });
        };
        let whole = caps.get(0).map_or(0, |m| m.end());

        let token = if caps.name("ws").is_some() {
            None
        } else if let Some(m) = caps.name("num") {
            let n = m
                .as_str()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| ParseError::InvalidNumber(m.as_str().to_string()))?;
            Some(Token::Number(n))
        } else if let Some(m) = caps.name("cell") {
            Some(Token::Cell(m.as_str().to_string()))
        } else {
            match caps.name("op").map(|m| m.as_str()) {
                Some("+") => Some(Token::Plus),
                Some("-") => Some(Token::Minus),
                Some("*") => Some(Token::Star),
                Some("/") => Some(Token::Slash),
                Some("(") => Some(Token::LParen),
                _ => Some(Token::RParen),
            }
        };

        if let Some(token) = token {
            tokens.push(Spanned { token, offset });
        }
        offset += whole;
    }

    Ok(tokens)
}
