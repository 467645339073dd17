//! Cell addresses and their A1-style text form.
//!
//! Provides bidirectional conversion between spreadsheet-style addresses
//! (e.g., "A1", "Z1", "AA17") and zero-indexed row/column coordinates.
//! Columns use bijective base-26 letters, so column 26 is "AA" rather than "A0".
//!
//! # Examples
//!
//! ```
//! use sheetcalc_engine::engine::Position;
//!
//! let pos = Position::from_a1("B3");
//! assert_eq!(pos, Position::new(2, 1));
//! assert_eq!(pos.to_string(), "B3");
//! assert_eq!(Position::from_a1("b3"), Position::NONE);
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Hard upper bound on the number of rows of any sheet.
pub const MAX_ROWS: i32 = 16384;
/// Hard upper bound on the number of columns of any sheet.
pub const MAX_COLS: i32 = 16384;

/// Longest address text accepted by the decoder ("XFD16384" fits easily).
const MAX_A1_LEN: usize = 17;

/// Grid bounds a position must fall within to be addressable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_rows: i32,
    pub max_cols: i32,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_rows: MAX_ROWS,
            max_cols: MAX_COLS,
        }
    }
}

impl Limits {
    /// Returns true if `pos` lies inside these limits.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && pos.row < self.max_rows && pos.col < self.max_cols
    }

    /// Clamp both dimensions into `1..=MAX_*`.
    pub fn clamped(self) -> Limits {
        Limits {
            max_rows: self.max_rows.clamp(1, MAX_ROWS),
            max_cols: self.max_cols.clamp(1, MAX_COLS),
        }
    }
}

/// A zero-indexed (row, column) cell address.
///
/// Ordering is lexicographic on (row, col), which makes positions usable as
/// ordered-map keys.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Sentinel for "no position"; returned by the decoder on any failure.
    pub const NONE: Position = Position { row: -1, col: -1 };

    pub const fn new(row: i32, col: i32) -> Position {
        Position { row, col }
    }

    /// Returns true if the position lies within the hard grid limits.
    pub fn is_valid(&self) -> bool {
        Limits::default().contains(*self)
    }

    /// Decode an A1-style address. Returns [`Position::NONE`] if the text is
    /// malformed or falls outside the hard grid limits.
    pub fn from_a1(name: &str) -> Position {
        Self::from_a1_within(name, &Limits::default())
    }

    /// Decode an A1-style address against custom limits.
    pub fn from_a1_within(name: &str, limits: &Limits) -> Position {
        Self::parse_a1(name, limits).unwrap_or(Position::NONE)
    }

    fn parse_a1(name: &str, limits: &Limits) -> Option<Position> {
        if name.len() > MAX_A1_LEN {
            return None;
        }
        let caps = a1_re().captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0i64;
        for c in letters.bytes() {
            let digit = i64::from(c - b'A') + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = i32::try_from(col_acc - 1).ok()?;
        let row = i32::try_from(numbers.parse::<i64>().ok()? - 1).ok()?;

        let pos = Position::new(row, col);
        limits.contains(pos).then_some(pos)
    }

    /// Encode as A1-style text. Invalid positions encode to an empty string.
    pub fn to_a1(&self) -> String {
        if !self.is_valid() {
            return String::new();
        }
        format!("{}{}", Position::col_to_letters(self.col), self.row + 1)
    }

    /// Convert a column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: i32) -> String {
        let mut result = String::new();
        let mut n = i64::from(col) + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

fn a1_re() -> &'static Regex {
    static A1_RE: OnceLock<Regex> = OnceLock::new();
    A1_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[1-9][0-9]*)$")
            .expect("cell address regex must compile")
    })
}

/// Error returned when parsing a [`Position`] through [`std::str::FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cell address: {0:?}")]
pub struct ParsePositionError(pub String);

impl std::str::FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Position::from_a1(s) {
            Position::NONE => Err(ParsePositionError(s.to_string())),
            pos => Ok(pos),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// Printable area of a sheet: one past the highest occupied row and column.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Size {
    pub const fn new(rows: i32, cols: i32) -> Size {
        Size { rows, cols }
    }
}
