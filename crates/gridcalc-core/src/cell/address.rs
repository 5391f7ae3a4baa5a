//! Cell address type

use crate::error::{Error, Result};
use crate::{COLS, ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "P16")
///
/// Columns are a single letter from `A` to `P`, rows are numbered 1-16 in text.
/// Both are stored 0-based. An address can only be constructed inside the grid bounds,
/// so indexing a grid with it never goes out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct CellAddress {
    row: usize,
    col: usize,
}

impl CellAddress {
    /// Create a new cell address from 0-based indices
    pub fn new(row: usize, col: usize) -> Result<Self> {
        if row >= ROWS {
            return Err(Error::RowOutOfBounds(row, ROWS - 1));
        }
        if col >= COLS {
            return Err(Error::ColumnOutOfBounds(col, COLS - 1));
        }
        Ok(Self { row, col })
    }

    /// Row index (0-based)
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column index (0-based, A=0 ... P=15)
    pub fn col(&self) -> usize {
        self.col
    }

    /// Parse a cell address from A1-style notation
    ///
    /// The column letter is case-insensitive.
    ///
    /// # Examples
    /// ```
    /// use gridcalc_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("b12").unwrap();
    /// assert_eq!(addr.row(), 11);
    /// assert_eq!(addr.col(), 1);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut chars = s.chars();

        let letter = chars
            .next()
            .ok_or_else(|| Error::InvalidAddress("empty address".into()))?;
        let col = Self::letter_to_column(letter)?;

        let row_str = chars.as_str();
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if row_str.len() > 2 || !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: usize = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        // Rows are 1-based in text
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        Self::new(row - 1, col)
    }

    /// Convert a column index to its letter (0 = A, 15 = P)
    pub fn column_to_letter(col: usize) -> char {
        debug_assert!(col < COLS);
        (b'A' + col as u8) as char
    }

    /// Convert a column letter to its index (A = 0, P = 15)
    pub fn letter_to_column(letter: char) -> Result<usize> {
        let upper = letter.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return Err(Error::InvalidAddress(format!(
                "invalid column letter '{}'",
                letter
            )));
        }

        let col = (upper as u8 - b'A') as usize;
        if col >= COLS {
            return Err(Error::ColumnOutOfBounds(col, COLS - 1));
        }
        Ok(col)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letter(self.col), self.row + 1)
    }

    /// Iterate over every address of the grid in row-major order
    pub fn all() -> impl Iterator<Item = CellAddress> {
        (0..ROWS).flat_map(|row| (0..COLS).map(move |col| CellAddress { row, col }))
    }

    /// Flat index into a row-major `ROWS * COLS` buffer
    pub fn index(&self) -> usize {
        self.row * COLS + self.col
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_to_letter(self.col), self.row + 1)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CellAddress {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CellAddress> for String {
    fn from(addr: CellAddress) -> Self {
        addr.to_a1_string()
    }
}
