//! Raw cell content table

use super::CellAddress;
use crate::{COLS, ROWS};

/// The textual content of every cell in the grid
///
/// This is the persisted form of a grid: each entry is the text a user typed
/// (`42`, `=A1+B2`) or `None` for an empty cell. Nothing here is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellTable {
    cells: Vec<Option<String>>,
}

impl CellTable {
    /// Create a table with every cell empty
    pub fn new() -> Self {
        Self {
            cells: vec![None; ROWS * COLS],
        }
    }

    /// Get the text of a cell
    pub fn get(&self, addr: CellAddress) -> Option<&str> {
        self.cells[addr.index()].as_deref()
    }

    /// Set the text of a cell
    ///
    /// Empty (or whitespace-only) text clears the cell.
    pub fn set<S: Into<String>>(&mut self, addr: CellAddress, text: S) {
        let text = text.into();
        self.cells[addr.index()] = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
    }

    /// Iterate over the rows of the table, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.cells.chunks(COLS)
    }

    /// Iterate over the non-empty cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, &str)> {
        CellAddress::all().filter_map(move |addr| self.get(addr).map(|text| (addr, text)))
    }

    /// Check whether every cell is empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

impl Default for CellTable {
    fn default() -> Self {
        Self::new()
    }
}
