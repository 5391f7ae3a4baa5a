//! # gridcalc
//!
//! A 16×16 integer formula grid.
//!
//! Cells hold integers or formulas over integers, cell references (`A1`..`P16`),
//! variables and function calls. Values are evaluated on demand, memoized until the
//! next edit, and circular references are reported instead of recursing forever.
//!
//! ## Features
//!
//! - Two interchangeable formula parsers (recursive descent and shunting-yard)
//! - Canonical formula text for every parsed formula
//! - Memoized evaluation with cycle detection
//! - Loading and saving the `;`-separated grid layout
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut grid = Grid::new();
//! let a1: CellAddress = "A1".parse().unwrap();
//! let a2: CellAddress = "A2".parse().unwrap();
//!
//! grid.set_cell(a1, "6").unwrap();
//! grid.set_cell(a2, "=A1*7").unwrap();
//! assert_eq!(grid.eval(a2).unwrap(), 42);
//!
//! // Save to file
//! // grid.save("grid.csv").unwrap();
//! ```

pub mod cell;
pub mod error;
pub mod grid;
pub mod prelude;

pub use cell::{cell_text, parse_cell, parse_cell_with, ParserKind};
pub use error::{Error, Result};
pub use grid::Grid;

// Re-export core types
pub use gridcalc_core::{CellAddress, CellTable, COLS, ROWS};

// Re-export formula types
pub use gridcalc_formula::{
    evaluate, parse, parse_shunting_yard, BinaryOperator, Context, EvaluationContext, Expr,
    FormulaError, FormulaResult, FunctionDef, FunctionRegistry, VisitedSet,
};

// Re-export I/O types
pub use gridcalc_csv::{CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};

use std::path::Path;

/// Extension trait for Grid to add file I/O
pub trait GridExt: Sized {
    /// Open a grid from a file
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Save the grid to a file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl GridExt for Grid {
    fn open<P: AsRef<Path>>(path: P) -> Result<Grid> {
        let path = path.as_ref();
        match file_format(path).as_deref() {
            Some("csv") => {
                let table = CsvReader::read_file(path, &CsvReadOptions::default())?;
                Grid::from_table(&table)
            }
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match file_format(path).as_deref() {
            Some("csv") => {
                CsvWriter::write_file(&self.to_table(), path, &CsvWriteOptions::default())?;
                Ok(())
            }
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn file_format(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
