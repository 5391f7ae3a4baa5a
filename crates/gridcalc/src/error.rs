//! Error types for grid operations

use gridcalc_core::CellAddress;
use gridcalc_csv::CsvError;
use gridcalc_formula::FormulaError;
use thiserror::Error;

/// Result type for grid operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, editing or saving a grid
#[derive(Debug, Error)]
pub enum Error {
    /// Cell addressing error
    #[error(transparent)]
    Core(#[from] gridcalc_core::Error),

    /// Formula error
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// Grid file error
    #[error(transparent)]
    Csv(#[from] CsvError),

    /// A cell's content could not be parsed
    #[error("Invalid content in cell {address}: {source}")]
    InvalidCell {
        address: CellAddress,
        source: FormulaError,
    },

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}
