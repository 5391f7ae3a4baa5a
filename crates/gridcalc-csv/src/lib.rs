//! # gridcalc-csv
//!
//! Reader and writer for the persisted grid layout: one line per row, cells separated
//! by `;`, each cell empty, a bare integer or `=` followed by formula text.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
