//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellTable`] - The raw text content of every cell, as persisted

mod address;
mod table;

pub use address::CellAddress;
pub use table::CellTable;
