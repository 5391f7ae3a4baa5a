//! # gridcalc-core
//!
//! Core data structures for the gridcalc formula grid.
//!
//! This crate provides the fundamental types used throughout gridcalc:
//! - [`CellAddress`] - A cell location inside the fixed 16×16 grid
//! - [`CellTable`] - The raw text of every cell, as loaded from or saved to disk
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{CellAddress, CellTable};
//!
//! let mut table = CellTable::new();
//! let b2 = CellAddress::parse("B2").unwrap();
//! table.set(b2, "=A1*2");
//! assert_eq!(table.get(b2), Some("=A1*2"));
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{CellAddress, CellTable};
pub use error::{Error, Result};

/// Number of rows in the grid
pub const ROWS: usize = 16;

/// Number of columns in the grid (A-P)
pub const COLS: usize = 16;
