//! Prelude module - common imports for gridcalc users
//!
//! ```rust
//! use gridcalc::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellAddress,
    CellTable,
    // Evaluation
    Context,
    // Error types
    Error,
    Expr,
    FormulaError,
    FunctionDef,
    FunctionRegistry,
    // Main types
    Grid,
    // Extension traits
    GridExt,
    ParserKind,
    Result,
};
