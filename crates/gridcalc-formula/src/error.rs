//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula scanning, parsing or evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// No token pattern matches the remaining input
    #[error("Scan error at offset {position}: unrecognized input '{input}'")]
    Scan { position: usize, input: String },

    /// Structural grammar violation
    #[error("Parse error: expected {expected}, but found {found}")]
    Parse { expected: String, found: String },

    /// Operator/operand structure that cannot form a single expression
    #[error("Malformed expression: {0}")]
    Malformed(String),

    /// Cell reference outside the grid
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Integer overflow
    #[error("Arithmetic overflow")]
    Overflow,

    /// A formula was reached again while it was still being evaluated
    #[error("Circular evaluation during evaluation of {formula} : {}", .chain.join(","))]
    CircularReference { formula: String, chain: Vec<String> },
}

impl FormulaError {
    /// Build a parse error from an expectation and the offending token description
    pub fn parse<E: Into<String>, F: ToString>(expected: E, found: F) -> Self {
        FormulaError::Parse {
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}
