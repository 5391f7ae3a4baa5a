//! # gridcalc-formula
//!
//! Formula scanner, parsers and evaluator for gridcalc.
//!
//! This crate provides:
//! - Scanning (text → tokens)
//! - Two interchangeable parsers (tokens → AST): recursive descent and shunting-yard
//! - Replication (AST → canonical formula text)
//! - Evaluation (AST → integer) against a [`Context`]
//! - A registry of built-in integer functions
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_formula::{evaluate, parse, EvaluationContext};
//!
//! let ast = parse("MAX(a, 2) * 3").unwrap();
//! let ctx = EvaluationContext::simple().with_variable("a", 4);
//! assert_eq!(evaluate(&ast, &ctx).unwrap(), 12);
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod scanner;
pub mod shunting_yard;

pub use ast::{BinaryOperator, Expr};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{
    evaluate, evaluate_with, Context, EvaluationContext, FunctionLookup, VisitedSet,
};
pub use functions::{FunctionDef, FunctionRegistry};
pub use parser::parse;
pub use scanner::{scan, tokenize, Token, TokenKind};
pub use shunting_yard::parse_shunting_yard;
