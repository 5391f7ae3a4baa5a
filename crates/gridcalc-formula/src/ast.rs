//! Formula Abstract Syntax Tree types

use gridcalc_core::CellAddress;
use std::fmt;

/// Formula expression AST
///
/// Nodes are immutable once built. [`fmt::Display`] produces the canonical formula
/// text ("replication"), which both parsers accept again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer literal
    Const(i64),
    /// Named variable, resolved by the evaluation context
    Var(String),
    /// Single cell reference
    CellRef(CellAddress),
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Function call
    Call { name: String, args: Vec<Expr> },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    /// Operator from its source symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Subtract),
            "*" => Some(BinaryOperator::Multiply),
            "/" => Some(BinaryOperator::Divide),
            _ => None,
        }
    }

    /// Source symbol
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        }
    }

    /// `*` and `/` bind tighter than `+` and `-`
    pub fn is_multiplicative(self) -> bool {
        matches!(self, BinaryOperator::Multiply | BinaryOperator::Divide)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Expr {
    /// Build a binary operation node
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build a function call node
    pub fn call<S: Into<String>>(name: S, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    /// Build a variable node
    pub fn var<S: Into<String>>(name: S) -> Self {
        Expr::Var(name.into())
    }

    /// Write the canonical formula text of this expression
    ///
    /// Binary operations are fully parenthesized, so the text does not depend on
    /// operator precedence when it is parsed again. The grammar has no unary minus,
    /// so a negative constant is written as a subtraction from zero.
    pub fn replicate_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        match self {
            // The magnitude of i64::MIN is not a valid literal
            Expr::Const(i64::MIN) => write!(out, "((0-{})-1)", i64::MAX),
            Expr::Const(n) if *n < 0 => write!(out, "(0-{})", n.unsigned_abs()),
            Expr::Const(n) => write!(out, "{}", n),
            Expr::Var(name) => out.write_str(name),
            Expr::CellRef(addr) => write!(out, "{}", addr),
            Expr::BinaryOp { op, left, right } => {
                out.write_char('(')?;
                left.replicate_to(out)?;
                out.write_str(op.symbol())?;
                right.replicate_to(out)?;
                out.write_char(')')
            }
            Expr::Call { name, args } => {
                out.write_str(name)?;
                out.write_char('(')?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.write_char(',')?;
                    }
                    arg.replicate_to(out)?;
                }
                out.write_char(')')
            }
        }
    }

    /// Spaced-out debug rendering, e.g. `(A1 + (MAX(1,2)))`
    ///
    /// Used in diagnostics; not meant to be parsed again.
    pub fn describe(&self) -> String {
        match self {
            Expr::Const(n) => n.to_string(),
            Expr::Var(name) => name.clone(),
            Expr::CellRef(addr) => addr.to_string(),
            Expr::BinaryOp { op, left, right } => {
                format!("({} {} {})", left.describe(), op, right.describe())
            }
            Expr::Call { name, args } => {
                let args: Vec<_> = args.iter().map(Expr::describe).collect();
                format!("({}({}))", name, args.join(","))
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.replicate_to(f)
    }
}
