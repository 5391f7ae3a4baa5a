//! Cell content parsing
//!
//! A cell holds nothing, an integer literal (`42`, `-7`) or a formula (`=A1+B2`).

use gridcalc_formula::{
    parse, parse_shunting_yard, Expr, FormulaError, FormulaResult, FunctionLookup,
    FunctionRegistry,
};

/// Which parser turns formula text into an AST
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParserKind {
    /// Recursive descent (the default)
    #[default]
    RecursiveDescent,
    /// Shunting-yard; needs to know which names are functions
    ShuntingYard,
}

impl ParserKind {
    /// Parse formula text (without the leading `=`)
    pub fn parse<F: FunctionLookup + ?Sized>(
        self,
        formula: &str,
        functions: &F,
    ) -> FormulaResult<Expr> {
        match self {
            ParserKind::RecursiveDescent => parse(formula),
            ParserKind::ShuntingYard => parse_shunting_yard(formula, functions),
        }
    }
}

/// Parse the content of a cell with the recursive-descent parser
///
/// Returns `None` for an empty cell.
///
/// # Example
/// ```rust
/// use gridcalc::{parse_cell, Expr};
///
/// assert_eq!(parse_cell("").unwrap(), None);
/// assert_eq!(parse_cell("42").unwrap(), Some(Expr::Const(42)));
/// assert_eq!(parse_cell("=1+2").unwrap().unwrap().to_string(), "(1+2)");
/// ```
pub fn parse_cell(text: &str) -> FormulaResult<Option<Expr>> {
    parse_cell_with(text, ParserKind::RecursiveDescent, &FunctionRegistry::empty())
}

/// Parse the content of a cell with a chosen parser
pub fn parse_cell_with<F: FunctionLookup + ?Sized>(
    text: &str,
    parser: ParserKind,
    functions: &F,
) -> FormulaResult<Option<Expr>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    if let Some(formula) = text.strip_prefix('=') {
        return parser.parse(formula, functions).map(Some);
    }

    text.parse::<i64>()
        .map(|n| Some(Expr::Const(n)))
        .map_err(|_| {
            FormulaError::parse(
                "an integer or a formula starting with '='",
                format!("'{}'", text),
            )
        })
}

/// The text a cell is saved as
///
/// Constants are written as plain integers, everything else as `=` followed by the
/// replicated formula.
pub fn cell_text(expr: &Expr) -> String {
    match expr {
        Expr::Const(n) => n.to_string(),
        other => format!("={}", other),
    }
}
