//! The 16×16 formula grid
//!
//! Every cell holds an optional formula. Values are computed on demand, memoized in a
//! cache and the whole cache is dropped whenever any formula changes.
//!
//! # Example
//!
//! ```rust
//! use gridcalc::{CellAddress, Grid};
//!
//! let mut grid = Grid::new();
//! let a1 = CellAddress::parse("A1").unwrap();
//! let b1 = CellAddress::parse("B1").unwrap();
//! grid.set_cell(a1, "20").unwrap();
//! grid.set_cell(b1, "=A1*2+MAX(A1,3)").unwrap();
//! assert_eq!(grid.eval(b1).unwrap(), 60);
//! ```

use std::cell::RefCell;

use crate::cell::{cell_text, parse_cell_with, ParserKind};
use crate::error::{Error, Result};
use gridcalc_core::{CellAddress, CellTable, COLS, ROWS};
use gridcalc_formula::{
    evaluate_with, Context, Expr, FormulaError, FormulaResult, FunctionDef, FunctionRegistry,
    VisitedSet,
};
use log::{debug, trace};

/// Width of a rendered value
const DIGITS: usize = 3;

/// A grid of formulas with a memoized value cache
///
/// The cache is either empty or a valid memoization of the current formulas. It lives
/// in a [`RefCell`] so that evaluation only needs `&self`; a grid is therefore not
/// `Sync`.
#[derive(Debug)]
pub struct Grid {
    formulas: Vec<Option<Expr>>,
    values: RefCell<Vec<Option<i64>>>,
    functions: FunctionRegistry,
    parser: ParserKind,
}

impl Grid {
    /// Create an empty grid with the built-in functions
    pub fn new() -> Self {
        Self::with_functions(FunctionRegistry::new())
    }

    /// Create an empty grid with a custom function registry
    pub fn with_functions(functions: FunctionRegistry) -> Self {
        Self {
            formulas: vec![None; ROWS * COLS],
            values: RefCell::new(vec![None; ROWS * COLS]),
            functions,
            parser: ParserKind::default(),
        }
    }

    /// Use a different parser for [`Grid::set_cell`] and [`Grid::load_table`]
    pub fn with_parser(mut self, parser: ParserKind) -> Self {
        self.parser = parser;
        self
    }

    /// Build a grid from raw cell text with the built-in functions
    pub fn from_table(table: &CellTable) -> Result<Self> {
        let mut grid = Self::new();
        grid.load_table(table)?;
        Ok(grid)
    }

    /// Replace every formula with the parsed content of `table`
    ///
    /// Nothing changes unless every cell parses; the first failing cell is reported.
    pub fn load_table(&mut self, table: &CellTable) -> Result<()> {
        let mut formulas = vec![None; ROWS * COLS];
        for (addr, text) in table.iter() {
            let expr = parse_cell_with(text, self.parser, &self.functions)
                .map_err(|source| Error::InvalidCell {
                    address: addr,
                    source,
                })?;
            formulas[addr.index()] = expr;
        }

        debug!("loaded {} cells", formulas.iter().flatten().count());
        self.formulas = formulas;
        self.purge_values();
        Ok(())
    }

    /// The saved text of every cell
    pub fn to_table(&self) -> CellTable {
        let mut table = CellTable::new();
        for addr in CellAddress::all() {
            if let Some(text) = self.cell_text(addr) {
                table.set(addr, text);
            }
        }
        table
    }

    /// Register an additional function
    ///
    /// Cached values may depend on the replaced definition, so this purges.
    pub fn register_function(&mut self, def: FunctionDef) {
        self.functions.register(def);
        self.purge_values();
    }

    /// The formula stored in a cell
    pub fn formula(&self, addr: CellAddress) -> Option<&Expr> {
        self.formulas[addr.index()].as_ref()
    }

    /// The text a cell would be saved as
    pub fn cell_text(&self, addr: CellAddress) -> Option<String> {
        self.formula(addr).map(cell_text)
    }

    /// Store a formula and drop every cached value
    pub fn set_formula(&mut self, addr: CellAddress, formula: Option<Expr>) {
        self.formulas[addr.index()] = formula;
        self.purge_values();
    }

    /// Parse cell content and store it
    ///
    /// If the content does not parse the error is returned and the grid is left as it
    /// was, cache included.
    pub fn set_cell(&mut self, addr: CellAddress, text: &str) -> FormulaResult<()> {
        let formula = parse_cell_with(text, self.parser, &self.functions)?;
        self.set_formula(addr, formula);
        Ok(())
    }

    /// Empty a cell
    pub fn clear_cell(&mut self, addr: CellAddress) {
        self.set_formula(addr, None);
    }

    /// Drop every cached value
    pub fn purge_values(&self) {
        debug!("purging cached values");
        self.values.borrow_mut().fill(None);
    }

    /// The cached value of a cell, if it has been evaluated since the last purge
    pub fn cached_value(&self, addr: CellAddress) -> Option<i64> {
        self.values.borrow()[addr.index()]
    }

    /// Evaluate a cell
    pub fn eval(&self, addr: CellAddress) -> FormulaResult<i64> {
        self.eval_cell(addr, &VisitedSet::new())
    }

    /// Evaluate every non-empty cell in row-major order
    pub fn evaluate_all(&self) -> Vec<(CellAddress, FormulaResult<i64>)> {
        CellAddress::all()
            .filter(|&addr| self.formula(addr).is_some())
            .map(|addr| (addr, self.eval(addr)))
            .collect()
    }

    /// A cell's value as shown to a user
    ///
    /// Values are right-aligned, failures read `### <message>` and empty cells are
    /// blank.
    pub fn display_value(&self, addr: CellAddress) -> String {
        if self.formula(addr).is_none() {
            return " ".repeat(DIGITS);
        }
        match self.eval(addr) {
            Ok(value) => format!("{:>width$}", value, width = DIGITS),
            Err(e) => format!("### {}", e),
        }
    }

    /// Render the cached values, one line per row
    ///
    /// Empty cells and cells that have not been evaluated since the last purge are
    /// blank.
    pub fn render(&self) -> String {
        let values = self.values.borrow();
        values
            .chunks(COLS)
            .zip(self.formulas.chunks(COLS))
            .map(|(row, formulas)| {
                row.iter()
                    .zip(formulas)
                    .map(|(value, formula)| match (value, formula) {
                        (Some(v), Some(_)) => format!("{:>width$}", v, width = DIGITS),
                        _ => " ".repeat(DIGITS),
                    })
                    .collect::<Vec<_>>()
                    .join(" - ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cache(&self, addr: CellAddress, value: i64) {
        trace!("caching {} = {}", addr, value);
        self.values.borrow_mut()[addr.index()] = Some(value);
    }

    fn circular_reference(&self, expr: &Expr, visited: &VisitedSet) -> FormulaError {
        let chain = visited
            .iter()
            .filter_map(|addr| {
                self.formula(addr)
                    .map(|f| format!("{}: {}", addr, f.describe()))
            })
            .collect();
        FormulaError::CircularReference {
            formula: expr.to_string(),
            chain,
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Context for Grid {
    fn lookup_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    fn eval_cell(&self, addr: CellAddress, visited: &VisitedSet) -> FormulaResult<i64> {
        if let Some(value) = self.cached_value(addr) {
            return Ok(value);
        }

        let expr = match self.formula(addr) {
            Some(expr) => expr,
            None => {
                self.cache(addr, 0);
                return Ok(0);
            }
        };

        if visited.contains(addr) {
            return Err(self.circular_reference(expr, visited));
        }

        trace!("evaluating {} = {}", addr, expr);
        let value = evaluate_with(expr, self, &visited.with(addr))?;
        self.cache(addr, value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    fn grid(cells: &[(&str, &str)]) -> Grid {
        let mut grid = Grid::new();
        for (cell, text) in cells {
            grid.set_cell(addr(cell), text).unwrap();
        }
        grid
    }

    #[test]
    fn test_constant_and_references() {
        let grid = grid(&[("A1", "5"), ("A2", "=A1*3"), ("A3", "=A2-A1+Z")]);
        assert_eq!(grid.eval(addr("A1")).unwrap(), 5);
        assert_eq!(grid.eval(addr("A2")).unwrap(), 15);
        assert_eq!(grid.eval(addr("A3")).unwrap(), 10);
    }

    #[test]
    fn test_empty_cell_is_zero_and_cached() {
        let grid = grid(&[("A1", "=C7+1")]);
        assert_eq!(grid.eval(addr("A1")).unwrap(), 1);
        assert_eq!(grid.cached_value(addr("C7")), Some(0));
        assert_eq!(grid.cached_value(addr("A1")), Some(1));
    }

    #[test]
    fn test_self_reference_is_circular() {
        let grid = grid(&[("B2", "=B2+1")]);
        let err = grid.eval(addr("B2")).unwrap_err();
        match err {
            FormulaError::CircularReference { formula, chain } => {
                assert_eq!(formula, "(B2+1)");
                assert_eq!(chain, vec!["B2: (B2 + 1)".to_string()]);
            }
            other => panic!("expected circular reference, got {:?}", other),
        }
        assert_eq!(grid.cached_value(addr("B2")), None);
    }

    #[test]
    fn test_failing_cell_keeps_other_cache_entries() {
        let grid = grid(&[("A1", "4"), ("A2", "=A1/0"), ("A3", "=A1+1")]);
        assert_eq!(grid.eval(addr("A3")).unwrap(), 5);
        assert_eq!(grid.eval(addr("A2")), Err(FormulaError::DivisionByZero));
        assert_eq!(grid.cached_value(addr("A1")), Some(4));
        assert_eq!(grid.cached_value(addr("A3")), Some(5));
        assert_eq!(grid.cached_value(addr("A2")), None);
    }

    #[test]
    fn test_set_cell_purges() {
        let mut grid = grid(&[("A1", "1"), ("B1", "=A1+1")]);
        assert_eq!(grid.eval(addr("B1")).unwrap(), 2);
        grid.set_cell(addr("A1"), "10").unwrap();
        assert_eq!(grid.cached_value(addr("B1")), None);
        assert_eq!(grid.eval(addr("B1")).unwrap(), 11);
    }

    #[test]
    fn test_rejected_edit_changes_nothing() {
        let mut grid = grid(&[("A1", "1"), ("B1", "=A1+1")]);
        assert_eq!(grid.eval(addr("B1")).unwrap(), 2);

        assert!(grid.set_cell(addr("A1"), "=1+").is_err());
        assert_eq!(grid.formula(addr("A1")), Some(&Expr::Const(1)));
        assert_eq!(grid.cached_value(addr("B1")), Some(2));
    }

    #[test]
    fn test_table_round_trip() {
        let grid = grid(&[("A1", "-3"), ("B1", "=a1*(2+MAX(A1,4))"), ("P16", "=7")]);
        let table = grid.to_table();
        assert_eq!(table.get(addr("A1")), Some("-3"));
        assert_eq!(table.get(addr("B1")), Some("=(A1*(2+MAX(A1,4)))"));
        assert_eq!(table.get(addr("P16")), Some("7"));

        let back = Grid::from_table(&table).unwrap();
        assert_eq!(back.to_table(), table);
        assert_eq!(back.eval(addr("B1")).unwrap(), -18);
    }

    #[test]
    fn test_from_table_reports_failing_cell() {
        let mut table = CellTable::new();
        table.set(addr("A1"), "1");
        table.set(addr("C4"), "=1+*2");

        match Grid::from_table(&table) {
            Err(Error::InvalidCell { address, .. }) => assert_eq!(address, addr("C4")),
            other => panic!("expected invalid cell, got {:?}", other),
        }
    }

    #[test]
    fn test_display_value() {
        let grid = grid(&[("A1", "7"), ("A2", "=1/0")]);
        assert_eq!(grid.display_value(addr("A1")), "  7");
        assert_eq!(grid.display_value(addr("A2")), "### Division by zero");
        assert_eq!(grid.display_value(addr("A3")), "   ");
    }

    #[test]
    fn test_render_shows_cached_values() {
        let grid = grid(&[("A1", "7"), ("B1", "=A1*2")]);
        assert_eq!(grid.render().lines().next().unwrap().trim(), "");

        grid.evaluate_all();
        let first = grid.render().lines().next().unwrap().to_string();
        assert!(first.starts_with("  7 -  14 -     - "));
        assert_eq!(grid.render().lines().count(), ROWS);
    }

    #[test]
    fn test_render_leaves_referenced_empty_cells_blank() {
        let grid = grid(&[("A1", "=C1+1")]);
        grid.evaluate_all();
        assert_eq!(grid.cached_value(addr("C1")), Some(0));

        let first = grid.render().lines().next().unwrap().to_string();
        let fields: Vec<&str> = first.split(" - ").collect();
        assert_eq!(fields.len(), COLS);
        assert_eq!(fields[0], "  1");
        assert_eq!(fields[2], "   ");
        assert_eq!(fields[2], grid.display_value(addr("C1")));
    }

    #[test]
    fn test_register_function_purges() {
        let mut grid = grid(&[("A1", "=DOUBLE(4)")]);
        assert_eq!(grid.eval(addr("A1")), Err(FormulaError::UnknownFunction("DOUBLE".into())));

        grid.set_cell(addr("B1"), "5").unwrap();
        assert_eq!(grid.eval(addr("B1")).unwrap(), 5);
        grid.register_function(FunctionDef::new("DOUBLE", 1, Some(1), |args| {
            args[0].checked_mul(2).ok_or(FormulaError::Overflow)
        }));
        assert_eq!(grid.cached_value(addr("B1")), None);
        assert_eq!(grid.eval(addr("A1")).unwrap(), 8);
    }

    #[test]
    fn test_shunting_yard_grid() {
        let mut grid = Grid::new().with_parser(ParserKind::ShuntingYard);
        grid.set_cell(addr("A1"), "=MAX(3,5)+SUM(1,2,3)").unwrap();
        assert_eq!(grid.eval(addr("A1")).unwrap(), 11);
    }
}
