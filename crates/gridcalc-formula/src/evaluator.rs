//! Formula evaluator
//!
//! Evaluates formula ASTs to integers against a [`Context`].

use crate::ast::{BinaryOperator, Expr};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::{FunctionDef, FunctionRegistry};
use gridcalc_core::CellAddress;
use std::collections::HashMap;

/// Capabilities an expression needs from its surroundings
///
/// The defaults describe an empty world: every variable is 0, no function exists and
/// every cell evaluates to 0.
pub trait Context {
    /// Resolve a variable name
    ///
    /// Unknown names resolve to 0; this is a policy of the context, not an error.
    fn lookup_variable(&self, _name: &str) -> i64 {
        0
    }

    /// Resolve a function name
    fn lookup_function(&self, _name: &str) -> Option<&FunctionDef> {
        None
    }

    /// Evaluate a referenced cell
    ///
    /// `visited` holds the cells whose formulas are on the current evaluation path.
    fn eval_cell(&self, _addr: CellAddress, _visited: &VisitedSet) -> FormulaResult<i64> {
        Ok(0)
    }
}

/// The part of a [`Context`] the shunting-yard parser needs
///
/// A bare name can only be told apart from a function call by asking which names
/// are registered functions, so that parser depends on this lookup.
pub trait FunctionLookup {
    /// Check whether `name` is a registered function
    fn is_function(&self, name: &str) -> bool;
}

impl<C: Context + ?Sized> FunctionLookup for C {
    fn is_function(&self, name: &str) -> bool {
        self.lookup_function(name).is_some()
    }
}

impl Context for FunctionRegistry {
    fn lookup_function(&self, name: &str) -> Option<&FunctionDef> {
        self.get(name)
    }
}

/// Cells whose formulas are on the current evaluation path
///
/// Extending the set returns a new set and leaves the original untouched, so sibling
/// branches of an expression each see only their own ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet {
    path: Vec<CellAddress>,
}

impl VisitedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a cell is on the path
    pub fn contains(&self, addr: CellAddress) -> bool {
        self.path.contains(&addr)
    }

    /// A copy of this set with `addr` appended
    pub fn with(&self, addr: CellAddress) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(addr);
        Self { path }
    }

    /// Cells in the order they were entered
    pub fn iter(&self) -> impl Iterator<Item = CellAddress> + '_ {
        self.path.iter().copied()
    }

    /// Number of cells on the path
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Check whether the path is empty
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Context for evaluating standalone expressions
///
/// Holds a fixed variable table and a function registry. Cell references evaluate to 0.
#[derive(Debug, Default)]
pub struct EvaluationContext {
    variables: HashMap<String, i64>,
    functions: FunctionRegistry,
}

impl EvaluationContext {
    /// Create a context with the given functions and no variables
    pub fn new(functions: FunctionRegistry) -> Self {
        Self {
            variables: HashMap::new(),
            functions,
        }
    }

    /// Create a context with the built-in functions and no variables
    pub fn simple() -> Self {
        Self::new(FunctionRegistry::new())
    }

    /// Create the calculator context: built-in functions plus `var`, `a` and `b`
    pub fn calculator() -> Self {
        Self::simple()
            .with_variable("var", 42)
            .with_variable("a", 5)
            .with_variable("b", 8)
    }

    /// Builder-style variable assignment
    pub fn with_variable<S: Into<String>>(mut self, name: S, value: i64) -> Self {
        self.set_variable(name, value);
        self
    }

    /// Set a variable (names are case-sensitive)
    pub fn set_variable<S: Into<String>>(&mut self, name: S, value: i64) {
        self.variables.insert(name.into(), value);
    }

    /// Mutable access to the function registry
    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }
}

impl Context for EvaluationContext {
    fn lookup_variable(&self, name: &str) -> i64 {
        self.variables.get(name).copied().unwrap_or(0)
    }

    fn lookup_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }
}

/// Evaluate a formula expression, starting with an empty visited set
pub fn evaluate<C: Context + ?Sized>(expr: &Expr, ctx: &C) -> FormulaResult<i64> {
    evaluate_with(expr, ctx, &VisitedSet::new())
}

/// Evaluate a formula expression with the given cells already on the path
pub fn evaluate_with<C: Context + ?Sized>(
    expr: &Expr,
    ctx: &C,
    visited: &VisitedSet,
) -> FormulaResult<i64> {
    match expr {
        Expr::Const(n) => Ok(*n),
        Expr::Var(name) => Ok(ctx.lookup_variable(name)),
        Expr::CellRef(addr) => ctx.eval_cell(*addr, visited),
        Expr::BinaryOp { op, left, right } => {
            // Both operands see the same snapshot of the path
            let l = evaluate_with(left, ctx, visited)?;
            let r = evaluate_with(right, ctx, visited)?;
            apply_binary_op(*op, l, r)
        }
        Expr::Call { name, args } => evaluate_call(name, args, ctx, visited),
    }
}

/// Apply an integer operator
///
/// Division truncates toward zero.
pub fn apply_binary_op(op: BinaryOperator, l: i64, r: i64) -> FormulaResult<i64> {
    let result = match op {
        BinaryOperator::Add => l.checked_add(r),
        BinaryOperator::Subtract => l.checked_sub(r),
        BinaryOperator::Multiply => l.checked_mul(r),
        BinaryOperator::Divide => {
            if r == 0 {
                return Err(FormulaError::DivisionByZero);
            }
            l.checked_div(r)
        }
    };
    result.ok_or(FormulaError::Overflow)
}

fn evaluate_call<C: Context + ?Sized>(
    name: &str,
    args: &[Expr],
    ctx: &C,
    visited: &VisitedSet,
) -> FormulaResult<i64> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(evaluate_with(arg, ctx, visited)?);
    }

    let func = ctx
        .lookup_function(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;
    func.call(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use std::cell::Cell;
    use std::rc::Rc;

    fn eval(formula: &str) -> FormulaResult<i64> {
        let ast = parse(formula)?;
        evaluate(&ast, &EvaluationContext::calculator())
    }

    #[test]
    fn test_evaluate_constant() {
        for n in [0, 1, 42, i64::MAX] {
            assert_eq!(evaluate(&Expr::Const(n), &EvaluationContext::simple()).unwrap(), n);
        }
    }

    #[test]
    fn test_evaluate_arithmetic() {
        assert_eq!(eval("1+2").unwrap(), 3);
        assert_eq!(eval("10-3").unwrap(), 7);
        assert_eq!(eval("4*5").unwrap(), 20);
        assert_eq!(eval("20/4").unwrap(), 5);
    }

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(eval("1+2*3").unwrap(), 7);
        assert_eq!(eval("(1+2)*3").unwrap(), 9);
        assert_eq!(eval("2+3*4-5").unwrap(), 9);
        assert_eq!(eval("8-3-2").unwrap(), 3);
        assert_eq!(eval("64/4/2").unwrap(), 8);
    }

    #[test]
    fn test_integer_division_truncates() {
        assert_eq!(eval("7/2").unwrap(), 3);
        assert_eq!(eval("(0-7)/2").unwrap(), -3);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("5/0"), Err(FormulaError::DivisionByZero));
        assert_eq!(eval("5/(2-2)"), Err(FormulaError::DivisionByZero));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(eval("9223372036854775807+1"), Err(FormulaError::Overflow));
        assert_eq!(eval("9223372036854775807*2"), Err(FormulaError::Overflow));
    }

    #[test]
    fn test_variables() {
        assert_eq!(eval("var").unwrap(), 42);
        assert_eq!(eval("a*b").unwrap(), 40);
        // Unknown names resolve to 0
        assert_eq!(eval("nobody+1").unwrap(), 1);
    }

    #[test]
    fn test_functions() {
        assert_eq!(eval("MAX(3,5)").unwrap(), 5);
        assert_eq!(eval("max(a,b)+min(1,2,0)").unwrap(), 8);
        assert_eq!(eval("SUM()").unwrap(), 0);
        assert_eq!(eval("ABS(2-9)").unwrap(), 7);
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            eval("NOPE(1)"),
            Err(FormulaError::UnknownFunction("NOPE".into()))
        );
    }

    #[test]
    fn test_arguments_evaluated_left_to_right() {
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut ctx = EvaluationContext::simple();
        let seen = Rc::clone(&order);
        ctx.functions_mut()
            .register(FunctionDef::new("TAP", 1, Some(1), move |args| {
                seen.borrow_mut().push(args[0]);
                Ok(args[0])
            }));
        let ast = parse("SUM(TAP(1),TAP(2),TAP(3))").unwrap();
        assert_eq!(evaluate(&ast, &ctx).unwrap(), 6);
        assert_eq!(*order.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_default_context_cells_are_zero() {
        let ast = parse("A1+B2+1").unwrap();
        assert_eq!(evaluate(&ast, &EvaluationContext::simple()).unwrap(), 1);
    }

    /// Records the visited set it sees for every cell reference
    struct RecordingContext {
        seen: std::cell::RefCell<Vec<VisitedSet>>,
        calls: Cell<usize>,
    }

    impl Context for RecordingContext {
        fn eval_cell(&self, addr: CellAddress, visited: &VisitedSet) -> FormulaResult<i64> {
            self.calls.set(self.calls.get() + 1);
            self.seen.borrow_mut().push(visited.clone());
            Ok(addr.row() as i64)
        }
    }

    #[test]
    fn test_operands_share_visited_snapshot() {
        let ctx = RecordingContext {
            seen: Default::default(),
            calls: Cell::new(0),
        };
        let c5 = CellAddress::parse("C5").unwrap();
        let visited = VisitedSet::new().with(c5);

        let ast = parse("A2+A3").unwrap();
        assert_eq!(evaluate_with(&ast, &ctx, &visited).unwrap(), 3);
        assert_eq!(ctx.calls.get(), 2);
        assert!(ctx.seen.borrow().iter().all(|v| *v == visited));
    }

    #[test]
    fn test_visited_set_is_copy_on_extend() {
        let a1 = CellAddress::parse("A1").unwrap();
        let b1 = CellAddress::parse("B1").unwrap();

        let root = VisitedSet::new();
        let left = root.with(a1);
        let right = root.with(b1);
        let deeper = left.with(b1);

        assert!(root.is_empty());
        assert!(left.contains(a1) && !left.contains(b1));
        assert!(right.contains(b1) && !right.contains(a1));
        assert_eq!(deeper.iter().collect::<Vec<_>>(), vec![a1, b1]);
        assert_eq!(deeper.len(), 2);
    }

    #[test]
    fn test_registry_as_context() {
        let registry = FunctionRegistry::new();
        assert!(registry.is_function("max"));
        assert!(!registry.is_function("a"));

        let ast = parse("MAX(a,2)").unwrap();
        assert_eq!(evaluate(&ast, &registry).unwrap(), 2);
    }
}
