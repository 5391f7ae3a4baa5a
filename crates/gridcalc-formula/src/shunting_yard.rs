//! Shunting-yard formula parser
//!
//! An alternative front end to [`crate::parser`] that produces the same AST in two
//! stages: the token stream is reordered into postfix form with an operator stack,
//! then the tree is rebuilt from the postfix sequence with a value stack.
//!
//! Once reordered, a bare name can no longer be told apart from a call by looking at
//! the next token, so the parser asks a [`FunctionLookup`] which names are functions.
//! Every call carries the number of arguments it was written with, so multi-argument
//! calls are rebuilt with all of their arguments.

use crate::ast::{BinaryOperator, Expr};
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::FunctionLookup;
use crate::parser::{parse_cell_ref, parse_int_const};
use crate::scanner::{tokenize, Token, TokenKind};
use log::trace;
use std::fmt;

/// Parse an expression (without a leading `=`) with the shunting-yard algorithm
///
/// # Example
/// ```rust
/// use gridcalc_formula::{parse_shunting_yard, FunctionRegistry};
///
/// let functions = FunctionRegistry::new();
/// let ast = parse_shunting_yard("MAX(3,5)*2", &functions).unwrap();
/// assert_eq!(ast.to_string(), "(MAX(3,5)*2)");
/// ```
pub fn parse_shunting_yard<F: FunctionLookup + ?Sized>(
    formula: &str,
    functions: &F,
) -> FormulaResult<Expr> {
    let tokens = tokenize(formula)?;
    let postfix = to_postfix(&tokens, functions)?;
    trace!(
        "postfix for '{}': {}",
        formula,
        postfix
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    );
    build_tree(postfix)
}

/// One element of the postfix sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostfixItem {
    /// Integer literal, cell reference or variable name
    Operand(Token),
    /// Binary operator
    Operator(BinaryOperator),
    /// Function call consuming the `argc` values before it
    Call { name: String, argc: usize },
}

impl fmt::Display for PostfixItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostfixItem::Operand(token) => f.write_str(&token.lexeme),
            PostfixItem::Operator(op) => write!(f, "{}", op),
            PostfixItem::Call { name, argc } => write!(f, "{}/{}", name, argc),
        }
    }
}

/// Entries of the operator stack
#[derive(Debug)]
enum StackItem {
    Operator(BinaryOperator),
    LeftParen,
    /// A function whose `(` has been pushed above it; `commas` counts its top-level commas
    Function { name: String, commas: usize },
}

/// Stage 1: reorder an infix token stream into postfix order
///
/// Whitespace must already be filtered out. Tokens after the first
/// [`TokenKind::Eof`] are ignored.
pub fn to_postfix<F: FunctionLookup + ?Sized>(
    tokens: &[Token],
    functions: &F,
) -> FormulaResult<Vec<PostfixItem>> {
    let mut output = Vec::new();
    let mut operators: Vec<StackItem> = Vec::new();
    let mut previous: Option<TokenKind> = None;
    // Operands and operators must alternate; calls and parenthesized groups count as operands
    let mut expect_operand = true;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::IntConst | TokenKind::CellRef => {
                require_operand_position(expect_operand, token)?;
                output.push(PostfixItem::Operand(token.clone()));
                expect_operand = false;
            }

            TokenKind::Name => {
                require_operand_position(expect_operand, token)?;
                if functions.is_function(&token.lexeme) {
                    let next = tokens.get(i + 1).map(|t| t.kind);
                    if next != Some(TokenKind::LeftParen) {
                        let found = tokens
                            .get(i + 1)
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "end of input".to_string());
                        return Err(FormulaError::parse(
                            format!("'(' after function name '{}'", token.lexeme),
                            found,
                        ));
                    }
                    operators.push(StackItem::Function {
                        name: token.lexeme.clone(),
                        commas: 0,
                    });
                } else {
                    output.push(PostfixItem::Operand(token.clone()));
                    expect_operand = false;
                }
            }

            TokenKind::AddOp | TokenKind::MulOp => {
                if expect_operand {
                    return Err(FormulaError::Malformed(format!(
                        "missing operand before '{}'",
                        token.lexeme
                    )));
                }
                let op = BinaryOperator::from_symbol(&token.lexeme)
                    .ok_or_else(|| FormulaError::parse("an operator", token))?;

                // Pop operators of higher or equal precedence (left associativity)
                while let Some(StackItem::Operator(top)) = operators.last() {
                    if op.is_multiplicative() && !top.is_multiplicative() {
                        break;
                    }
                    output.push(PostfixItem::Operator(*top));
                    operators.pop();
                }
                operators.push(StackItem::Operator(op));
                expect_operand = true;
            }

            TokenKind::LeftParen => {
                require_operand_position(expect_operand, token)?;
                operators.push(StackItem::LeftParen);
                expect_operand = true;
            }

            TokenKind::RightParen => {
                let empty = previous == Some(TokenKind::LeftParen);
                if expect_operand && !empty {
                    return Err(FormulaError::Malformed("missing operand before ')'".into()));
                }

                pop_until_left_paren(&mut operators, &mut output)?;
                operators.pop();

                // The function (if any) goes right after its arguments
                if matches!(operators.last(), Some(StackItem::Function { .. })) {
                    if let Some(StackItem::Function { name, commas }) = operators.pop() {
                        let argc = if empty { 0 } else { commas + 1 };
                        output.push(PostfixItem::Call { name, argc });
                    }
                } else if empty {
                    return Err(FormulaError::Malformed("empty parentheses".into()));
                }
                expect_operand = false;
            }

            TokenKind::Comma => {
                if expect_operand {
                    return Err(FormulaError::Malformed("missing argument before ','".into()));
                }
                pop_until_left_paren(&mut operators, &mut output)?;
                // The item under the '(' must be the function the argument belongs to
                match operators.len().checked_sub(2).map(|i| &mut operators[i]) {
                    Some(StackItem::Function { commas, .. }) => *commas += 1,
                    _ => {
                        return Err(FormulaError::Malformed(
                            "',' outside of a function call".into(),
                        ))
                    }
                }
                expect_operand = true;
            }

            TokenKind::Eof => break,

            TokenKind::Range | TokenKind::Whitespace | TokenKind::CatchAll => {
                return Err(FormulaError::parse(
                    "an integer, a cell reference, a name, an operator, ',' or a parenthesis",
                    token,
                ));
            }
        }

        previous = Some(token.kind);
    }

    if expect_operand {
        return Err(FormulaError::Malformed("missing operand at end of input".into()));
    }

    // Drain remaining operators
    while let Some(item) = operators.pop() {
        match item {
            StackItem::Operator(op) => output.push(PostfixItem::Operator(op)),
            StackItem::LeftParen | StackItem::Function { .. } => {
                return Err(FormulaError::Malformed("unbalanced parenthesis".into()));
            }
        }
    }

    Ok(output)
}

fn require_operand_position(expect_operand: bool, token: &Token) -> FormulaResult<()> {
    if expect_operand {
        Ok(())
    } else {
        Err(FormulaError::Malformed(format!(
            "missing operator before {}",
            token
        )))
    }
}

/// Move operators to the output until a `(` is on top of the stack (left in place)
fn pop_until_left_paren(
    operators: &mut Vec<StackItem>,
    output: &mut Vec<PostfixItem>,
) -> FormulaResult<()> {
    loop {
        match operators.last() {
            Some(StackItem::LeftParen) => return Ok(()),
            Some(StackItem::Operator(op)) => {
                output.push(PostfixItem::Operator(*op));
                operators.pop();
            }
            Some(StackItem::Function { .. }) | None => {
                return Err(FormulaError::Malformed("unbalanced parenthesis".into()));
            }
        }
    }
}

/// Stage 2: rebuild the expression tree from a postfix sequence
pub fn build_tree(postfix: Vec<PostfixItem>) -> FormulaResult<Expr> {
    let mut stack: Vec<Expr> = Vec::new();

    for item in postfix {
        match item {
            PostfixItem::Operand(token) => {
                let leaf = match token.kind {
                    TokenKind::IntConst => parse_int_const(&token)?,
                    TokenKind::CellRef => parse_cell_ref(&token)?,
                    TokenKind::Name => Expr::Var(token.lexeme),
                    _ => return Err(FormulaError::parse("an operand", &token)),
                };
                stack.push(leaf);
            }
            PostfixItem::Operator(op) => {
                let right = pop_operand(&mut stack, op.symbol())?;
                let left = pop_operand(&mut stack, op.symbol())?;
                stack.push(Expr::binary(left, op, right));
            }
            PostfixItem::Call { name, argc } => {
                if stack.len() < argc {
                    return Err(FormulaError::Malformed(format!(
                        "missing argument in call to '{}'",
                        name
                    )));
                }
                let args = stack.split_off(stack.len() - argc);
                stack.push(Expr::Call { name, args });
            }
        }
    }

    let expr = stack
        .pop()
        .ok_or_else(|| FormulaError::Malformed("empty expression".into()))?;
    if !stack.is_empty() {
        return Err(FormulaError::Malformed(format!(
            "{} operands without an operator",
            stack.len() + 1
        )));
    }
    Ok(expr)
}

fn pop_operand(stack: &mut Vec<Expr>, operator: &str) -> FormulaResult<Expr> {
    stack
        .pop()
        .ok_or_else(|| FormulaError::Malformed(format!("missing operand for '{}'", operator)))
}
