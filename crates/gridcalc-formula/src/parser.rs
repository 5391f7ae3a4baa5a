//! Formula parser
//!
//! A recursive descent parser over the scanner's token stream:
//!
//! ```text
//! expr   := term (addop term)*
//! term   := factor (mulop factor)*
//! factor := INTCONST | CELLREF | call | '(' expr ')'
//! call   := NAME ['(' (expr (',' expr)*)? ')']
//! ```
//!
//! Both binary levels are left-associative. A name followed by `(` is a function
//! call, any other name is a variable.

use crate::ast::{BinaryOperator, Expr};
use crate::error::{FormulaError, FormulaResult};
use crate::scanner::{tokenize, Token, TokenKind};
use gridcalc_core::CellAddress;

/// Parse an expression (without a leading `=`) into an AST
///
/// # Example
/// ```rust
/// use gridcalc_formula::parse;
///
/// let ast = parse("1+2*3").unwrap();
/// assert_eq!(ast.to_string(), "(1+(2*3))");
/// ```
pub fn parse(formula: &str) -> FormulaResult<Expr> {
    let tokens = tokenize(formula)?;
    let mut parser = FormulaParser::new(tokens);
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    parser.expect(TokenKind::Eof)?;

    Ok(expr)
}

/// Recursive descent parser state
struct FormulaParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl FormulaParser {
    fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            tokens.push(Token::eof());
        }
        Self { tokens, pos: 0 }
    }

    // === Token access ===

    fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek(&self) -> TokenKind {
        self.current_token().kind
    }

    fn consume(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        // Eof is sticky
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: TokenKind) -> FormulaResult<Token> {
        if self.peek() == expected {
            Ok(self.consume())
        } else {
            Err(FormulaError::parse(expected.describe(), self.current_token()))
        }
    }

    // === Grammar ===

    fn parse_expression(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_term()?;

        while self.peek() == TokenKind::AddOp {
            let op = self.parse_operator()?;
            let right = self.parse_term()?;
            left = Expr::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_factor()?;

        while self.peek() == TokenKind::MulOp {
            let op = self.parse_operator()?;
            let right = self.parse_factor()?;
            left = Expr::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> FormulaResult<Expr> {
        match self.peek() {
            TokenKind::IntConst => {
                let token = self.consume();
                parse_int_const(&token)
            }
            TokenKind::CellRef => {
                let token = self.consume();
                parse_cell_ref(&token)
            }
            TokenKind::Name => self.parse_call(),
            TokenKind::LeftParen => {
                self.consume();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                Ok(expr)
            }
            _ => Err(FormulaError::parse(
                "an integer, a cell reference, a name or '('",
                self.current_token(),
            )),
        }
    }

    fn parse_call(&mut self) -> FormulaResult<Expr> {
        let name = self.expect(TokenKind::Name)?.lexeme;

        if self.peek() != TokenKind::LeftParen {
            return Ok(Expr::Var(name));
        }
        self.consume();

        let mut args = Vec::new();

        if self.peek() != TokenKind::RightParen {
            args.push(self.parse_expression()?);

            while self.peek() != TokenKind::RightParen {
                if self.peek() != TokenKind::Comma {
                    return Err(FormulaError::parse("',' or ')'", self.current_token()));
                }
                self.consume();
                args.push(self.parse_expression()?);
            }
        }

        self.expect(TokenKind::RightParen)?;

        Ok(Expr::Call { name, args })
    }

    fn parse_operator(&mut self) -> FormulaResult<BinaryOperator> {
        let token = self.consume();
        BinaryOperator::from_symbol(&token.lexeme)
            .ok_or_else(|| FormulaError::parse("an operator", &token))
    }
}

/// Build a constant leaf from an integer token
pub(crate) fn parse_int_const(token: &Token) -> FormulaResult<Expr> {
    token
        .lexeme
        .parse::<i64>()
        .map(Expr::Const)
        .map_err(|_| FormulaError::parse("an integer that fits in 64 bits", token))
}

/// Build a cell reference leaf from a cell reference token
pub(crate) fn parse_cell_ref(token: &Token) -> FormulaResult<Expr> {
    CellAddress::parse(&token.lexeme)
        .map(Expr::CellRef)
        .map_err(|e| FormulaError::InvalidReference(format!("'{}': {}", token.lexeme, e)))
}
