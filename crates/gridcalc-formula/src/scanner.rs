//! Formula scanner
//!
//! Splits formula text into tokens by repeatedly matching the head of the remaining
//! input against one anchored pattern per token kind. Kinds are tried in a fixed
//! priority order and the first match wins, so `B12` becomes a cell reference rather
//! than a name and `MAX` a name rather than a cell reference.

use crate::error::{FormulaError, FormulaResult};
use lazy_regex::{lazy_regex, Lazy};
use regex::Regex;
use std::fmt;

static MUL_OP: Lazy<Regex> = lazy_regex!(r"^(\*|/)");
static ADD_OP: Lazy<Regex> = lazy_regex!(r"^(\+|-)");
static COMMA: Lazy<Regex> = lazy_regex!(r"^,");
static LEFT_PAREN: Lazy<Regex> = lazy_regex!(r"^\(");
static RIGHT_PAREN: Lazy<Regex> = lazy_regex!(r"^\)");
static RANGE: Lazy<Regex> = lazy_regex!(r"^:");
static CELL_REF: Lazy<Regex> = lazy_regex!(r"^[A-Pa-p]1?[0-9]");
static INT_CONST: Lazy<Regex> = lazy_regex!(r"^[0-9]+");
static NAME: Lazy<Regex> = lazy_regex!(r"^[A-Za-z0-9_]+");
static WHITESPACE: Lazy<Regex> = lazy_regex!(r"^\s");
static CATCH_ALL: Lazy<Regex> = lazy_regex!(r"^.*");

/// Token kinds, in match priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `*` or `/`
    MulOp,
    /// `+` or `-`
    AddOp,
    Comma,
    LeftParen,
    RightParen,
    /// `:` (reserved, not used by either parser)
    Range,
    /// One letter A-P followed by 1 or 2 digits
    CellRef,
    IntConst,
    /// Word characters: variable or function name
    Name,
    Whitespace,
    /// Anything no other pattern accepts
    CatchAll,
    Eof,
}

impl TokenKind {
    /// All kinds that carry a pattern, in match priority order
    pub const PRIORITY: [TokenKind; 11] = [
        TokenKind::MulOp,
        TokenKind::AddOp,
        TokenKind::Comma,
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::Range,
        TokenKind::CellRef,
        TokenKind::IntConst,
        TokenKind::Name,
        TokenKind::Whitespace,
        TokenKind::CatchAll,
    ];

    /// Anchored pattern for this kind (`None` for [`TokenKind::Eof`])
    pub fn pattern(self) -> Option<&'static Regex> {
        let pattern: &'static Lazy<Regex> = match self {
            TokenKind::MulOp => &MUL_OP,
            TokenKind::AddOp => &ADD_OP,
            TokenKind::Comma => &COMMA,
            TokenKind::LeftParen => &LEFT_PAREN,
            TokenKind::RightParen => &RIGHT_PAREN,
            TokenKind::Range => &RANGE,
            TokenKind::CellRef => &CELL_REF,
            TokenKind::IntConst => &INT_CONST,
            TokenKind::Name => &NAME,
            TokenKind::Whitespace => &WHITESPACE,
            TokenKind::CatchAll => &CATCH_ALL,
            TokenKind::Eof => return None,
        };
        Some(Lazy::force(pattern))
    }

    /// Human-readable description, used in parse errors
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::MulOp => "'*' or '/'",
            TokenKind::AddOp => "'+' or '-'",
            TokenKind::Comma => "','",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Range => "':'",
            TokenKind::CellRef => "a cell reference",
            TokenKind::IntConst => "an integer",
            TokenKind::Name => "a name",
            TokenKind::Whitespace => "whitespace",
            TokenKind::CatchAll => "unrecognized input",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A classified piece of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The matched input text (empty for [`TokenKind::Eof`])
    pub lexeme: String,
}

impl Token {
    /// Create a new token
    pub fn new<S: Into<String>>(kind: TokenKind, lexeme: S) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
        }
    }

    /// The end-of-input token
    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            kind => write!(f, "'{}' ({})", self.lexeme, kind.describe()),
        }
    }
}

/// Scan formula text into tokens
///
/// The returned sequence always ends with a single [`TokenKind::Eof`] token and
/// still contains whitespace tokens; see [`tokenize`] for the parser-ready form.
pub fn scan(input: &str) -> FormulaResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    'scanning: while pos < input.len() {
        let rest = &input[pos..];

        for kind in TokenKind::PRIORITY {
            let Some(pattern) = kind.pattern() else {
                continue;
            };
            // Empty matches would never advance
            if let Some(m) = pattern.find(rest).filter(|m| m.end() > 0) {
                tokens.push(Token::new(kind, m.as_str()));
                pos += m.end();
                continue 'scanning;
            }
        }

        return Err(FormulaError::Scan {
            position: pos,
            input: rest.to_string(),
        });
    }

    tokens.push(Token::eof());
    Ok(tokens)
}

/// Scan formula text and drop whitespace tokens
pub fn tokenize(input: &str) -> FormulaResult<Vec<Token>> {
    let mut tokens = scan(input)?;
    tokens.retain(|t| t.kind != TokenKind::Whitespace);
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        scan(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_scan_operators_and_delimiters() {
        use TokenKind::*;
        assert_eq!(
            kinds("*/+-,():"),
            vec![MulOp, MulOp, AddOp, AddOp, Comma, LeftParen, RightParen, Range, Eof]
        );
    }

    #[test]
    fn test_scan_keeps_lexemes() {
        let tokens = scan("12+b3").unwrap();
        let lexemes: Vec<_> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["12", "+", "b3", ""]);
    }

    #[test]
    fn test_cell_ref_wins_over_name() {
        use TokenKind::*;
        assert_eq!(kinds("A1"), vec![CellRef, Eof]);
        assert_eq!(kinds("p16"), vec![CellRef, Eof]);
        // Column letters stop at P
        assert_eq!(kinds("Q1"), vec![Name, Eof]);
        // Three digits: the reference takes two, the rest is a number
        assert_eq!(kinds("A123"), vec![CellRef, IntConst, Eof]);
    }

    #[test]
    fn test_name_tokens() {
        use TokenKind::*;
        assert_eq!(kinds("MAX"), vec![Name, Eof]);
        assert_eq!(kinds("var_1"), vec![Name, Eof]);
        assert_eq!(kinds("max(3,5)"), vec![Name, LeftParen, IntConst, Comma, IntConst, RightParen, Eof]);
    }

    #[test]
    fn test_whitespace_is_scanned_then_filtered() {
        use TokenKind::*;
        assert_eq!(kinds("1 + 2"), vec![IntConst, Whitespace, AddOp, Whitespace, IntConst, Eof]);

        let tokens: Vec<_> = tokenize(" 1 +\t2 ").unwrap().into_iter().map(|t| t.kind).collect();
        assert_eq!(tokens, vec![IntConst, AddOp, IntConst, Eof]);
    }

    #[test]
    fn test_catch_all_swallows_rest_of_line() {
        let tokens = scan("1+#oops 2").unwrap();
        assert_eq!(tokens[2], Token::new(TokenKind::CatchAll, "#oops 2"));
        assert_eq!(tokens[3], Token::eof());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(scan("").unwrap(), vec![Token::eof()]);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::new(TokenKind::AddOp, "+").to_string(), "'+' ('+' or '-')");
        assert_eq!(Token::eof().to_string(), "end of input");
    }
}
