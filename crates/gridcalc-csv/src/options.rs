//! CSV options

/// Options for reading grid files
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter (default: semicolon)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Trim surrounding whitespace from every field
    pub trim: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            quote: b'"',
            trim: true,
        }
    }
}

/// Options for writing grid files
#[derive(Debug, Clone)]
pub struct CsvWriteOptions {
    /// Field delimiter (default: semicolon)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Line terminator
    pub line_terminator: LineTerminator,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            quote: b'"',
            line_terminator: LineTerminator::LF,
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
}
