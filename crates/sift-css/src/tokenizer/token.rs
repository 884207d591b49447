//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! "The output of the tokenization step is a stream of zero or more of the
//! following tokens: `<ident-token>`, `<function-token>`, `<at-keyword-token>`,
//! `<hash-token>`, `<string-token>`, `<bad-string-token>`, `<url-token>`,
//! `<bad-url-token>`, `<delim-token>`, `<number-token>`, `<percentage-token>`,
//! `<dimension-token>`, `<unicode-range-token>`, `<whitespace-token>`,
//! `<CDO-token>`, `<CDC-token>`, `<colon-token>`, `<semicolon-token>`,
//! `<comma-token>`, `<[-token>`, `<]-token>`, `<(-token>`, `<)-token>`, `<{-token>`,
//! and `<}-token>`."
//!
//! Tokens keep their byte span so that values can be recovered exactly as
//! authored.

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<number-token>` has a type flag set to either 'integer' or 'number'."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    /// "integer" - the number is an integer
    Integer,
    /// "number" - the number has a decimal point or exponent
    Number,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// The token kinds of CSS Syntax Level 3. String payloads are the decoded
/// values (escapes resolved, quotes removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssToken {
    /// "`<ident-token>`"
    Ident(String),
    /// "`<function-token>`", the name without the `(`.
    Function(String),
    /// "`<at-keyword-token>`", the name without the `@`.
    AtKeyword(String),
    /// "`<hash-token>`"
    Hash {
        /// The value after `#`.
        value: String,
        /// "type flag set to 'id'" when the value is a valid identifier.
        is_id: bool,
    },
    /// "`<string-token>`"
    String(String),
    /// "`<bad-string-token>`" "represents a parsing error"
    BadString,
    /// "`<url-token>`"
    Url(String),
    /// "`<bad-url-token>`"
    BadUrl,
    /// "`<delim-token>`"
    Delim(char),
    /// "`<number-token>`"
    Number(NumericType),
    /// "`<percentage-token>`"
    Percentage,
    /// "`<dimension-token>`"
    Dimension {
        /// "a unit"
        unit: String,
    },
    /// "`<whitespace-token>`"
    Whitespace,
    /// "`<CDO-token>`" (`<!--`)
    Cdo,
    /// "`<CDC-token>`" (`-->`)
    Cdc,
    /// "`<colon-token>`"
    Colon,
    /// "`<semicolon-token>`"
    Semicolon,
    /// "`<comma-token>`"
    Comma,
    /// "`<[-token>`"
    LeftBracket,
    /// "`<]-token>`"
    RightBracket,
    /// "`<(-token>`"
    LeftParen,
    /// "`<)-token>`"
    RightParen,
    /// "`<{-token>`"
    LeftBrace,
    /// "`<}-token>`"
    RightBrace,
    /// End of input.
    Eof,
}

/// A token and the byte range of the source it was consumed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was read.
    pub kind: CssToken,
    /// Byte offset of the first code point.
    pub start: usize,
    /// Byte offset one past the last code point.
    pub end: usize,
}

impl Token {
    /// Whether this is the end-of-input marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, CssToken::Eof)
    }
}
