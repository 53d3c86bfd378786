/// A single lexical token with its raw source text and starting column.
///
/// `position` is the 1-indexed column of the token's first character in the
/// query string, used for error carets.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }
}

/// Token kinds produced by the lexer.
///
/// The lexer never fails: anything it cannot classify comes out as
/// [`TokenKind::Unrecognized`] and is rejected by the parser with a
/// positioned error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Stage keywords
    /// `filter` stage keyword
    Filter,

    /// `sort` stage keyword
    Sort,

    /// `group` stage keyword
    Group,

    /// `map` stage keyword
    Map,

    // Punctuation
    /// Stage separator (`|`)
    ///
    /// Only a standalone pipe separates stages; a pipe glued to identifier
    /// characters is part of the identifier (see [`TokenKind::Identifier`]).
    Pipe,

    /// Left parenthesis for function calls and grouping
    LParen,

    /// Right parenthesis
    RParen,

    /// Left bracket for array literals
    LBracket,

    /// Right bracket
    RBracket,

    /// Comma separating arguments or array elements
    Comma,

    // Operators
    /// Equality check operator (`=`)
    ///
    /// Doubles as the assignment operator in `map` stages.
    Equals,

    /// Greater-than check operator (`>`)
    GreaterThan,

    /// Containment check operator (word `contains`)
    Contains,

    /// Addition (`+`)
    Plus,

    /// Subtraction or numeric negation (`-`)
    Minus,

    /// Multiplication (`*`)
    Star,

    /// Division (`/`)
    Slash,

    /// Presence check (word `exists`)
    Exists,

    /// Absence check (`!exists`)
    NotExists,

    // Literals
    /// Integer literal
    ///
    /// The raw digits are kept as text; numbers are only parsed (as 64-bit
    /// floats) at evaluation time.
    Integer,

    /// Floating-point literal, raw text preserved like [`TokenKind::Integer`]
    Float,

    /// Double-quoted string literal (text holds the unquoted content)
    String,

    /// Single-quoted char literal (text holds the unquoted content)
    Char,

    /// Identifier: field name, function name, or field reference
    ///
    /// Starts with a letter or `_`; continues over alphanumerics, `_`, and
    /// `|`. A leading `.` is kept in the text so the parser can tell field
    /// references (`.price`) from bare names (`price`).
    Identifier,

    /// Boolean literal (`true` or `false`, distinguished by text)
    Boolean,

    /// Null literal
    Null,

    /// End of input
    Eof,

    /// Anything the lexer could not classify
    Unrecognized,
}
