use std::fmt;

use crate::ast::ArithOp;

/// Scalar literal kinds.
///
/// Numeric literals keep their raw source text until evaluation, at which
/// point they are parsed as 64-bit floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
    Bool,
    Null,
}

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Expressions appear on the right-hand side of filter checks and map
/// assignments. They are created once by the parser and read-only afterward.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Scalar literal with its raw source text
    ///
    /// # Examples
    /// ```text
    /// "active"
    /// 3.14
    /// true
    /// null
    /// ```
    Scalar { kind: ScalarKind, literal: String },

    /// Field reference (always written with a leading dot)
    ///
    /// Resolves to the sentinel `Missing` value when the document lacks the
    /// field; that is not an error.
    ///
    /// # Examples
    /// ```text
    /// .price
    /// .user_id
    /// ```
    FieldRef(String),

    /// Builtin function call
    ///
    /// Only the name's existence is validated at parse time; arity and
    /// argument types are checked at evaluation.
    ///
    /// # Examples
    /// ```text
    /// pow(.a, 2)
    /// regex("^GET", .request)
    /// ```
    Function { name: String, args: Vec<Expr> },

    /// Array literal
    ///
    /// # Example
    /// ```text
    /// [1, 2, .threshold]
    /// ```
    Array(Vec<Expr>),

    /// Arithmetic binary operation
    Binary {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Scalar { kind, literal } => match kind {
                ScalarKind::String => write!(f, "\"{}\"", literal),
                _ => write!(f, "{}", literal),
            },
            Expr::FieldRef(field) => write!(f, ".{}", field),
            Expr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Array(elements) => {
                write!(f, "[")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, "]")
            }
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
