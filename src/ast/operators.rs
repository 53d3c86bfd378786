use std::fmt;

/// Binary check operators usable in `filter` stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOp {
    /// Equality (`=`)
    Equal,
    /// Greater than (`>`)
    Greater,
    /// Substring or array membership (`contains`)
    Contains,
}

impl fmt::Display for CheckOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOp::Equal => write!(f, "="),
            CheckOp::Greater => write!(f, ">"),
            CheckOp::Contains => write!(f, "contains"),
        }
    }
}

/// Unary check operators usable in `filter` stages.
///
/// These are the only checks that distinguish an absent field from a
/// `null`-valued one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Field is present (`exists`)
    Exists,
    /// Field is absent (`!exists`)
    NotExists,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Exists => write!(f, "exists"),
            UnaryOp::NotExists => write!(f, "!exists"),
        }
    }
}

/// Arithmetic operators usable inside expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithOp::Add => write!(f, "+"),
            ArithOp::Subtract => write!(f, "-"),
            ArithOp::Multiply => write!(f, "*"),
            ArithOp::Divide => write!(f, "/"),
        }
    }
}
