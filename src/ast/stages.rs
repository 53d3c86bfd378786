use std::fmt;

use crate::aggregate::AggFunc;
use crate::ast::{CheckOp, Expr, UnaryOp};

/// One pipeline operation.
///
/// A parsed query is an ordered sequence of stages; each stage is immutable
/// once parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep only documents passing every check
    ///
    /// Both check vectors are always allocated; a filter with zero checks
    /// passes every document through unchanged.
    ///
    /// # Example
    /// ```text
    /// filter status = "active" retries exists
    /// ```
    Filter {
        binary_checks: Vec<BinaryCheck>,
        unary_checks: Vec<UnaryCheck>,
    },

    /// Stable sort on one field
    ///
    /// Documents missing the field sort ahead of all present values, in
    /// either direction.
    ///
    /// # Example
    /// ```text
    /// sort latency desc
    /// ```
    Sort { field: String, descending: bool },

    /// Reduce groups of documents to one aggregated value each
    ///
    /// Without a `by` field the whole input forms a single group.
    ///
    /// # Example
    /// ```text
    /// group avg latency by endpoint
    /// ```
    Group {
        group_by_field: Option<String>,
        aggregate_field: String,
        func: AggFunc,
    },

    /// Assign computed values to fields, in order, mutating each document
    ///
    /// # Example
    /// ```text
    /// map total = .price * .quantity
    /// ```
    Map { assignments: Vec<FieldAssignment> },
}

/// A `field op expr` condition inside a filter stage.
///
/// Evaluates to false (not an error) when the field is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryCheck {
    pub field: String,
    pub op: CheckOp,
    pub expr: Expr,
}

/// A `field exists` / `field !exists` condition inside a filter stage.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryCheck {
    pub field: String,
    pub op: UnaryOp,
}

/// One `field = expr` assignment inside a map stage.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAssignment {
    pub field: String,
    pub assignment: Expr,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Filter {
                binary_checks,
                unary_checks,
            } => {
                write!(f, "filter")?;
                for check in unary_checks {
                    write!(f, " {} {}", check.field, check.op)?;
                }
                for check in binary_checks {
                    write!(f, " {} {} {}", check.field, check.op, check.expr)?;
                }
                Ok(())
            }
            Stage::Sort { field, descending } => {
                if *descending {
                    write!(f, "sort {} desc", field)
                } else {
                    write!(f, "sort {}", field)
                }
            }
            Stage::Group {
                group_by_field,
                aggregate_field,
                func,
            } => {
                write!(f, "group {} {}", func, aggregate_field)?;
                if let Some(by) = group_by_field {
                    write!(f, " by {}", by)?;
                }
                Ok(())
            }
            Stage::Map { assignments } => {
                write!(f, "map")?;
                for a in assignments {
                    write!(f, " {} = {}", a.field, a.assignment)?;
                }
                Ok(())
            }
        }
    }
}
