//! Total ordering over runtime values.
//!
//! Sorting, group keying, min/max, and equality checks all funnel through
//! [`compare`]. The rules form a total order over scalars and over arrays;
//! the only incomparable pairing is a scalar against an array.
//!
//! Scalar comparison cascades over coercion axes, dispatching on the first
//! axis both sides support:
//!
//! 1. **number** - numbers, numeric-looking strings, booleans as 0/1
//! 2. **text** - strings, numbers and booleans rendered
//! 3. **bool** - plain booleans
//! 4. **null** - null orders below every non-null scalar
//!
//! Small reorderings of this cascade change results silently, so the exact
//! order is pinned by the test matrix in `tests/compare_tests.rs`.

use std::cmp::Ordering;

use crate::value::Value;

/// Outcome of comparing two runtime values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lesser,
    Equal,
    Greater,
    /// Reserved for scalar-vs-array pairings
    Incomparable,
}

impl Comparison {
    /// Collapse into a std `Ordering` for use with sort routines, treating
    /// `Incomparable` as equal so sorting stays stable.
    pub fn as_ordering(self) -> Ordering {
        match self {
            Comparison::Lesser => Ordering::Less,
            Comparison::Equal | Comparison::Incomparable => Ordering::Equal,
            Comparison::Greater => Ordering::Greater,
        }
    }
}

fn from_ordering(ord: Ordering) -> Comparison {
    match ord {
        Ordering::Less => Comparison::Lesser,
        Ordering::Equal => Comparison::Equal,
        Ordering::Greater => Comparison::Greater,
    }
}

/// Compare two runtime values.
///
/// `Missing` takes part only so the comparator is total; stage code applies
/// the explicit absence rules (missing sorts first, binary checks fail)
/// before values reach this point. Inside the comparator it orders like
/// null.
pub fn compare(a: &Value, b: &Value) -> Comparison {
    match (a.is_array(), b.is_array()) {
        (true, true) => compare_arrays(a, b),
        (true, false) | (false, true) => Comparison::Incomparable,
        (false, false) => compare_scalars(a, b),
    }
}

fn compare_scalars(a: &Value, b: &Value) -> Comparison {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return from_ordering(x.partial_cmp(&y).unwrap_or(Ordering::Equal));
    }

    if let (Some(x), Some(y)) = (a.as_text(), b.as_text()) {
        return from_ordering(x.cmp(&y));
    }

    if let (Some(x), Some(y)) = (a.as_bool(), b.as_bool()) {
        return from_ordering(x.cmp(&y));
    }

    // Null axis: null (and missing) sorts below every non-null scalar.
    let a_null = matches!(a, Value::Null | Value::Missing);
    let b_null = matches!(b, Value::Null | Value::Missing);
    match (a_null, b_null) {
        (true, true) => Comparison::Equal,
        (true, false) => Comparison::Lesser,
        (false, true) => Comparison::Greater,
        // Unreachable for well-formed scalars: every non-null scalar
        // coerces on at least one earlier axis.
        (false, false) => Comparison::Equal,
    }
}

// Arrays order by length; element-wise lexicographic comparison breaks
// length ties, with element pairs recursing through the full comparator.
fn compare_arrays(a: &Value, b: &Value) -> Comparison {
    let (Value::Array(xs), Value::Array(ys)) = (a, b) else {
        return Comparison::Incomparable;
    };

    if xs.len() != ys.len() {
        return from_ordering(xs.len().cmp(&ys.len()));
    }

    for (x, y) in xs.iter().zip(ys.iter()) {
        match compare(x, y) {
            Comparison::Equal => continue,
            other => return other,
        }
    }
    Comparison::Equal
}
