//! Lazy pull-based execution of parsed pipelines.
//!
//! Each stage wraps its upstream behind the same [`Stream`] contract and is
//! driven by the consumer calling `next()`. Composition is strictly
//! sequential and single-threaded: stage *i+1* only pulls from stage *i*.
//! Filter and map are lazy; sort and group must fully drain their upstream
//! before yielding anything, so their memory use is bounded by the input
//! size rather than streamed. That trade-off is accepted, not accidental.
//!
//! Every `execute` call owns its own stage chain and buffers; nothing here
//! is shared across queries.

use std::cmp::Ordering;

use crate::aggregate::Aggregator;
use crate::ast::{BinaryCheck, CheckOp, FieldAssignment, Stage, UnaryCheck, UnaryOp};
use crate::compare::{Comparison, compare};
use crate::evaluator::{EvalError, Evaluator};
use crate::functions::FunctionRegistry;
use crate::parser::{ParseError, parse};
use crate::table::Table;
use crate::value::{Datum, Value};

/// A pull-based, single-pass sequence of documents.
///
/// `Ok(None)` is the normal end-of-stream signal, distinct from every error.
pub trait Stream {
    fn next(&mut self) -> Result<Option<Datum>, EvalError>;
}

/// Stream over an in-memory document slice.
pub struct VecStream {
    items: std::vec::IntoIter<Datum>,
}

impl VecStream {
    pub fn new(datums: Vec<Datum>) -> Self {
        VecStream {
            items: datums.into_iter(),
        }
    }
}

impl Stream for VecStream {
    fn next(&mut self) -> Result<Option<Datum>, EvalError> {
        Ok(self.items.next())
    }
}

/// Thread a document stream through each stage in order.
///
/// Construction is cheap and infallible; all work (and all errors) surface
/// through the returned stream's `next()` calls.
pub fn execute<'a>(
    mut stream: Box<dyn Stream + 'a>,
    stages: &'a [Stage],
    registry: &'a FunctionRegistry,
) -> Box<dyn Stream + 'a> {
    for stage in stages {
        stream = match stage {
            Stage::Filter {
                binary_checks,
                unary_checks,
            } => Box::new(FilterStream {
                upstream: stream,
                binary_checks,
                unary_checks,
                evaluator: Evaluator::new(registry),
            }),
            Stage::Sort { field, descending } => Box::new(SortStream {
                upstream: Some(stream),
                field,
                descending: *descending,
                sorted: Vec::new().into_iter(),
            }),
            Stage::Group {
                group_by_field,
                aggregate_field,
                func,
            } => Box::new(GroupStream {
                upstream: Some(stream),
                group_by_field: group_by_field.as_deref(),
                aggregate_field,
                func: *func,
                output: Vec::new().into_iter(),
            }),
            Stage::Map { assignments } => Box::new(MapStream {
                upstream: stream,
                assignments,
                evaluator: Evaluator::new(registry),
            }),
        };
    }
    stream
}

/// Wrapped error surfaced to callers of [`find`], separating parse-time
/// failures (with their rendered caret diagram) from execution failures.
#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Execute(EvalError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "unable to parse: {}", e),
            Error::Execute(e) => write!(f, "failed to execute: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Execute(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Error::Execute(e)
    }
}

/// Run a query against an in-memory document set and collect the result.
///
/// This is the single entry point surrounding components call: it parses
/// the query, threads the documents through the pipeline, and drains the
/// final stream.
///
/// # Examples
///
/// ```
/// use breeze_lang::find;
///
/// let datums = vec![
///     serde_json::json!({"a": 1}).as_object().unwrap().clone(),
///     serde_json::json!({"a": 2}).as_object().unwrap().clone(),
/// ];
/// let result = find("filter a > 1", datums).unwrap();
/// assert_eq!(result.len(), 1);
/// ```
pub fn find(query: &str, datums: Vec<Datum>) -> Result<Vec<Datum>, Error> {
    let registry = FunctionRegistry::new();
    let stages = parse(query, &registry)?;

    let source: Box<dyn Stream> = Box::new(VecStream::new(datums));
    let mut stream = execute(source, &stages, &registry);

    let mut results = Vec::new();
    while let Some(datum) = stream.next()? {
        results.push(datum);
    }
    Ok(results)
}

fn field_value(datum: &Datum, field: &str) -> Value {
    datum
        .get(field)
        .map(Value::from_json)
        .unwrap_or(Value::Missing)
}

/// Lazy stage: a document passes only if every check holds. Binary checks
/// against a missing field are false, never errors.
struct FilterStream<'a> {
    upstream: Box<dyn Stream + 'a>,
    binary_checks: &'a [BinaryCheck],
    unary_checks: &'a [UnaryCheck],
    evaluator: Evaluator<'a>,
}

impl FilterStream<'_> {
    fn passes(&self, datum: &Datum) -> Result<bool, EvalError> {
        for check in self.unary_checks {
            let present = datum.contains_key(&check.field);
            let ok = match check.op {
                UnaryOp::Exists => present,
                UnaryOp::NotExists => !present,
            };
            if !ok {
                return Ok(false);
            }
        }

        for check in self.binary_checks {
            let actual = field_value(datum, &check.field);
            if matches!(actual, Value::Missing) {
                return Ok(false);
            }
            let expected = self.evaluator.evaluate(&check.expr, datum)?;
            let ok = match check.op {
                CheckOp::Equal => compare(&actual, &expected) == Comparison::Equal,
                CheckOp::Greater => compare(&actual, &expected) == Comparison::Greater,
                CheckOp::Contains => contains(&actual, &expected),
            };
            if !ok {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl Stream for FilterStream<'_> {
    fn next(&mut self) -> Result<Option<Datum>, EvalError> {
        loop {
            let Some(datum) = self.upstream.next()? else {
                return Ok(None);
            };
            if self.passes(&datum)? {
                return Ok(Some(datum));
            }
        }
    }
}

// Substring test for strings, comparator-equality membership for arrays.
fn contains(haystack: &Value, needle: &Value) -> bool {
    match haystack {
        Value::String(s) => needle.as_text().map(|n| s.contains(&n)).unwrap_or(false),
        Value::Array(items) => items
            .iter()
            .any(|item| compare(item, needle) == Comparison::Equal),
        _ => false,
    }
}

/// Materializing stage: drains upstream, stable-sorts on one field, then
/// re-exposes the buffer. Documents missing the field sort ahead of every
/// present value; `descending` reverses the comparison but never that rule.
struct SortStream<'a> {
    upstream: Option<Box<dyn Stream + 'a>>,
    field: &'a str,
    descending: bool,
    sorted: std::vec::IntoIter<Datum>,
}

impl Stream for SortStream<'_> {
    fn next(&mut self) -> Result<Option<Datum>, EvalError> {
        if let Some(mut upstream) = self.upstream.take() {
            let mut buffer = Vec::new();
            while let Some(datum) = upstream.next()? {
                buffer.push(datum);
            }

            let field = self.field;
            let descending = self.descending;
            buffer.sort_by(|x, y| {
                let a = field_value(x, field);
                let b = field_value(y, field);
                match (
                    matches!(a, Value::Missing),
                    matches!(b, Value::Missing),
                ) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (false, false) => {
                        let ord = compare(&a, &b).as_ordering();
                        if descending { ord.reverse() } else { ord }
                    }
                }
            });

            self.sorted = buffer.into_iter();
        }
        Ok(self.sorted.next())
    }
}

/// Materializing stage: partitions upstream into groups (or one group when
/// no `by` field is set), reduces each through a fresh aggregator, and
/// emits one `{aggregate_field: result}` document per group in multimap key
/// order.
struct GroupStream<'a> {
    upstream: Option<Box<dyn Stream + 'a>>,
    group_by_field: Option<&'a str>,
    aggregate_field: &'a str,
    func: crate::aggregate::AggFunc,
    output: std::vec::IntoIter<Datum>,
}

impl GroupStream<'_> {
    fn result_datum(&self, value: Value) -> Datum {
        let mut datum = Datum::new();
        datum.insert(self.aggregate_field.to_string(), value.to_json());
        datum
    }
}

impl Stream for GroupStream<'_> {
    fn next(&mut self) -> Result<Option<Datum>, EvalError> {
        if let Some(mut upstream) = self.upstream.take() {
            let output = match self.group_by_field {
                // One group over the whole input: always emits exactly one
                // document, even for empty input.
                None => {
                    let mut aggregator = self.func.aggregator();
                    while let Some(datum) = upstream.next()? {
                        if let Some(value) = datum.get(self.aggregate_field) {
                            aggregator.ingest(&Value::from_json(value));
                        }
                    }
                    vec![self.result_datum(aggregator.aggregate())]
                }
                Some(by) => {
                    let func = self.func;
                    let mut groups: Table<Box<dyn Aggregator>> = Table::new();
                    while let Some(datum) = upstream.next()? {
                        // Documents missing the group key, missing the
                        // aggregate field, or keyed by a non-keyable shape
                        // are silently dropped.
                        let Some(key) = datum.get(by) else { continue };
                        let key = Value::from_json(key);
                        let Some(value) = datum.get(self.aggregate_field) else {
                            continue;
                        };
                        let value = Value::from_json(value);
                        let Some(aggregator) = groups.entry_or(&key, || func.aggregator())
                        else {
                            continue;
                        };
                        aggregator.ingest(&value);
                    }

                    let mut output = Vec::new();
                    for key in groups.keys() {
                        if let Some(aggregator) = groups.get(&key) {
                            output.push(self.result_datum(aggregator.aggregate()));
                        }
                    }
                    output
                }
            };
            self.output = output.into_iter();
        }
        Ok(self.output.next())
    }
}

/// Lazy stage: applies each assignment in order, mutating the document in
/// place. Structural evaluator errors abort the stream; embedded type-error
/// strings are ordinary values and do not.
struct MapStream<'a> {
    upstream: Box<dyn Stream + 'a>,
    assignments: &'a [FieldAssignment],
    evaluator: Evaluator<'a>,
}

impl Stream for MapStream<'_> {
    fn next(&mut self) -> Result<Option<Datum>, EvalError> {
        let Some(mut datum) = self.upstream.next()? else {
            return Ok(None);
        };
        for assignment in self.assignments {
            let value = self.evaluator.evaluate(&assignment.assignment, &datum)?;
            datum.insert(assignment.field.clone(), value.to_json());
        }
        Ok(Some(datum))
    }
}
