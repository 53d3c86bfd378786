//! Aggregation functions for the `group` stage.
//!
//! Each aggregator is a small state machine: `ingest` is called once per
//! non-missing field value in stream order, `aggregate` once when the group
//! closes. A fresh instance is created per group, so no state leaks across
//! groups or queries.

use std::fmt;

use crate::compare::{Comparison, compare};
use crate::table::Table;
use crate::value::Value;

/// The aggregation functions a `group` stage can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFunc {
    Sum,
    Avg,
    Count,
    Min,
    Max,
    Mode,
    StdDev,
}

impl AggFunc {
    /// Look up a function by its query-text name.
    pub fn from_name(name: &str) -> Option<AggFunc> {
        match name {
            "sum" => Some(AggFunc::Sum),
            "avg" => Some(AggFunc::Avg),
            "count" => Some(AggFunc::Count),
            "min" => Some(AggFunc::Min),
            "max" => Some(AggFunc::Max),
            "mode" => Some(AggFunc::Mode),
            "stddev" => Some(AggFunc::StdDev),
            _ => None,
        }
    }

    /// Build a fresh aggregator instance for one group.
    pub fn aggregator(&self) -> Box<dyn Aggregator> {
        match self {
            AggFunc::Sum => Box::new(Sum::default()),
            AggFunc::Avg => Box::new(Avg::default()),
            AggFunc::Count => Box::new(Count::default()),
            AggFunc::Min => Box::new(Extremum::min()),
            AggFunc::Max => Box::new(Extremum::max()),
            AggFunc::Mode => Box::new(Mode::default()),
            AggFunc::StdDev => Box::new(StdDev::default()),
        }
    }
}

impl fmt::Display for AggFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggFunc::Sum => "sum",
            AggFunc::Avg => "avg",
            AggFunc::Count => "count",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
            AggFunc::Mode => "mode",
            AggFunc::StdDev => "stddev",
        };
        write!(f, "{}", name)
    }
}

/// One `group` reduction: ingest values in stream order, then produce the
/// group's single output value.
pub trait Aggregator {
    fn ingest(&mut self, value: &Value);
    fn aggregate(&self) -> Value;
}

/// Numbers add, booleans OR together. A group mixing both returns whichever
/// type contributed more values; ties favor numeric. Other types are
/// ignored, and empty input sums to 0.
#[derive(Default)]
struct Sum {
    number_sum: f64,
    number_count: usize,
    bool_or: bool,
    bool_count: usize,
}

impl Aggregator for Sum {
    fn ingest(&mut self, value: &Value) {
        match value {
            Value::Number(n) => {
                self.number_sum += n;
                self.number_count += 1;
            }
            Value::Boolean(b) => {
                self.bool_or |= b;
                self.bool_count += 1;
            }
            _ => {}
        }
    }

    fn aggregate(&self) -> Value {
        if self.bool_count > self.number_count {
            Value::Boolean(self.bool_or)
        } else {
            Value::Number(self.number_sum)
        }
    }
}

/// Mean of numeric values, booleans counting as 0/1; 0 on empty input.
#[derive(Default)]
struct Avg {
    sum: f64,
    count: usize,
}

impl Aggregator for Avg {
    fn ingest(&mut self, value: &Value) {
        match value {
            Value::Number(n) => {
                self.sum += n;
                self.count += 1;
            }
            Value::Boolean(b) => {
                self.sum += if *b { 1.0 } else { 0.0 };
                self.count += 1;
            }
            _ => {}
        }
    }

    fn aggregate(&self) -> Value {
        if self.count == 0 {
            Value::Number(0.0)
        } else {
            Value::Number(self.sum / self.count as f64)
        }
    }
}

/// Count of ingested values regardless of type.
#[derive(Default)]
struct Count {
    count: usize,
}

impl Aggregator for Count {
    fn ingest(&mut self, _value: &Value) {
        self.count += 1;
    }

    fn aggregate(&self) -> Value {
        Value::Number(self.count as f64)
    }
}

/// Comparator-driven min/max; null on empty input. Incomparable candidates
/// (scalar against array) leave the current extremum in place.
struct Extremum {
    keep: Comparison,
    best: Option<Value>,
}

impl Extremum {
    fn min() -> Self {
        Extremum {
            keep: Comparison::Lesser,
            best: None,
        }
    }

    fn max() -> Self {
        Extremum {
            keep: Comparison::Greater,
            best: None,
        }
    }
}

impl Aggregator for Extremum {
    fn ingest(&mut self, value: &Value) {
        match &self.best {
            None => self.best = Some(value.clone()),
            Some(current) => {
                if compare(value, current) == self.keep {
                    self.best = Some(value.clone());
                }
            }
        }
    }

    fn aggregate(&self) -> Value {
        self.best.clone().unwrap_or(Value::Null)
    }
}

/// Most frequent value, counted through the typed multimap. Ties break to
/// the first key in multimap enumeration order, which is deterministic given
/// insertion-ordered shape storage. Null on empty input.
#[derive(Default)]
struct Mode {
    counts: Table<usize>,
}

impl Aggregator for Mode {
    fn ingest(&mut self, value: &Value) {
        if let Some(count) = self.counts.entry_or(value, || 0) {
            *count += 1;
        }
    }

    fn aggregate(&self) -> Value {
        let mut best: Option<(Value, usize)> = None;
        for key in self.counts.keys() {
            let count = *self.counts.get(&key).unwrap_or(&0);
            // Strict > keeps the earliest max-frequency key.
            if best.as_ref().is_none_or(|(_, n)| count > *n) {
                best = Some((key, count));
            }
        }
        best.map(|(v, _)| v).unwrap_or(Value::Null)
    }
}

/// Population standard deviation over numeric values via Welford's online
/// algorithm: a running mean and sum of squared deviations, no second pass.
/// Fewer than two numeric samples yields the display string `"NaN"` so the
/// result stays embeddable in output documents.
#[derive(Default)]
struct StdDev {
    count: usize,
    mean: f64,
    m2: f64,
}

impl Aggregator for StdDev {
    fn ingest(&mut self, value: &Value) {
        let Value::Number(x) = value else {
            return;
        };
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    fn aggregate(&self) -> Value {
        if self.count < 2 {
            Value::String("NaN".to_string())
        } else {
            Value::Number((self.m2 / self.count as f64).sqrt())
        }
    }
}
