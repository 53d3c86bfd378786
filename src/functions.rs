//! Named builtin functions callable from expressions.
//!
//! The registry is an explicit value constructed once and passed by
//! reference into the parser (which only checks that a called name exists)
//! and the evaluator (which runs the full validation chain). Keeping it a
//! value rather than ambient global state lets tests substitute alternate
//! registries.
//!
//! Each function runs three phases at evaluation time:
//!
//! 1. arity check - mismatch is a fatal [`EvalError`]
//! 2. type check - mismatch produces an embedded `[TYPE ERR: …]` string
//!    value instead of aborting, matching arithmetic behavior
//! 3. value check - semantic constraints (e.g. the regex pattern compiles);
//!    failure is fatal
//!
//! New builtins are added by registering a name with its validators and
//! evaluator; no other component changes.

use std::collections::HashMap;

use crate::evaluator::{EvalError, type_error};
use crate::value::Value;

type TypeCheckFn = fn(&[Value]) -> Result<(), String>;
type ValueCheckFn = fn(&[Value]) -> Result<(), EvalError>;
type EvalFn = fn(&[Value]) -> Value;

/// One registered builtin: expected argument count plus its validation and
/// evaluation passes.
pub struct Function {
    pub arity: usize,
    type_check: TypeCheckFn,
    value_check: ValueCheckFn,
    eval: EvalFn,
}

impl Function {
    pub fn new(
        arity: usize,
        type_check: TypeCheckFn,
        value_check: ValueCheckFn,
        eval: EvalFn,
    ) -> Self {
        Function {
            arity,
            type_check,
            value_check,
            eval,
        }
    }

    /// Type-checking pass; `Err` carries the embeddable mismatch text.
    pub fn check_types(&self, args: &[Value]) -> Result<(), String> {
        (self.type_check)(args)
    }

    /// Value-checking pass for semantic constraints; `Err` is fatal.
    pub fn check_values(&self, args: &[Value]) -> Result<(), EvalError> {
        (self.value_check)(args)
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.eval)(args)
    }
}

/// Lookup table of builtins, keyed by call name.
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Build a registry holding every builtin.
    pub fn new() -> Self {
        let mut registry = FunctionRegistry {
            functions: HashMap::new(),
        };

        registry.register(
            "pow",
            Function::new(2, check_two_numbers, no_value_check, eval_pow),
        );
        registry.register(
            "regex",
            Function::new(2, check_two_strings, check_pattern_compiles, eval_regex),
        );
        registry.register(
            "exists",
            Function::new(1, no_type_check, no_value_check, eval_exists),
        );
        registry.register(
            "notexists",
            Function::new(1, no_type_check, no_value_check, eval_notexists),
        );
        registry.register(
            "ping",
            Function::new(0, no_type_check, no_value_check, eval_ping),
        );

        registry
    }

    /// An empty registry, useful for tests exercising unknown-function
    /// handling.
    pub fn empty() -> Self {
        FunctionRegistry {
            functions: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, function: Function) {
        self.functions.insert(name.to_string(), function);
    }

    pub fn lookup(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }
}

fn no_type_check(_args: &[Value]) -> Result<(), String> {
    Ok(())
}

fn no_value_check(_args: &[Value]) -> Result<(), EvalError> {
    Ok(())
}

fn check_two_numbers(args: &[Value]) -> Result<(), String> {
    for arg in args {
        if !matches!(arg, Value::Number(_)) {
            return Err(type_error("number", arg));
        }
    }
    Ok(())
}

fn check_two_strings(args: &[Value]) -> Result<(), String> {
    for arg in args {
        if !matches!(arg, Value::String(_)) {
            return Err(type_error("string", arg));
        }
    }
    Ok(())
}

fn check_pattern_compiles(args: &[Value]) -> Result<(), EvalError> {
    if let Some(Value::String(pattern)) = args.first() {
        regex::Regex::new(pattern)
            .map(|_| ())
            .map_err(|e| EvalError::InvalidRegex(e.to_string()))
    } else {
        Ok(())
    }
}

/// `pow(base, exponent)` - base raised to exponent
fn eval_pow(args: &[Value]) -> Value {
    match (&args[0], &args[1]) {
        (Value::Number(base), Value::Number(exp)) => Value::Number(base.powf(*exp)),
        _ => Value::Null,
    }
}

/// `regex(pattern, value)` - whether the value matches the pattern
fn eval_regex(args: &[Value]) -> Value {
    match (&args[0], &args[1]) {
        (Value::String(pattern), Value::String(target)) => regex::Regex::new(pattern)
            .map(|re| Value::Boolean(re.is_match(target)))
            .unwrap_or(Value::Boolean(false)),
        _ => Value::Boolean(false),
    }
}

/// `exists(x)` - whether the argument resolved to a present field
fn eval_exists(args: &[Value]) -> Value {
    Value::Boolean(!matches!(args[0], Value::Missing))
}

/// `notexists(x)` - whether the argument resolved to an absent field
fn eval_notexists(args: &[Value]) -> Value {
    Value::Boolean(matches!(args[0], Value::Missing))
}

/// `ping()` - zero-argument diagnostic
fn eval_ping(_args: &[Value]) -> Value {
    Value::String("pong".to_string())
}
