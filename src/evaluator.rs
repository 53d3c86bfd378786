use crate::ast::{ArithOp, Expr, ScalarKind};
use crate::functions::FunctionRegistry;
use crate::value::{Datum, Value};

/// Errors that abort a running query.
///
/// Arithmetic and function-argument type mismatches are deliberately *not*
/// here: those are recovered locally by embedding a descriptive string value
/// in the output document, so a bad expression is visible per-document
/// instead of killing the whole pipeline.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// Call to a function the registry does not know
    UnknownFunction(String),

    /// Call with the wrong number of arguments
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Regex builtin given a pattern that does not compile
    InvalidRegex(String),

    /// Numeric literal that does not parse as a 64-bit float
    InvalidLiteral(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::UnknownFunction(name) => write!(f, "unknown function: '{}'", name),
            EvalError::WrongArity {
                name,
                expected,
                got,
            } => write!(
                f,
                "function '{}' expects {} argument(s), got {}",
                name, expected, got
            ),
            EvalError::InvalidRegex(msg) => write!(f, "invalid regex pattern: {}", msg),
            EvalError::InvalidLiteral(text) => write!(f, "invalid numeric literal: '{}'", text),
        }
    }
}

impl std::error::Error for EvalError {}

/// Render the embeddable type-mismatch description used by arithmetic and
/// function type validators.
pub fn type_error(expected: &str, got: &Value) -> String {
    format!(
        "[TYPE ERR: expected {}, got '{}' ({})]",
        expected,
        got.printable(),
        got.type_name()
    )
}

/// Reduces an AST expression plus a document to a concrete value.
///
/// Field references to absent fields resolve to [`Value::Missing`] rather
/// than erroring; callers decide what absence means for their check.
pub struct Evaluator<'a> {
    registry: &'a FunctionRegistry,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a FunctionRegistry) -> Self {
        Evaluator { registry }
    }

    /// Evaluates an expression against a single document.
    ///
    /// # Examples
    ///
    /// ```
    /// use breeze_lang::{Datum, Evaluator, Expr, FunctionRegistry, Value};
    ///
    /// let registry = FunctionRegistry::new();
    /// let evaluator = Evaluator::new(&registry);
    ///
    /// let mut datum = Datum::new();
    /// datum.insert("price".to_string(), serde_json::json!(9.5));
    ///
    /// let value = evaluator
    ///     .evaluate(&Expr::FieldRef("price".to_string()), &datum)
    ///     .unwrap();
    /// assert_eq!(value, Value::Number(9.5));
    /// ```
    pub fn evaluate(&self, expr: &Expr, datum: &Datum) -> Result<Value, EvalError> {
        match expr {
            Expr::Scalar { kind, literal } => self.eval_scalar(*kind, literal),
            Expr::FieldRef(field) => Ok(datum
                .get(field)
                .map(Value::from_json)
                .unwrap_or(Value::Missing)),
            Expr::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.evaluate(element, datum)?);
                }
                Ok(Value::Array(values))
            }
            Expr::Binary { op, left, right } => {
                let lhs = self.evaluate(left, datum)?;
                let rhs = self.evaluate(right, datum)?;
                Ok(self.eval_arithmetic(*op, lhs, rhs))
            }
            Expr::Function { name, args } => self.eval_function(name, args, datum),
        }
    }

    fn eval_scalar(&self, kind: ScalarKind, literal: &str) -> Result<Value, EvalError> {
        match kind {
            ScalarKind::String => Ok(Value::String(literal.to_string())),
            ScalarKind::Number => literal
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| EvalError::InvalidLiteral(literal.to_string())),
            ScalarKind::Bool => Ok(Value::Boolean(literal == "true")),
            ScalarKind::Null => Ok(Value::Null),
        }
    }

    // Both operands must already be numeric scalars; no coercion here. A
    // mismatch becomes an ordinary string value so map-stage failures stay
    // visible per document.
    fn eval_arithmetic(&self, op: ArithOp, lhs: Value, rhs: Value) -> Value {
        let (Value::Number(x), Value::Number(y)) = (&lhs, &rhs) else {
            let offender = if matches!(lhs, Value::Number(_)) {
                &rhs
            } else {
                &lhs
            };
            return Value::String(type_error("number", offender));
        };

        let result = match op {
            ArithOp::Add => x + y,
            ArithOp::Subtract => x - y,
            ArithOp::Multiply => x * y,
            ArithOp::Divide => x / y,
        };
        Value::Number(result)
    }

    fn eval_function(&self, name: &str, args: &[Expr], datum: &Datum) -> Result<Value, EvalError> {
        let function = self
            .registry
            .lookup(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;

        if args.len() != function.arity {
            return Err(EvalError::WrongArity {
                name: name.to_string(),
                expected: function.arity,
                got: args.len(),
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg, datum)?);
        }

        if let Err(mismatch) = function.check_types(&values) {
            return Ok(Value::String(mismatch));
        }
        function.check_values(&values)?;

        Ok(function.call(&values))
    }
}
