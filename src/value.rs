/// One JSON-like document being queried: an order-irrelevant mapping from
/// field name to JSON value.
pub type Datum = serde_json::Map<String, serde_json::Value>;

/// A runtime value produced by evaluating an expression against a document.
///
/// This is the concrete counterpart of an AST expression: scalars carry
/// typed values rather than literal text, and the extra [`Value::Missing`]
/// sentinel marks a field that was absent on the document (distinct from a
/// field holding JSON `null`).
///
/// All numbers are 64-bit floats; the language has no integer type at
/// runtime.
///
/// # Examples
///
/// ```
/// use breeze_lang::Value;
///
/// let number = Value::Number(42.0);
/// let string = Value::String("hello".to_string());
/// let array = Value::Array(vec![Value::Number(1.0), Value::Null]);
/// let absent = Value::Missing;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean
    Boolean(bool),

    /// JSON number (always double-precision)
    Number(f64),

    /// UTF-8 string
    String(String),

    /// Array of values
    Array(Vec<Value>),

    /// Sentinel for "field absent on this document"
    Missing,
}

impl Value {
    /// Convert a native JSON value into the runtime value model.
    ///
    /// Nested objects have no runtime counterpart and stringify to their
    /// compact JSON rendering.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(_) => Value::String(json.to_string()),
        }
    }

    /// Convert back to a native JSON value.
    ///
    /// `Missing` becomes JSON `null`, as do non-finite numbers (JSON cannot
    /// represent them).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Missing => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }

    /// Numeric coercion: numbers as-is, numeric-looking strings parsed,
    /// booleans as 0/1.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Textual coercion for lexical comparison: strings as-is, numbers and
    /// booleans rendered. Null, arrays, and missing values do not coerce.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(format_number(*n)),
            Value::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Boolean coercion: booleans only.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Human-readable type name, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Missing => "missing",
        }
    }

    /// Printable form for embedded type-error messages.
    pub fn printable(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(Value::printable).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Missing => "<missing>".to_string(),
        }
    }
}

/// Render a float the way the language displays numbers: integral values
/// without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
