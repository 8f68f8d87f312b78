//! Runtime values.

use std::fmt;

/// A value produced by evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Floating-point number.
    Number(f64),
    /// Boolean.
    Bool(bool),
    /// RGBA color (`float4`).
    Color([f64; 4]),
    /// Text, used for texture references.
    Text(String),
    /// Absence of a value (e.g. an unassigned texture).
    Null,
}

impl Value {
    /// Name of the value's type for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Color(_) => "float4",
            Value::Text(_) => "text",
            Value::Null => "null",
        }
    }

    /// Truth value used by `!`, `&&`, `||`, and conditionals.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::Color(c) => c.iter().any(|v| *v != 0.0),
            Value::Text(s) => !s.is_empty(),
            Value::Null => false,
        }
    }

    /// Numeric view: numbers as is, booleans as 1/0.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Color([r, g, b, a]) => write!(f, "float4({}, {}, {}, {})", r, g, b, a),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<[f64; 4]> for Value {
    fn from(c: [f64; 4]) -> Self {
        Value::Color(c)
    }
}

impl From<Option<String>> for Value {
    fn from(s: Option<String>) -> Self {
        s.map(Value::Text).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(Value::Number(0.5).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Text(String::new()).is_truthy());
        assert!(Value::Color([0.0, 0.0, 0.0, 1.0]).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Color([1.0, 0.5, 0.0, 1.0]).to_string(), "float4(1, 0.5, 0, 1)");
        assert_eq!(Value::Text("/Game/T".to_string()).to_string(), "\"/Game/T\"");
    }
}
