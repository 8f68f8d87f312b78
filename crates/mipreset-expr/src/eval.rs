//! Tree-walking evaluator over a fixed symbol table.

use std::collections::BTreeMap;

use crate::ast::{BinaryOp, CompareOp, Expr, LogicalOp, UnaryOp};
use crate::builtins;
use crate::error::ExprError;
use crate::parser::parse;
use crate::value::Value;

/// Variables visible to an expression.
///
/// Only bound names resolve; there are no globals besides the builtin
/// functions and the literals `true`, `false`, and `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    vars: BTreeMap<String, Value>,
}

impl Scope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any earlier binding.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Builder-style [`Scope::bind`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(name, value);
        self
    }

    /// Looks up a bound name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

/// Parses and evaluates `source` in `scope`.
///
/// # Example
/// ```
/// use mipreset_expr::{eval_str, Scope, Value};
///
/// let scope = Scope::new().with("r", 0.8);
/// assert_eq!(eval_str("clamp(r * 1.5, 0, 1)", &scope), Ok(Value::Number(1.0)));
/// ```
pub fn eval_str(source: &str, scope: &Scope) -> Result<Value, ExprError> {
    let expr = parse(source)?;
    evaluate(&expr, scope)
}

/// Evaluates a parsed expression in `scope`.
pub fn evaluate(expr: &Expr, scope: &Scope) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Ident(name) => scope
            .get(name)
            .cloned()
            .ok_or_else(|| ExprError::UnknownIdentifier { name: name.clone() }),
        Expr::Unary { op, operand } => {
            let v = evaluate(operand, scope)?;
            unary(*op, v)
        }
        Expr::Binary { op, left, right } => {
            let l = evaluate(left, scope)?;
            let r = evaluate(right, scope)?;
            arithmetic(*op, l, r)
        }
        Expr::Logical { op, left, right } => {
            let l = evaluate(left, scope)?;
            let decided = match op {
                LogicalOp::And => !l.is_truthy(),
                LogicalOp::Or => l.is_truthy(),
            };
            if decided {
                Ok(l)
            } else {
                evaluate(right, scope)
            }
        }
        Expr::Compare { first, rest } => {
            let mut left = evaluate(first, scope)?;
            for (op, right) in rest {
                let right = evaluate(right, scope)?;
                if !compare(*op, &left, &right)? {
                    return Ok(Value::Bool(false));
                }
                left = right;
            }
            Ok(Value::Bool(true))
        }
        Expr::Conditional {
            cond,
            then_branch,
            else_branch,
        } => {
            if evaluate(cond, scope)?.is_truthy() {
                evaluate(then_branch, scope)
            } else {
                evaluate(else_branch, scope)
            }
        }
        Expr::Call { function, args } => {
            let values = args
                .iter()
                .map(|a| evaluate(a, scope))
                .collect::<Result<Vec<_>, _>>()?;
            builtins::call(function, &values)
        }
        Expr::Member { expr, field } => {
            let v = evaluate(expr, scope)?;
            member(&v, field)
        }
    }
}

fn unary(op: UnaryOp, v: Value) -> Result<Value, ExprError> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!v.is_truthy())),
        UnaryOp::Neg => Numeric::from_value(&v, "-")?.map(|x| -x).map(Numeric::into_value),
        UnaryOp::Plus => Numeric::from_value(&v, "+").map(Numeric::into_value),
    }
}

fn arithmetic(op: BinaryOp, l: Value, r: Value) -> Result<Value, ExprError> {
    if let (BinaryOp::Add, Value::Text(a), Value::Text(b)) = (op, &l, &r) {
        return Ok(Value::Text(format!("{}{}", a, b)));
    }

    let symbol = match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Rem => "%",
        BinaryOp::Pow => "**",
    };
    let a = Numeric::from_value(&l, symbol)?;
    let b = Numeric::from_value(&r, symbol)?;

    let result = match op {
        BinaryOp::Add => a.zip(b, |x, y| Ok(x + y))?,
        BinaryOp::Sub => a.zip(b, |x, y| Ok(x - y))?,
        BinaryOp::Mul => a.zip(b, |x, y| Ok(x * y))?,
        BinaryOp::Div => a.zip(b, |x, y| {
            if y == 0.0 {
                Err(ExprError::DivisionByZero)
            } else {
                Ok(x / y)
            }
        })?,
        BinaryOp::Rem => a.zip(b, |x, y| {
            if y == 0.0 {
                Err(ExprError::DivisionByZero)
            } else {
                // sign follows the divisor
                Ok(x - y * (x / y).floor())
            }
        })?,
        BinaryOp::Pow => a.zip(b, builtins::checked_pow)?,
    };
    Ok(result.into_value())
}

fn compare(op: CompareOp, l: &Value, r: &Value) -> Result<bool, ExprError> {
    match op {
        CompareOp::Eq => Ok(values_equal(l, r)),
        CompareOp::Ne => Ok(!values_equal(l, r)),
        _ => {
            let ordering = match (l, r) {
                (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
                _ => match (l.as_number(), r.as_number()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => {
                        return Err(ExprError::type_error(format!(
                            "cannot order {} and {}",
                            l.type_name(),
                            r.type_name()
                        )))
                    }
                },
            };
            let Some(ordering) = ordering else {
                return Ok(false);
            };
            Ok(match op {
                CompareOp::Lt => ordering.is_lt(),
                CompareOp::Le => ordering.is_le(),
                CompareOp::Gt => ordering.is_gt(),
                CompareOp::Ge => ordering.is_ge(),
                CompareOp::Eq => ordering.is_eq(),
                CompareOp::Ne => ordering.is_ne(),
            })
        }
    }
}

fn values_equal(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Color(a), Value::Color(b)) => a == b,
        (Value::Null, Value::Null) => true,
        _ => match (l.as_number(), r.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn member(v: &Value, field: &str) -> Result<Value, ExprError> {
    let Value::Color(c) = v else {
        return Err(ExprError::type_error(format!(
            "cannot access '.{}' on {}",
            field,
            v.type_name()
        )));
    };
    let index = match field {
        "r" | "x" => 0,
        "g" | "y" => 1,
        "b" | "z" => 2,
        "a" | "w" => 3,
        _ => {
            return Err(ExprError::type_error(format!(
                "float4 has no component '{}'",
                field
            )))
        }
    };
    Ok(Value::Number(c[index]))
}

/// Numeric operand: a number or a four-component color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Numeric {
    Scalar(f64),
    Vec4([f64; 4]),
}

impl Numeric {
    pub(crate) fn from_value(v: &Value, context: &str) -> Result<Self, ExprError> {
        match v {
            Value::Color(c) => Ok(Numeric::Vec4(*c)),
            other => other.as_number().map(Numeric::Scalar).ok_or_else(|| {
                ExprError::type_error(format!(
                    "'{}' expects a number or float4, got {}",
                    context,
                    other.type_name()
                ))
            }),
        }
    }

    pub(crate) fn into_value(self) -> Value {
        match self {
            Numeric::Scalar(x) => Value::Number(x),
            Numeric::Vec4(c) => Value::Color(c),
        }
    }

    fn lanes(self) -> [f64; 4] {
        match self {
            Numeric::Scalar(x) => [x; 4],
            Numeric::Vec4(c) => c,
        }
    }

    /// Applies `f` to every component.
    pub(crate) fn map(self, f: impl Fn(f64) -> f64) -> Result<Self, ExprError> {
        self.try_map(|x| Ok(f(x)))
    }

    /// Applies a fallible `f` to every component.
    pub(crate) fn try_map(
        self,
        f: impl Fn(f64) -> Result<f64, ExprError>,
    ) -> Result<Self, ExprError> {
        Ok(match self {
            Numeric::Scalar(x) => Numeric::Scalar(f(x)?),
            Numeric::Vec4(c) => Numeric::Vec4([f(c[0])?, f(c[1])?, f(c[2])?, f(c[3])?]),
        })
    }

    /// Combines component-wise, broadcasting a scalar against a color.
    pub(crate) fn zip(
        self,
        other: Numeric,
        f: impl Fn(f64, f64) -> Result<f64, ExprError>,
    ) -> Result<Self, ExprError> {
        if let (Numeric::Scalar(a), Numeric::Scalar(b)) = (self, other) {
            return Ok(Numeric::Scalar(f(a, b)?));
        }
        let a = self.lanes();
        let b = other.lanes();
        Ok(Numeric::Vec4([
            f(a[0], b[0])?,
            f(a[1], b[1])?,
            f(a[2], b[2])?,
            f(a[3], b[3])?,
        ]))
    }
}
