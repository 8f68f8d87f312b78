//! Builtin functions.
//!
//! Numeric builtins work on numbers and component-wise on `float4` values.

use crate::error::ExprError;
use crate::eval::Numeric;
use crate::value::Value;

/// Names of all builtin functions.
pub const FUNCTIONS: &[&str] = &[
    "abs", "clamp", "float3", "float4", "lerp", "max", "min", "pow", "round", "saturate", "sqrt",
];

/// Calls builtin `name` with already-evaluated arguments.
pub fn call(name: &str, args: &[Value]) -> Result<Value, ExprError> {
    match name {
        "min" => fold(name, args, f64::min),
        "max" => fold(name, args, f64::max),
        "abs" => {
            let [x] = exact::<1>(name, args)?;
            unary_numeric(name, x, f64::abs)
        }
        "sqrt" => {
            let [x] = exact::<1>(name, args)?;
            numeric(name, x)?
                .try_map(|v| {
                    if v < 0.0 {
                        Err(ExprError::Domain {
                            function: "sqrt".to_string(),
                            message: format!("square root of negative number {}", v),
                        })
                    } else {
                        Ok(v.sqrt())
                    }
                })
                .map(Numeric::into_value)
        }
        "saturate" => {
            let [x] = exact::<1>(name, args)?;
            unary_numeric(name, x, |v| v.clamp(0.0, 1.0))
        }
        "round" => round(args),
        "pow" => {
            let [base, exp] = exact::<2>(name, args)?;
            numeric(name, base)?
                .zip(numeric(name, exp)?, checked_pow)
                .map(Numeric::into_value)
        }
        "clamp" => {
            let [x, lo, hi] = exact::<3>(name, args)?;
            let lo = numeric(name, lo)?;
            let hi = numeric(name, hi)?;
            numeric(name, x)?
                .zip(lo, |v, l| Ok(v.max(l)))?
                .zip(hi, |v, h| Ok(v.min(h)))
                .map(Numeric::into_value)
        }
        "lerp" => {
            let [a, b, t] = exact::<3>(name, args)?;
            let b = numeric(name, b)?;
            let t = numeric(name, t)?;
            let delta = b.zip(numeric(name, a)?, |b, a| Ok(b - a))?;
            let scaled = delta.zip(t, |d, t| Ok(d * t))?;
            numeric(name, a)?
                .zip(scaled, |a, s| Ok(a + s))
                .map(Numeric::into_value)
        }
        "float4" => float4(args),
        "float3" => {
            let [r, g, b] = exact::<3>(name, args)?;
            Ok(Value::Color([
                scalar(name, r)?,
                scalar(name, g)?,
                scalar(name, b)?,
                1.0,
            ]))
        }
        _ => Err(ExprError::UnknownFunction {
            name: name.to_string(),
        }),
    }
}

/// `x ** y` with Python-like domain checks.
pub(crate) fn checked_pow(x: f64, y: f64) -> Result<f64, ExprError> {
    if x == 0.0 && y < 0.0 {
        return Err(ExprError::DivisionByZero);
    }
    let result = x.powf(y);
    if result.is_nan() && !x.is_nan() && !y.is_nan() {
        return Err(ExprError::Domain {
            function: "pow".to_string(),
            message: format!("{} ** {} has no real result", x, y),
        });
    }
    Ok(result)
}

fn exact<'a, const N: usize>(name: &str, args: &'a [Value]) -> Result<&'a [Value; N], ExprError> {
    args.try_into().map_err(|_| ExprError::Arity {
        function: name.to_string(),
        expected: N.to_string(),
        got: args.len(),
    })
}

fn numeric(name: &str, v: &Value) -> Result<Numeric, ExprError> {
    Numeric::from_value(v, name)
}

fn scalar(name: &str, v: &Value) -> Result<f64, ExprError> {
    v.as_number().ok_or_else(|| {
        ExprError::type_error(format!(
            "'{}' expects a number, got {}",
            name,
            v.type_name()
        ))
    })
}

fn unary_numeric(name: &str, v: &Value, f: impl Fn(f64) -> f64) -> Result<Value, ExprError> {
    numeric(name, v)?.map(f).map(Numeric::into_value)
}

fn fold(name: &str, args: &[Value], f: fn(f64, f64) -> f64) -> Result<Value, ExprError> {
    let (first, rest) = match args {
        [first, rest @ ..] if !rest.is_empty() => (first, rest),
        _ => {
            return Err(ExprError::Arity {
                function: name.to_string(),
                expected: "at least 2".to_string(),
                got: args.len(),
            })
        }
    };
    let mut acc = numeric(name, first)?;
    for v in rest {
        acc = acc.zip(numeric(name, v)?, |a, b| Ok(f(a, b)))?;
    }
    Ok(acc.into_value())
}

/// `round(x)` or `round(x, digits)`; ties round to even.
fn round(args: &[Value]) -> Result<Value, ExprError> {
    let (x, digits) = match args {
        [x] => (x, 0),
        [x, d] => (x, scalar("round", d)? as i32),
        _ => {
            return Err(ExprError::Arity {
                function: "round".to_string(),
                expected: "1 or 2".to_string(),
                got: args.len(),
            })
        }
    };
    numeric("round", x)?
        .map(|v| round_to(v, digits))
        .map(Numeric::into_value)
}

/// Rounds `v` to `digits` decimal places. Values that are already integral at
/// that scale come back unchanged.
fn round_to(v: f64, digits: i32) -> f64 {
    // 2^52: every f64 at or above this magnitude is an integer
    const INTEGRAL: f64 = 4_503_599_627_370_496.0;

    let scale = 10f64.powi(digits);
    if scale == 0.0 {
        return 0.0 * v;
    }
    let scaled = v * scale;
    if !scaled.is_finite() || scaled.abs() >= INTEGRAL {
        return v;
    }
    scaled.round_ties_even() / scale
}

/// `float4(r, g, b, a)`, `float4(x)` (broadcast), or `float4(rgb, a)`.
fn float4(args: &[Value]) -> Result<Value, ExprError> {
    match args {
        [Value::Color(c)] => Ok(Value::Color(*c)),
        [x] => {
            let v = scalar("float4", x)?;
            Ok(Value::Color([v; 4]))
        }
        [Value::Color(c), a] => Ok(Value::Color([c[0], c[1], c[2], scalar("float4", a)?])),
        [other, _] => Err(ExprError::type_error(format!(
            "float4(rgb, a) expects a float4 first argument, got {}",
            other.type_name()
        ))),
        [r, g, b, a] => Ok(Value::Color([
            scalar("float4", r)?,
            scalar("float4", g)?,
            scalar("float4", b)?,
            scalar("float4", a)?,
        ])),
        _ => Err(ExprError::Arity {
            function: "float4".to_string(),
            expected: "1, 2, or 4".to_string(),
            got: args.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{eval_str, Scope};

    fn eval(source: &str) -> Result<Value, ExprError> {
        eval_str(source, &Scope::new().with("c", [0.2, 0.4, 0.6, 1.0]))
    }

    #[test]
    fn test_min_max() {
        assert_eq!(eval("min(3, 1, 2)"), Ok(Value::Number(1.0)));
        assert_eq!(eval("max(3, 1, 2)"), Ok(Value::Number(3.0)));
        assert_eq!(eval("max(c, 0.5)"), Ok(Value::Color([0.5, 0.5, 0.6, 1.0])));
        assert_eq!(eval("min(1)").unwrap_err().code(), "X004");
    }

    #[test]
    fn test_clamp_and_saturate() {
        assert_eq!(eval("clamp(1.5, 0, 1)"), Ok(Value::Number(1.0)));
        assert_eq!(eval("clamp(-1, 0, 1)"), Ok(Value::Number(0.0)));
        assert_eq!(eval("saturate(-0.5)"), Ok(Value::Number(0.0)));
        assert_eq!(eval("clamp(1)").unwrap_err().code(), "X004");
    }

    #[test]
    fn test_round() {
        assert_eq!(eval("round(2.5)"), Ok(Value::Number(2.0)));
        assert_eq!(eval("round(3.5)"), Ok(Value::Number(4.0)));
        assert_eq!(eval("round(0.125, 2)"), Ok(Value::Number(0.12)));
        assert_eq!(eval("round(-1.4)"), Ok(Value::Number(-1.0)));
        assert_eq!(eval("round(1250, -2)"), Ok(Value::Number(1200.0)));
    }

    #[test]
    fn test_every_listed_function_dispatches() {
        for name in FUNCTIONS {
            let err = call(name, &[]).err();
            assert!(
                !matches!(err, Some(ExprError::UnknownFunction { .. })),
                "{} is listed but not callable",
                name
            );
        }
        assert_eq!(
            call("noise", &[]),
            Err(ExprError::UnknownFunction {
                name: "noise".to_string()
            })
        );
    }

    #[test]
    fn test_round_with_extreme_digit_counts() {
        assert_eq!(eval("round(0.5, 400)"), Ok(Value::Number(0.5)));
        assert_eq!(eval("round(0.5, 300)"), Ok(Value::Number(0.5)));
        assert_eq!(eval("round(1234.5, -400)"), Ok(Value::Number(0.0)));
        assert_eq!(eval("round(1e300, 20)"), Ok(Value::Number(1e300)));
    }

    #[test]
    fn test_pow_and_sqrt() {
        assert_eq!(eval("pow(2, 10)"), Ok(Value::Number(1024.0)));
        assert_eq!(eval("sqrt(16)"), Ok(Value::Number(4.0)));
        assert_eq!(eval("abs(-3)"), Ok(Value::Number(3.0)));
        assert_eq!(eval("sqrt(-1)").unwrap_err().code(), "X007");
        assert_eq!(eval("pow(-8, 0.5)").unwrap_err().code(), "X007");
        assert_eq!(eval("pow(0, -1)"), Err(ExprError::DivisionByZero));
    }

    #[test]
    fn test_lerp() {
        assert_eq!(eval("lerp(0, 10, 0.25)"), Ok(Value::Number(2.5)));
        assert_eq!(
            eval("lerp(float4(0), float4(1), 0.5)"),
            Ok(Value::Color([0.5; 4]))
        );
    }

    #[test]
    fn test_float4_forms() {
        assert_eq!(eval("float4(1, 0, 0, 1)"), Ok(Value::Color([1.0, 0.0, 0.0, 1.0])));
        assert_eq!(eval("float4(0.5)"), Ok(Value::Color([0.5; 4])));
        assert_eq!(eval("float4(c, 0.5)"), Ok(Value::Color([0.2, 0.4, 0.6, 0.5])));
        assert_eq!(eval("float3(1, 1, 0)"), Ok(Value::Color([1.0, 1.0, 0.0, 1.0])));
        assert_eq!(eval("float4(1, 2)").unwrap_err().code(), "X005");
        assert_eq!(eval("float4(1, 2, 3)").unwrap_err().code(), "X004");
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            eval("eval('1')"),
            Err(ExprError::UnknownFunction {
                name: "eval".to_string()
            })
        );
    }

    #[test]
    fn test_type_errors() {
        assert_eq!(eval("abs('x')").unwrap_err().code(), "X005");
        assert_eq!(eval("min(null, 1)").unwrap_err().code(), "X005");
    }
}
