//! Error types for expression parsing and evaluation.
//!
//! ## Error Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | X001 | Syntax error |
//! | X002 | Unknown identifier |
//! | X003 | Unknown function |
//! | X004 | Wrong number of arguments |
//! | X005 | Type mismatch |
//! | X006 | Division by zero |
//! | X007 | Math domain error |

use thiserror::Error;

/// Errors from parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// X001: The source text is not a valid expression.
    #[error("X001: syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// X002: Identifier is neither bound nor a constant.
    #[error("X002: unknown identifier '{name}'")]
    UnknownIdentifier { name: String },

    /// X003: Call to a function that is not a builtin.
    #[error("X003: unknown function '{name}'")]
    UnknownFunction { name: String },

    /// X004: Builtin called with the wrong number of arguments.
    #[error("X004: {function}() expects {expected} argument(s), got {got}")]
    Arity {
        function: String,
        expected: String,
        got: usize,
    },

    /// X005: Operand or argument has the wrong type.
    #[error("X005: type error: {message}")]
    Type { message: String },

    /// X006: Division or modulo by zero.
    #[error("X006: division by zero")]
    DivisionByZero,

    /// X007: Argument outside a function's domain.
    #[error("X007: {function}(): {message}")]
    Domain { function: String, message: String },
}

impl ExprError {
    /// Returns the error code (e.g., "X001").
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::Syntax { .. } => "X001",
            ExprError::UnknownIdentifier { .. } => "X002",
            ExprError::UnknownFunction { .. } => "X003",
            ExprError::Arity { .. } => "X004",
            ExprError::Type { .. } => "X005",
            ExprError::DivisionByZero => "X006",
            ExprError::Domain { .. } => "X007",
        }
    }

    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        ExprError::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        ExprError::Type {
            message: message.into(),
        }
    }
}
