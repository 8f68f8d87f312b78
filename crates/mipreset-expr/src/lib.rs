//! Sandboxed Expression Language
//!
//! Expressions compute new material parameter values from old ones during
//! migration. The language is deliberately small: numbers, booleans, text,
//! `float4` colors, arithmetic, comparisons, logic, conditionals, and a fixed
//! set of builtin functions. Evaluation only sees the names bound in a
//! [`Scope`]; there is no access to the host, files, or the environment.
//!
//! # Example
//!
//! ```
//! use mipreset_expr::{eval_str, Scope, Value};
//!
//! let scope = Scope::new()
//!     .with("BaseColor", [0.5, 0.25, 1.0, 1.0])
//!     .with("IsMetal", true);
//!
//! assert_eq!(
//!     eval_str("IsMetal ? BaseColor * 2 : BaseColor", &scope),
//!     Ok(Value::Color([1.0, 0.5, 2.0, 2.0]))
//! );
//! assert_eq!(eval_str("saturate(BaseColor.b * 2)", &scope), Ok(Value::Number(1.0)));
//! ```
//!
//! # Modules
//!
//! - [`ast`]: Syntax tree
//! - [`builtins`]: Builtin functions
//! - [`error`]: Error type and codes
//! - [`eval`]: Evaluator and variable scope
//! - [`lexer`]: Tokenizer
//! - [`parser`]: Recursive-descent parser
//! - [`value`]: Runtime values

pub mod ast;
pub mod builtins;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::Expr;
pub use builtins::FUNCTIONS;
pub use error::ExprError;
pub use eval::{eval_str, evaluate, Scope};
pub use parser::parse;
pub use value::Value;
