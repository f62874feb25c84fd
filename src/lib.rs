//! ecalc - a shell-friendly arithmetic calculator
//!
//! # Overview
//!
//! ecalc evaluates infix arithmetic expressions over `f64`. It is meant to
//! be typed straight into a shell, so an expression must not contain
//! whitespace; the binary strips it before evaluating.
//!
//! # Expressions
//!
//! ```text
//! 2+3*4            # 14, precedence is ^ then * / % then + -
//! 8/2/2            # 2, left to right within a tier
//! 2^3^2            # 64, exponentiation too
//! 5.5%2            # 1.5, floating-point remainder
//! 0x10+010         # 24, hex and octal integer literals
//! sqrt(16)*pi      # built-in functions and constants
//! -(2)             # -2, a leading minus with nothing to convert reads as 0-
//! ```
//!
//! Groups and function arguments are evaluated recursively. Nesting depth,
//! tokens per level and scan iterations per level are capped by [`Limits`];
//! hitting the depth or iteration cap is a fatal error
//! ([`EvalError::is_fatal`]).
//!
//! # Example
//!
//! ```rust
//! use ecalc::{evaluate, EvalError, Evaluator};
//!
//! assert_eq!(evaluate("2+3*4"), Ok(14.0));
//! assert_eq!(evaluate("(2+3"), Err(EvalError::UnbalancedParens { offset: 0 }));
//!
//! let evaluator = Evaluator::new();
//! let result = evaluator.evaluate("sqrt(16)", 0).unwrap();
//! assert_eq!(ecalc::display::format_result(result), "Base 10: 4\nBase 16: 4");
//! ```

pub mod display;
pub mod eval;
pub mod generator;
pub mod lexer;
pub mod table;

// Re-export commonly used items
pub use eval::{ErrorKind, EvalError, Evaluator, Limits};
pub use generator::ExpressionGenerator;
pub use lexer::Operator;
pub use table::{Constant, Function};

/// Convenience function to evaluate an expression with default limits
pub fn evaluate(expr: &str) -> Result<f64, EvalError> {
    Evaluator::new().evaluate(expr, 0)
}
