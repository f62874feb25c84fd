//! Recursive evaluator for ecalc
//!
//! Each call to [`Evaluator::evaluate`] owns one [`Frame`]: it scans its
//! expression left to right, turning identifiers, parenthesized groups and
//! numeric literals into tokens and binding each following operator to the
//! token before it. Groups and function arguments are evaluated by a nested
//! call one level deeper on a borrowed slice of the same buffer. Once the
//! scan reaches the end, the frame is reduced by precedence to one value.
//!
//! Failures travel back up as `Err` through every enclosing call, so an
//! evaluation never leaves state behind for the next one.

mod frame;
#[cfg(test)]
mod tests;

use crate::lexer::{self, Lexeme};
use crate::table::{self, Function};
use frame::Frame;
use thiserror::Error;

pub const DEFAULT_MAX_DEPTH: u32 = 1000;
pub const DEFAULT_MAX_TOKENS: usize = 50;
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;

/// Hard caps enforced while evaluating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest nesting of groups/function arguments (top level is depth 0)
    pub max_depth: u32,
    /// Most tokens a single level may hold
    pub max_tokens: usize,
    /// Most scan iterations a single level may take
    pub max_iterations: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: DEFAULT_MAX_DEPTH,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Broad classes of evaluation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    UnknownIdentifier,
    CapacityExceeded,
    RunawayLoop,
    RecursionLimit,
    InvariantViolation,
}

/// Offsets are byte positions in the top-level expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Empty expression or subexpression")]
    EmptyExpression,
    #[error("No closing parenthesis for '(' at offset {offset}")]
    UnbalancedParens { offset: usize },
    #[error("Numeric constant followed by non-operator character '{found}' at offset {offset}")]
    MissingOperator { found: char, offset: usize },
    #[error("Function/variable '{name}' followed by an unrecognized operator: '{found}'")]
    ExpectedOperator { name: String, found: char },
    #[error("Found operator '{operator}', but no value before it")]
    OperatorWithoutOperand { operator: char },
    #[error("Operator '{operator}' at end of expression has no value after it")]
    DanglingOperator { operator: char },
    #[error("Invalid expression; no numeric value found at '{found}' (offset {offset})")]
    EmptyTokenRun { found: char, offset: usize },
    #[error("Unrecognized variable name: '{0}'")]
    UnknownIdentifier(String),
    #[error("Unsupported function: '{0}'")]
    UnsupportedFunction(String),
    #[error("Too many tokens in expression (limit {limit})")]
    CapacityExceeded { limit: usize },
    #[error("Runaway loop: scanning did not finish within {limit} iterations")]
    RunawayLoop { limit: u32 },
    #[error("Recursion depth exceeded {limit} levels")]
    RecursionLimit { limit: u32 },
    #[error("Found invalid operator '{operator}' in last phase of evaluation")]
    InvariantViolation { operator: char },
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::EmptyExpression
            | EvalError::UnbalancedParens { .. }
            | EvalError::MissingOperator { .. }
            | EvalError::ExpectedOperator { .. }
            | EvalError::OperatorWithoutOperand { .. }
            | EvalError::DanglingOperator { .. }
            | EvalError::EmptyTokenRun { .. } => ErrorKind::Syntax,
            EvalError::UnknownIdentifier(_) | EvalError::UnsupportedFunction(_) => {
                ErrorKind::UnknownIdentifier
            }
            EvalError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            EvalError::RunawayLoop { .. } => ErrorKind::RunawayLoop,
            EvalError::RecursionLimit { .. } => ErrorKind::RecursionLimit,
            EvalError::InvariantViolation { .. } => ErrorKind::InvariantViolation,
        }
    }

    /// Fatal errors mean a hard guard tripped; callers must not keep evaluating
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RunawayLoop | ErrorKind::RecursionLimit | ErrorKind::InvariantViolation
        )
    }

    /// Extra advice worth printing after the message
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            EvalError::UnknownIdentifier(name) if name == "q" => {
                Some("Perhaps you meant 'qq' or 'quit'?")
            }
            _ => None,
        }
    }
}

/// The recursive expression evaluator
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    limits: Limits,
    trace_mode: bool,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Evaluator {
            limits,
            trace_mode: false,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Enable or disable trace output on stderr
    pub fn set_trace_mode(&mut self, enabled: bool) {
        self.trace_mode = enabled;
    }

    pub fn trace_mode(&self) -> bool {
        self.trace_mode
    }

    /// Evaluate a whitespace-free expression at the given nesting depth.
    ///
    /// Top-level callers pass depth 0.
    pub fn evaluate(&self, expr: &str, depth: u32) -> Result<f64, EvalError> {
        self.eval_frame(expr, 0, depth)
    }

    /// Evaluate one level. `base` is the offset of `expr` in the top-level
    /// expression and only feeds error positions.
    fn eval_frame(&self, expr: &str, base: usize, depth: u32) -> Result<f64, EvalError> {
        if expr.is_empty() {
            return Err(EvalError::EmptyExpression);
        }
        if depth > self.limits.max_depth {
            return Err(EvalError::RecursionLimit {
                limit: self.limits.max_depth,
            });
        }

        let mut frame = Frame::new();
        let mut pos = 0;
        let mut iterations = 0u32;

        while pos < expr.len() {
            iterations += 1;
            if iterations > self.limits.max_iterations {
                return Err(EvalError::RunawayLoop {
                    limit: self.limits.max_iterations,
                });
            }
            if frame.len() >= self.limits.max_tokens {
                return Err(EvalError::CapacityExceeded {
                    limit: self.limits.max_tokens,
                });
            }

            let rest = &expr[pos..];
            match lexer::classify(rest) {
                Lexeme::Identifier => {
                    pos = self.scan_identifier(expr, pos, base, depth, &mut frame)?;
                }
                Lexeme::Group => {
                    let close = lexer::matching_paren(expr, pos).ok_or(
                        EvalError::UnbalancedParens {
                            offset: base + pos,
                        },
                    )?;
                    let value =
                        self.eval_frame(&expr[pos + 1..close], base + pos + 1, depth + 1)?;
                    frame.push_token(value);
                    pos = close + 1;
                }
                Lexeme::Number => {
                    let literal = lexer::scan_number(rest);
                    frame.push_token(literal.value);
                    pos += literal.len;
                }
                Lexeme::Unknown => {
                    return Err(EvalError::EmptyTokenRun {
                        found: first_char(rest),
                        offset: base + pos,
                    });
                }
            }

            // Whatever follows a token must be the operator bound to it
            if pos < expr.len() {
                let rest = &expr[pos..];
                let (_, op) = lexer::operator(rest).map_err(|_| EvalError::MissingOperator {
                    found: first_char(rest),
                    offset: base + pos,
                })?;
                frame.bind_operator(op)?;
                pos += 1;
            }
        }

        if self.trace_mode {
            eprintln!("evaluate({}):", expr);
            eprintln!("Recursion depth: {}\n", depth);
            eprintln!("\tEquation rebuilt from tokens/opers:\n\t\t{}\n", frame);
            eprintln!("\tnumTokens = {}\n", frame.len());
        }

        frame.reduce(self.trace_mode)
    }

    /// Resolve the identifier at `pos` (constant or function call), push its
    /// value and return the position just past it.
    fn scan_identifier(
        &self,
        expr: &str,
        mut pos: usize,
        base: usize,
        depth: u32,
        frame: &mut Frame,
    ) -> Result<usize, EvalError> {
        let rest = &expr[pos..];
        let Ok((after, name)) = lexer::identifier(rest) else {
            return Err(EvalError::EmptyTokenRun {
                found: first_char(rest),
                offset: base + pos,
            });
        };
        pos += name.len();

        let value = if after.starts_with('(') {
            let close = lexer::matching_paren(expr, pos).ok_or(EvalError::UnbalancedParens {
                offset: base + pos,
            })?;
            // The argument is evaluated before the name is checked
            let arg = self.eval_frame(&expr[pos + 1..close], base + pos + 1, depth + 1)?;
            pos = close + 1;
            let function = Function::from_name(name)
                .ok_or_else(|| EvalError::UnsupportedFunction(name.to_string()))?;
            function.apply(arg)
        } else {
            table::lookup_constant(name)
                .ok_or_else(|| EvalError::UnknownIdentifier(name.to_string()))?
        };
        frame.push_token(value);

        match expr[pos..].chars().next() {
            Some(c) if !lexer::is_operator_char(c) => Err(EvalError::ExpectedOperator {
                name: name.to_string(),
                found: c,
            }),
            _ => Ok(pos),
        }
    }
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or('\0')
}
