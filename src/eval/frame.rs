//! Token/operator sequence for one evaluation level
//!
//! `operators[i]` sits between `tokens[i]` and `tokens[i + 1]`. Reduction
//! folds adjacent pairs in place, one precedence phase at a time, until a
//! single token remains.

use super::EvalError;
use crate::lexer::Operator;
use std::fmt;

/// Precedence phases, applied in `ORDER`.
///
/// Within a phase operators fold left to right, so `2^3^2` is `(2^3)^2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Exponent,
    Multiplicative,
    Additive,
}

impl Phase {
    pub(crate) const ORDER: [Phase; 3] = [Phase::Exponent, Phase::Multiplicative, Phase::Additive];

    fn admits(self, op: Operator) -> bool {
        match self {
            Phase::Exponent => op == Operator::Pow,
            Phase::Multiplicative => matches!(op, Operator::Mul | Operator::Div | Operator::Rem),
            Phase::Additive => matches!(op, Operator::Add | Operator::Sub),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Frame {
    tokens: Vec<f64>,
    operators: Vec<Operator>,
}

impl Frame {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of tokens
    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn push_token(&mut self, value: f64) {
        self.tokens.push(value);
    }

    /// Bind `op` to the most recent token.
    pub(crate) fn bind_operator(&mut self, op: Operator) -> Result<(), EvalError> {
        if self.operators.len() >= self.tokens.len() {
            return Err(EvalError::OperatorWithoutOperand {
                operator: op.symbol(),
            });
        }
        self.operators.push(op);
        Ok(())
    }

    /// Reduce to a single value by precedence.
    pub(crate) fn reduce(mut self, trace: bool) -> Result<f64, EvalError> {
        if self.operators.len() >= self.tokens.len() {
            return Err(match self.operators.last() {
                Some(op) => EvalError::DanglingOperator {
                    operator: op.symbol(),
                },
                None => EvalError::EmptyExpression,
            });
        }

        for phase in Phase::ORDER {
            self.run_phase(phase, trace)?;
        }

        let result = self.tokens[0];
        if trace {
            eprintln!("\n\tFinal result: {:.10}\n", result);
        }
        Ok(result)
    }

    /// Fold every operator `phase` admits. The additive phase runs last, so
    /// anything it does not admit should already be gone.
    pub(crate) fn run_phase(&mut self, phase: Phase, trace: bool) -> Result<(), EvalError> {
        let mut i = 0;
        while i < self.operators.len() {
            let op = self.operators[i];
            if !phase.admits(op) {
                if phase == Phase::Additive {
                    return Err(EvalError::InvariantViolation {
                        operator: op.symbol(),
                    });
                }
                i += 1;
                continue;
            }

            let (lhs, rhs) = (self.tokens[i], self.tokens[i + 1]);
            if trace {
                eprintln!("{}", calc_line(phase, lhs, op, rhs));
            }
            self.tokens[i] = op.apply(lhs, rhs);
            self.tokens.remove(i + 1);
            self.operators.remove(i);
        }
        Ok(())
    }
}

/// Trace line for one fold; additive folds are indented one level deeper
fn calc_line(phase: Phase, lhs: f64, op: Operator, rhs: f64) -> String {
    let indent = if phase == Phase::Additive { "\t\t" } else { "\t" };
    format!("{}Calc: {:.6} {} {:.6}", indent, lhs, op.symbol(), rhs)
}

/// Rebuilds the equation, e.g. `1.000000 + 2.000000`
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if let Some(op) = i.checked_sub(1).and_then(|j| self.operators.get(j)) {
                write!(f, " {} ", op.symbol())?;
            }
            write!(f, "{:.6}", token)?;
        }
        Ok(())
    }
}
