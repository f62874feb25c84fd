//! Random expression generator for stress testing
//!
//! Expressions are built from three parts: numbers, operators and
//! parenthesized subexpressions. Every operator sits between two operands,
//! so the output is always well formed; only its numeric result (which may
//! be `inf` or `NaN`) is left to chance.

use crate::lexer::Operator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smallest usable length cap; any single number fits below it
pub const MIN_MAX_LEN: usize = 8;

const MAX_ITEMS: usize = 21;
const FIT_RETRIES: usize = 10;
const MAX_NESTING: u32 = 1;
const NUMBER_MASK: i32 = 0xFFFF;

pub struct ExpressionGenerator {
    rng: StdRng,
}

impl ExpressionGenerator {
    /// Deterministic generator for reproducible runs
    pub fn new(seed: u64) -> Self {
        ExpressionGenerator {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        ExpressionGenerator {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Generate one expression strictly shorter than `max_len` bytes.
    ///
    /// `max_len` is raised to [`MIN_MAX_LEN`] if smaller.
    pub fn generate(&mut self, max_len: usize) -> String {
        let max_len = max_len.max(MIN_MAX_LEN);
        let mut expr = String::new();

        // Leave room for a subexpression only when there is some to spare
        let first = if max_len >= 2 * MIN_MAX_LEN && self.rng.random_bool(0.5) {
            self.fitting(&expr, max_len, 0, |g| g.subexpression(0))
        } else {
            None
        };
        let first = first.unwrap_or_else(|| self.number());
        expr.push_str(&first);

        for _ in 1..MAX_ITEMS {
            if max_len - expr.len() < 3 {
                break;
            }
            let op = self.operator();
            let item = self.fitting(&expr, max_len, 1, |g| g.operand(0));
            if let Some(item) = item {
                expr.push(op.symbol());
                expr.push_str(&item);
            }
        }

        expr
    }

    /// Try a few times for a part that keeps `expr` (plus `extra` bytes)
    /// under `max_len`.
    fn fitting(
        &mut self,
        expr: &str,
        max_len: usize,
        extra: usize,
        mut part: impl FnMut(&mut Self) -> String,
    ) -> Option<String> {
        (0..FIT_RETRIES)
            .map(|_| part(self))
            .find(|p| expr.len() + extra + p.len() < max_len)
    }

    /// A number, or a subexpression while nesting allows
    fn operand(&mut self, nesting: u32) -> String {
        if nesting <= MAX_NESTING && self.rng.random_bool(0.5) {
            self.subexpression(nesting)
        } else {
            self.number()
        }
    }

    /// `(` two or three operands `)`, starting with a number
    fn subexpression(&mut self, nesting: u32) -> String {
        let items = self.rng.random_range(2..=3);
        let mut out = String::from("(");
        out.push_str(&self.number());
        for _ in 1..items {
            out.push(self.operator().symbol());
            let item = if nesting < MAX_NESTING {
                self.operand(nesting + 1)
            } else {
                self.number()
            };
            out.push_str(&item);
        }
        out.push(')');
        out
    }

    /// A whole number (negative one time in three) or a fraction below
    /// one with three decimals
    fn number(&mut self) -> String {
        let value = self.rng.random_range(1..=NUMBER_MASK);
        if self.rng.random_ratio(1, 3) {
            let divisor = self.rng.random_range(1..=NUMBER_MASK);
            let mut whole = if value > divisor {
                value % divisor
            } else {
                divisor % value
            };
            if self.rng.random_ratio(1, 3) {
                whole = -whole;
            }
            whole.to_string()
        } else {
            format!("{:.3}", f64::from(value) / 65536.0)
        }
    }

    fn operator(&mut self) -> Operator {
        Operator::ALL[self.rng.random_range(0..Operator::ALL.len())]
    }
}
