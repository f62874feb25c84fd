//! Built-in constants and functions
//!
//! The table is closed: names are matched directly and nothing can be
//! registered at runtime. Lookups return `Option` so that "not found" is
//! never confused with a constant whose value happens to be zero.

use std::f64::consts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub const ALL: [Constant; 2] = [Constant::Pi, Constant::E];

    pub fn from_name(name: &str) -> Option<Constant> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => consts::PI,
            Constant::E => consts::E,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Constant::Pi => "The ratio of a circle's circumference to its diameter",
            Constant::E => "Euler's number, base of the natural logarithm",
        }
    }
}

/// Single-argument functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Sqrt,
}

impl Function {
    pub const ALL: [Function; 3] = [Function::Sin, Function::Cos, Function::Sqrt];

    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "sqrt" => Some(Function::Sqrt),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Sqrt => "sqrt",
        }
    }

    /// Arguments are in radians; `sqrt` of a negative number is NaN
    pub fn apply(self, arg: f64) -> f64 {
        match self {
            Function::Sin => arg.sin(),
            Function::Cos => arg.cos(),
            Function::Sqrt => arg.sqrt(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Function::Sin => "Sine function",
            Function::Cos => "Cosine function",
            Function::Sqrt => "Square-root function",
        }
    }
}

/// Resolve a constant name to its value
pub fn lookup_constant(name: &str) -> Option<f64> {
    Constant::from_name(name).map(Constant::value)
}
