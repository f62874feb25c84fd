//! Common test utilities for ecalc integration tests

#[allow(unused_imports)]
pub use ecalc::{display, ErrorKind, EvalError, Evaluator, Limits};

/// Helper to evaluate an expression and return its value or error message
#[allow(dead_code)]
pub fn eval(input: &str) -> Result<f64, String> {
    Evaluator::new().evaluate(input, 0).map_err(|e| e.to_string())
}

/// Helper to evaluate and return the error kind
#[allow(dead_code)]
pub fn eval_error_kind(input: &str) -> Option<ErrorKind> {
    Evaluator::new().evaluate(input, 0).err().map(|e| e.kind())
}

/// Helper to evaluate and render the result the way the binary prints it
#[allow(dead_code)]
pub fn eval_display(input: &str) -> Result<String, String> {
    eval(input).map(display::format_result)
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but got {}",
        expected,
        actual
    );
}
