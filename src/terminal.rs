use ecalc::{display, EvalError, Evaluator};
use std::process::ExitCode;

/// Remove all whitespace; expressions are evaluated without it
pub(crate) fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Evaluate a single line and print its result
pub(crate) fn execute_line(eval: &Evaluator, input: &str) -> Result<f64, EvalError> {
    let expr = strip_whitespace(input);

    if eval.trace_mode() {
        eprintln!("Evaluating expression: {}", expr);
        eprintln!("{}", display::hex_dump(expr.as_bytes()));
    }

    let value = eval.evaluate(&expr, 0)?;
    println!("{}", display::format_result(value));
    Ok(value)
}

/// Print an evaluation error (and its hint, if any) to stderr
pub(crate) fn report_error(err: &EvalError) {
    if err.is_fatal() {
        eprintln!("Fatal: {}", err);
    } else {
        eprintln!("Error: {}", err);
    }
    if let Some(hint) = err.hint() {
        eprintln!("{}", hint);
    }
}

/// Exit status for a failed evaluation: 2 when fatal, 1 otherwise
pub(crate) fn exit_code_for(err: &EvalError) -> ExitCode {
    if err.is_fatal() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
