#[cfg(test)]
mod tests {
    use crate::eval::*;

    fn eval_str(input: &str) -> Result<f64, EvalError> {
        Evaluator::new().evaluate(input, 0)
    }

    fn nested(levels: usize, inner: &str) -> String {
        format!("{}{}{}", "(".repeat(levels), inner, ")".repeat(levels))
    }

    /// Deep nesting recurses once per level; give it room in debug builds.
    fn on_big_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
        std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(f)
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn eval_precedence() {
        assert_eq!(eval_str("2+3*4"), Ok(14.0));
        assert_eq!(eval_str("2^3*2"), Ok(16.0));
        assert_eq!(eval_str("(2+3)*4"), Ok(20.0));
        assert_eq!(eval_str("1+2*3^2"), Ok(19.0));
    }

    #[test]
    fn eval_left_associative() {
        assert_eq!(eval_str("8/2/2"), Ok(2.0));
        assert_eq!(eval_str("10-4-3"), Ok(3.0));
        assert_eq!(eval_str("2^3^2"), Ok(64.0));
    }

    #[test]
    fn eval_floating_modulus() {
        assert_eq!(eval_str("5%2"), Ok(1.0));
        assert_eq!(eval_str("5.5%2"), Ok(1.5));
        assert_eq!(eval_str("-7%3"), Ok(-1.0));
    }

    #[test]
    fn eval_functions_and_constants() {
        assert_eq!(eval_str("sin(0)"), Ok(0.0));
        assert_eq!(eval_str("cos(0)"), Ok(1.0));
        assert_eq!(eval_str("sqrt(16)"), Ok(4.0));
        assert!((eval_str("pi").unwrap() - 3.14159265358979).abs() < 1e-9);
        assert!((eval_str("e").unwrap() - std::f64::consts::E).abs() < 1e-12);
        assert_eq!(eval_str("sqrt(2+2)*3"), Ok(6.0));
        assert_eq!(eval_str("sqrt(sqrt(16))"), Ok(2.0));
    }

    #[test]
    fn eval_constant_followed_by_operator() {
        assert!((eval_str("pi-1").unwrap() - (std::f64::consts::PI - 1.0)).abs() < 1e-12);
        assert!((eval_str("2*pi").unwrap() - std::f64::consts::TAU).abs() < 1e-12);
        assert!((eval_str("e^2").unwrap() - std::f64::consts::E.powi(2)).abs() < 1e-12);
    }

    #[test]
    fn eval_base_detection() {
        assert_eq!(eval_str("0x10"), Ok(16.0));
        assert_eq!(eval_str("010"), Ok(8.0));
        assert_eq!(eval_str("010.5"), Ok(10.5));
        assert_eq!(eval_str("0x10+1"), Ok(17.0));
    }

    #[test]
    fn eval_negative_literals() {
        assert_eq!(eval_str("-5"), Ok(-5.0));
        assert_eq!(eval_str("2*-3"), Ok(-6.0));
        assert_eq!(eval_str("5-3"), Ok(2.0));
        assert_eq!(eval_str("5--3"), Ok(8.0));
        assert_eq!(eval_str("2.5-1"), Ok(1.5));
    }

    #[test]
    fn eval_minus_before_group_or_identifier() {
        // An unconverted sign yields a 0 token and binds the minus
        assert_eq!(eval_str("-(2)"), Ok(-2.0));
        assert!((eval_str("-pi").unwrap() + std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn eval_division_by_zero_is_not_an_error() {
        assert_eq!(eval_str("1/0"), Ok(f64::INFINITY));
        assert!(eval_str("0/0").unwrap().is_nan());
        assert!(eval_str("sqrt(-1)").unwrap().is_nan());
    }

    #[test]
    fn eval_unbalanced_parens() {
        assert_eq!(
            eval_str("(2+3"),
            Err(EvalError::UnbalancedParens { offset: 0 })
        );
        assert_eq!(
            eval_str("1+(2*(3)"),
            Err(EvalError::UnbalancedParens { offset: 2 })
        );
        assert_eq!(
            eval_str("sqrt(4"),
            Err(EvalError::UnbalancedParens { offset: 4 })
        );
    }

    #[test]
    fn eval_unknown_identifier() {
        let err = eval_str("foo").unwrap_err();
        assert_eq!(err, EvalError::UnknownIdentifier("foo".into()));
        assert_eq!(err.kind(), ErrorKind::UnknownIdentifier);
        assert!(!err.is_fatal());
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn eval_q_gets_a_hint() {
        let err = eval_str("q").unwrap_err();
        assert_eq!(err.hint(), Some("Perhaps you meant 'qq' or 'quit'?"));
    }

    #[test]
    fn eval_unsupported_function() {
        assert_eq!(
            eval_str("tan(1)"),
            Err(EvalError::UnsupportedFunction("tan".into()))
        );
        // The argument is evaluated first, so its error wins
        assert_eq!(
            eval_str("tan(foo)"),
            Err(EvalError::UnknownIdentifier("foo".into()))
        );
    }

    #[test]
    fn eval_syntax_errors() {
        let err = eval_str("2++").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(!err.is_fatal());

        assert_eq!(
            eval_str("5+"),
            Err(EvalError::DanglingOperator { operator: '+' })
        );
        assert_eq!(
            eval_str("*5"),
            Err(EvalError::EmptyTokenRun {
                found: '*',
                offset: 0
            })
        );
        assert_eq!(
            eval_str("2(3)"),
            Err(EvalError::MissingOperator {
                found: '(',
                offset: 1
            })
        );
        assert_eq!(
            eval_str("pi2"),
            Err(EvalError::ExpectedOperator {
                name: "pi".into(),
                found: '2'
            })
        );
        assert_eq!(eval_str("()"), Err(EvalError::EmptyExpression));
        assert_eq!(eval_str("sin()"), Err(EvalError::EmptyExpression));
        assert_eq!(eval_str(""), Err(EvalError::EmptyExpression));
    }

    #[test]
    fn eval_error_offsets_are_absolute() {
        assert_eq!(
            eval_str("1+(2+#)"),
            Err(EvalError::EmptyTokenRun {
                found: '#',
                offset: 5
            })
        );
    }

    #[test]
    fn eval_non_ascii_input() {
        let err = eval_str("2+é").unwrap_err();
        assert_eq!(
            err,
            EvalError::EmptyTokenRun {
                found: 'é',
                offset: 2
            }
        );
    }

    #[test]
    fn eval_capacity_exceeded() {
        let fifty = vec!["1"; 50].join("+");
        assert_eq!(eval_str(&fifty), Ok(50.0));

        let fifty_one = vec!["1"; 51].join("+");
        let err = eval_str(&fifty_one).unwrap_err();
        assert_eq!(err, EvalError::CapacityExceeded { limit: 50 });
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert!(!err.is_fatal());

        // The cap is per level
        let grouped = format!("({})+({})", fifty, fifty);
        assert_eq!(eval_str(&grouped), Ok(100.0));
    }

    #[test]
    fn eval_custom_limits() {
        let evaluator = Evaluator::with_limits(Limits {
            max_tokens: 2,
            ..Limits::default()
        });
        assert_eq!(evaluator.evaluate("1+2", 0), Ok(3.0));
        assert_eq!(
            evaluator.evaluate("1+2+3", 0),
            Err(EvalError::CapacityExceeded { limit: 2 })
        );
    }

    #[test]
    fn eval_runaway_loop_is_fatal() {
        let evaluator = Evaluator::with_limits(Limits {
            max_iterations: 2,
            ..Limits::default()
        });
        let err = evaluator.evaluate("1+2+3", 0).unwrap_err();
        assert_eq!(err, EvalError::RunawayLoop { limit: 2 });
        assert!(err.is_fatal());
    }

    #[test]
    fn eval_depth_ceiling() {
        let (ok, too_deep) = on_big_stack(|| {
            (
                eval_str(&nested(1000, "7")),
                eval_str(&nested(1001, "7")),
            )
        });
        assert_eq!(ok, Ok(7.0));
        let err = too_deep.unwrap_err();
        assert_eq!(err, EvalError::RecursionLimit { limit: 1000 });
        assert_eq!(err.kind(), ErrorKind::RecursionLimit);
        assert!(err.is_fatal());
    }

    #[test]
    fn eval_depth_counts_function_arguments() {
        let evaluator = Evaluator::with_limits(Limits {
            max_depth: 2,
            ..Limits::default()
        });
        assert_eq!(evaluator.evaluate("sqrt((16))", 0), Ok(4.0));
        assert_eq!(
            evaluator.evaluate("sqrt(((16)))", 0),
            Err(EvalError::RecursionLimit { limit: 2 })
        );
        assert_eq!(
            evaluator.evaluate("1", 3),
            Err(EvalError::RecursionLimit { limit: 2 })
        );
    }

    #[test]
    fn eval_is_repeatable() {
        let evaluator = Evaluator::new();
        let first = evaluator.evaluate("sqrt(2)*pi/3.7^1.3", 0).unwrap();
        assert!(evaluator.evaluate("(2+", 0).is_err());
        let second = evaluator.evaluate("sqrt(2)*pi/3.7^1.3", 0).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn eval_trace_mode_does_not_change_result() {
        let mut evaluator = Evaluator::new();
        evaluator.set_trace_mode(true);
        assert!(evaluator.trace_mode());
        assert_eq!(evaluator.evaluate("(1+2)*3", 0), Ok(9.0));
    }
}
