use crate::repl::{run_repl, ReplExit};
use crate::signals;
use crate::terminal::{execute_line, exit_code_for, report_error};
use ecalc::eval::DEFAULT_MAX_DEPTH;
use ecalc::{display, Evaluator, ExpressionGenerator, Limits};
use std::path::Path;
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length cap for `--gen` and `--stress` expressions
const GENERATED_MAX_LEN: usize = 80;

/// Parsed command-line arguments
#[derive(Debug, Default)]
pub(crate) struct CliArgs {
    pub(crate) debug: bool,
    pub(crate) constants: bool,
    pub(crate) interactive: bool,
    pub(crate) help: bool,
    pub(crate) version: bool,
    pub(crate) max_depth: Option<u32>,
    pub(crate) max_tokens: Option<usize>,
    pub(crate) generate: Option<usize>,
    pub(crate) stress: Option<usize>,
    pub(crate) seed: Option<u64>,
    /// Expression arguments, joined with no separator
    pub(crate) expression: String,
}

impl CliArgs {
    fn limits(&self) -> Limits {
        let defaults = Limits::default();
        Limits {
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            ..defaults
        }
    }

    fn generator(&self) -> ExpressionGenerator {
        match self.seed {
            Some(seed) => ExpressionGenerator::new(seed),
            None => ExpressionGenerator::from_entropy(),
        }
    }
}

/// Parse command-line arguments.
///
/// Flags are recognized up to the first expression argument (or `--`);
/// everything after that is expression text, so `ecalc 5 - -3` works.
pub(crate) fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut rest = Vec::new();

    let mut i = 1; // Skip program name
    while i < args.len() {
        if !rest.is_empty() {
            rest.push(args[i].as_str());
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-d" | "--debug" => cli.debug = true,
            "-c" | "--constants" => cli.constants = true,
            "-i" | "--interactive" => cli.interactive = true,
            "-h" | "--help" => cli.help = true,
            "-V" | "--version" => cli.version = true,
            "--max-depth" => {
                let depth: u32 = flag_value(args, &mut i)?;
                if depth > DEFAULT_MAX_DEPTH {
                    return Err(format!(
                        "--max-depth must be at most {}",
                        DEFAULT_MAX_DEPTH
                    ));
                }
                cli.max_depth = Some(depth);
            }
            "--max-tokens" => {
                let tokens: usize = flag_value(args, &mut i)?;
                if tokens == 0 {
                    return Err("--max-tokens must be at least 1".to_string());
                }
                cli.max_tokens = Some(tokens);
            }
            "--gen" => cli.generate = Some(flag_value(args, &mut i)?),
            "--stress" => cli.stress = Some(flag_value(args, &mut i)?),
            "--seed" => cli.seed = Some(flag_value(args, &mut i)?),
            "--" => {
                rest.extend(args[i + 1..].iter().map(String::as_str));
                break;
            }
            arg => rest.push(arg),
        }
        i += 1;
    }

    cli.expression = rest.concat();
    Ok(cli)
}

/// Read the value following the flag at `args[*i]` and advance past it
fn flag_value<T: std::str::FromStr>(args: &[String], i: &mut usize) -> Result<T, String> {
    let flag = &args[*i];
    *i += 1;
    let raw = args
        .get(*i)
        .ok_or_else(|| format!("{} requires a value", flag))?;
    raw.parse()
        .map_err(|_| format!("invalid value for {}: '{}'", flag, raw))
}

pub(crate) fn print_usage(argv0: &str) {
    let name = Path::new(argv0)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("ecalc");
    println!("Usage: {} [-c -d -i] [expression]", name);
    println!("This is a simplistic expression calculator that's very easy to use from the shell.");
    println!("It can take values in Base 10, 16, or 8. It has some built in constants and");
    println!("functions. Expression inputs are evaluated according to the order of");
    println!("operations: PE(MD)(AS).\n");
    println!("\t-d\tEnable debug output");
    println!("\t-c\tPrint supported constants & functions");
    println!("\t-i\tInput mode. Reads expression input from the terminal\n");
    println!("{}", display::format_operators());
}

pub(crate) fn print_help(argv0: &str) {
    print_usage(argv0);
    println!(
        r#"OPTIONS:
    -d, --debug             Trace evaluation on stderr
    -c, --constants         Print supported constants & functions
    -i, --interactive       Read expressions from the terminal
    --max-depth N           Nesting limit (at most {})
    --max-tokens N          Tokens allowed per nesting level
    --gen N                 Print N random expressions
    --stress N              Evaluate N random expressions and report failures
    --seed S                Seed for --gen and --stress
    -h, --help              Show this help message
    -V, --version           Show version

ENVIRONMENT:
    ECALC_HISTORY           History file for -i (default ~/.ecalc_history)"#,
        DEFAULT_MAX_DEPTH
    );
}

pub(crate) fn print_version() {
    println!("ecalc {}", VERSION);
}

/// Run whatever the parsed arguments ask for
pub(crate) fn run(cli: CliArgs, argv0: &str) -> ExitCode {
    if cli.help {
        print_help(argv0);
        return ExitCode::SUCCESS;
    }
    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    let mut evaluator = Evaluator::with_limits(cli.limits());
    evaluator.set_trace_mode(cli.debug);

    if cli.constants {
        print!("{}", display::format_constants());
    }

    if let Some(count) = cli.generate {
        let mut generator = cli.generator();
        for _ in 0..count {
            println!("{}", generator.generate(GENERATED_MAX_LEN));
        }
        return ExitCode::SUCCESS;
    }

    if let Some(count) = cli.stress {
        return run_stress(&evaluator, cli.generator(), count);
    }

    if cli.interactive {
        return match run_repl(&evaluator) {
            Ok(ReplExit::Quit) => ExitCode::SUCCESS,
            Ok(ReplExit::Fatal) => ExitCode::from(2),
            Err(e) => {
                eprintln!("REPL error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if cli.expression.is_empty() {
        return ExitCode::SUCCESS;
    }

    match execute_line(&evaluator, &cli.expression) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            exit_code_for(&e)
        }
    }
}

/// Evaluate `count` generated expressions, stopping early on Ctrl-C or on
/// the first fatal error
fn run_stress(evaluator: &Evaluator, mut generator: ExpressionGenerator, count: usize) -> ExitCode {
    if let Err(e) = signals::install_interrupt_handler() {
        eprintln!("Warning: Ctrl-C will not stop the run early: {}", e);
    }

    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut fatal = None;
    for _ in 0..count {
        if signals::interrupted() {
            eprintln!("Interrupted");
            break;
        }
        let expr = generator.generate(GENERATED_MAX_LEN);
        match evaluator.evaluate(&expr, 0) {
            Ok(_) => passed += 1,
            Err(e) => {
                failed += 1;
                eprintln!("{}", expr);
                report_error(&e);
                if e.is_fatal() {
                    fatal = Some(e);
                    break;
                }
            }
        }
    }

    println!(
        "Evaluated {} expressions: {} passed, {} failed",
        passed + failed,
        passed,
        failed
    );
    match fatal {
        Some(e) => exit_code_for(&e),
        None if failed == 0 => ExitCode::SUCCESS,
        None => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("ecalc")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_expression_args_are_joined() {
        let cli = parse_args(&args(&["2", "+", "3", "*", "4"])).unwrap();
        assert_eq!(cli.expression, "2+3*4");
        assert!(!cli.debug);
    }

    #[test]
    fn test_flags_before_expression() {
        let cli = parse_args(&args(&["-d", "-c", "1+1"])).unwrap();
        assert!(cli.debug);
        assert!(cli.constants);
        assert_eq!(cli.expression, "1+1");
    }

    #[test]
    fn test_negative_literal_is_expression() {
        let cli = parse_args(&args(&["-5+3"])).unwrap();
        assert_eq!(cli.expression, "-5+3");

        let cli = parse_args(&args(&["5", "-", "-d"])).unwrap();
        assert!(!cli.debug);
        assert_eq!(cli.expression, "5--d");

        let cli = parse_args(&args(&["--", "-i"])).unwrap();
        assert!(!cli.interactive);
        assert_eq!(cli.expression, "-i");
    }

    #[test]
    fn test_limit_flags() {
        let cli = parse_args(&args(&["--max-depth", "10", "--max-tokens", "5", "1"])).unwrap();
        let limits = cli.limits();
        assert_eq!(limits.max_depth, 10);
        assert_eq!(limits.max_tokens, 5);
        assert_eq!(limits.max_iterations, Limits::default().max_iterations);
    }

    #[test]
    fn test_bad_flag_values() {
        assert!(parse_args(&args(&["--max-depth"])).is_err());
        assert!(parse_args(&args(&["--max-depth", "lots"])).is_err());
        assert!(parse_args(&args(&["--max-depth", "5000"])).is_err());
        assert!(parse_args(&args(&["--max-tokens", "0"])).is_err());
        assert!(parse_args(&args(&["--gen", "-1"])).is_err());
    }

    #[test]
    fn test_gen_and_seed() {
        let cli = parse_args(&args(&["--gen", "3", "--seed", "42"])).unwrap();
        assert_eq!(cli.generate, Some(3));
        assert_eq!(cli.seed, Some(42));
        assert!(cli.expression.is_empty());
    }
}
