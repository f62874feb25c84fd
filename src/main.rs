//! ecalc - a shell-friendly arithmetic calculator
//!
//! Usage:
//!   ecalc 2+3*4        Evaluate an expression and exit
//!   ecalc -c           List constants and functions
//!   ecalc -i           Read expressions from the terminal

mod cli;
mod repl;
mod signals;
mod terminal;

use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let argv0 = args.first().map(String::as_str).unwrap_or("ecalc");

    if args.len() <= 1 {
        cli::print_usage(argv0);
        return ExitCode::FAILURE;
    }

    match cli::parse_args(&args) {
        Ok(cli) => cli::run(cli, argv0),
        Err(e) => {
            eprintln!("ecalc: {}", e);
            ExitCode::FAILURE
        }
    }
}
