use crate::terminal::{execute_line, report_error, strip_whitespace};
use ecalc::Evaluator;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, Result as RlResult};
use std::env;
use std::path::PathBuf;

const PROMPT: &str = "Enter expression> ";
const HISTORY_SIZE: usize = 500;

/// How an interactive session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplExit {
    /// `quit`, `qq` or Ctrl-D
    Quit,
    /// A fatal evaluation error
    Fatal,
}

pub(crate) fn dirs_home() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}

/// `$ECALC_HISTORY`, else `~/.ecalc_history`
pub(crate) fn history_path() -> Option<PathBuf> {
    env::var_os("ECALC_HISTORY")
        .map(PathBuf::from)
        .or_else(|| dirs_home().map(|h| h.join(".ecalc_history")))
}

fn is_quit(expr: &str) -> bool {
    expr == "quit" || expr == "qq"
}

/// Run the interactive loop
pub(crate) fn run_repl(eval: &Evaluator) -> RlResult<ReplExit> {
    let config = Config::builder()
        .max_history_size(HISTORY_SIZE)?
        .auto_add_history(false)
        .build();
    let mut rl = DefaultEditor::with_config(config)?;

    let history_path = history_path();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    println!("Running in input mode. Type 'quit' or 'qq' to exit");
    println!("You can use up/down arrow keys to navigate expression history.");
    println!("Ctrl-C will clear the current input.\n");

    let outcome = loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let expr = strip_whitespace(&line);
                if expr.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(expr.as_str());

                if is_quit(&expr) {
                    println!("Goodbye!");
                    break ReplExit::Quit;
                }

                if let Err(e) = execute_line(eval, &expr) {
                    report_error(&e);
                    if e.is_fatal() {
                        break ReplExit::Fatal;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C - the line is already discarded
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D - exit
                break ReplExit::Quit;
            }
            Err(err) => {
                if let Some(ref path) = history_path {
                    let _ = rl.save_history(path);
                }
                return Err(err);
            }
        }
    };

    // Save history
    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_words() {
        assert!(is_quit("quit"));
        assert!(is_quit("qq"));
        assert!(!is_quit("q"));
        assert!(!is_quit("quit2"));
    }
}
