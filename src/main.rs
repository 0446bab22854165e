mod cli;

use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;

use bdc::Evaluator;
use clap::Parser;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = cli::Args::parse();
    args.warn_extra_argument();

    let mut evaluator = Evaluator::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let failures = match &args.file {
        Some(path) => {
            let source = match fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: cannot open '{}': {e}", path.display());
                    return ExitCode::from(1);
                }
            };
            evaluator.run(&source, &mut out)
        }
        None => run_stdin(&mut evaluator, &mut out),
    };

    ExitCode::from(failures.min(u8::MAX as usize) as u8)
}

/// Reads statements from stdin one line at a time, using `rustyline` for
/// history/editing when stdin is a TTY and a plain `BufRead` loop
/// otherwise (spec.md §6).
fn run_stdin(evaluator: &mut Evaluator, out: &mut dyn Write) -> usize {
    if io::stdin().is_terminal() {
        run_interactive(evaluator, out)
    } else {
        let mut failures = 0;
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            failures += evaluator.run(&format!("{line}\n"), out);
        }
        failures
    }
}

fn run_interactive(evaluator: &mut Evaluator, out: &mut dyn Write) -> usize {
    let mut rl = match rustyline::DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            tracing::warn!("rustyline init failed, falling back to plain stdin: {e}");
            return run_plain_stdin(evaluator, out);
        }
    };
    let mut failures = 0;
    loop {
        match rl.readline("bdc> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                failures += evaluator.run(&format!("{line}\n"), out);
            }
            Err(_) => break, // Ctrl-D / Ctrl-C / read error: end of session
        }
    }
    failures
}

fn run_plain_stdin(evaluator: &mut Evaluator, out: &mut dyn Write) -> usize {
    let mut failures = 0;
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        failures += evaluator.run(&format!("{line}\n"), out);
    }
    failures
}
