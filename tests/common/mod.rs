#![allow(dead_code)]

use decree::interpreter::{
    parse_and_run, parse_and_run_with_diagnostics, BufferConsole, Interpreter, InterpreterOptions, Outcome,
    RunReport, ScopeStack,
};

pub const SEED: u64 = 7;

pub fn interpreter_with_input(input: &[&str]) -> Interpreter<BufferConsole> {
    Interpreter::new(BufferConsole::with_input(input.iter().copied())).with_seed(SEED)
}

/// Runs `source` in a fresh global scope and returns the result with everything printed.
pub fn run(source: &str) -> (Result<Outcome, String>, String) {
    run_with_input(source, &[])
}

pub fn run_with_input(source: &str, input: &[&str]) -> (Result<Outcome, String>, String) {
    let mut interpreter = interpreter_with_input(input);
    let mut scopes = ScopeStack::new();
    let result = parse_and_run(source, &mut interpreter, &mut scopes);
    (result, interpreter.into_console().output)
}

/// Output of a program that is expected to run to completion.
pub fn output(source: &str) -> String {
    let (result, output) = run(source);
    assert_eq!(result, Ok(Outcome::Completed), "program failed, output so far: {:?}", output);
    output
}

pub fn output_with_input(source: &str, input: &[&str]) -> String {
    let (result, output) = run_with_input(source, input);
    assert_eq!(result, Ok(Outcome::Completed), "program failed, output so far: {:?}", output);
    output
}

/// Message of a program that is expected to fail.
pub fn error(source: &str) -> String {
    match run(source) {
        (Err(message), _) => message,
        (Ok(outcome), output) => panic!("expected an error, got {:?} with output {:?}", outcome, output),
    }
}

pub fn report(source: &str) -> (RunReport, String) {
    report_with_options(source, InterpreterOptions::default())
}

pub fn report_with_options(source: &str, options: InterpreterOptions) -> (RunReport, String) {
    let mut interpreter = interpreter_with_input(&[]).with_options(options);
    let mut scopes = ScopeStack::new();
    let report = parse_and_run_with_diagnostics(source, &mut interpreter, &mut scopes);
    (report, interpreter.into_console().output)
}
