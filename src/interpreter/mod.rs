pub mod parser;
pub mod environment;
pub mod error;
pub mod control_flow;
pub mod operators;
pub mod console;
pub mod builtins;
pub mod evaluator;
mod stack;

pub use error::InterpreterError;
pub use control_flow::{ControlFlow, Outcome};
pub use environment::{Frame, ScopeStack};
pub use console::{BufferConsole, Console, StdConsole};
pub use parser::{parse, ParseError, ParseErrorKind, ParseResult, TokenParser, MAX_NESTING_DEPTH};
pub use evaluator::{
    parse_and_run, parse_and_run_with_diagnostics, top_level_yield_warning, Interpreter, InterpreterOptions,
    RunReport, RunStatus, DEFAULT_MAX_CALL_DEPTH,
};
