//! Input/output built-ins.

use super::super::console::Console;
use super::super::error::InterpreterError;
use crate::value::Value;

/// Joins already evaluated `print` arguments with no separator.
pub fn print_line(values: &[Value]) -> String {
    values.iter().map(|value| value.to_string()).collect()
}

/// Integer if the line reads as one, then float, otherwise the line as typed.
pub fn coerce_input(line: &str) -> Value {
    let trimmed = line.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        return Value::Float(n);
    }
    Value::string(line)
}

/// Shows `prompt` and blocks until the console yields a line.
pub fn inquire(prompt: &Value, console: &mut impl Console) -> Result<Value, InterpreterError> {
    console.prompt(&prompt.to_string())?;
    match console.read_line()? {
        Some(line) => Ok(coerce_input(&line)),
        None => Err(InterpreterError::io("end of input reached")),
    }
}
