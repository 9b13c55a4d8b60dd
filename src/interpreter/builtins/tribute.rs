//! `parias`: a random tax on a numeric variable.

use super::super::console::Console;
use super::super::environment::ScopeStack;
use super::super::error::InterpreterError;
use super::super::operators::{apply_binary, divide};
use super::narrate;
use crate::ast::BinaryOp;
use crate::value::Value;
use rand::Rng;
use std::rc::Rc;

/// Taxes `name` by a percentage drawn from 1..=100 and returns what is left.
///
/// The variable is read with the usual top-down search, but the result is
/// written into the topmost frame, like an assignment.
pub fn levy<R: Rng + ?Sized>(
    name: &Rc<str>,
    scopes: &mut ScopeStack,
    rng: &mut R,
    console: &mut impl Console,
) -> Result<Value, InterpreterError> {
    let old_value = scopes
        .lookup(name)
        .cloned()
        .ok_or_else(|| InterpreterError::undefined_variable(name.as_ref()))?;
    if !old_value.is_numeric() {
        return Err(InterpreterError::type_error(format!(
            "the variable for 'parias' must be numeric, found {}",
            old_value.type_name()
        )));
    }

    let tax: i64 = rng.gen_range(1..=100);
    narrate!(console, "Tax: '{}'%", tax);

    let kept = apply_binary(BinaryOp::Mul, &old_value, &Value::Int(100 - tax))?;
    let new_value = divide(&kept, &Value::Int(100))?;
    scopes.assign(name.clone(), new_value.clone());

    narrate!(console, "Input value: {}, final value: {}", old_value, new_value);
    Ok(new_value)
}
