//! `conquistar`: an army against a town's defense.

use super::super::console::Console;
use super::super::environment::ScopeStack;
use super::super::error::InterpreterError;
use super::narrate;
use crate::value::Value;
use rand::Rng;
use std::rc::Rc;

/// The attacking army. When it came from a variable, `origin` names that
/// variable and the frame it was found in, and losses are written back there.
#[derive(Debug, Clone, PartialEq)]
pub struct Army {
    pub strength: i64,
    pub origin: Option<(Rc<str>, usize)>,
}

/// Integer operand check shared by the army and the defense.
pub fn troops(value: &Value, role: &str) -> Result<i64, InterpreterError> {
    value.as_int().ok_or_else(|| {
        InterpreterError::type_error(format!("the {} must be an integer, found {}", role, value.type_name()))
    })
}

/// Soldiers lost against `defense`: 30% of it, truncated, never more than the army has.
pub fn losses(army: i64, defense: i64) -> i64 {
    ((defense as f64 * 0.3) as i64).min(army)
}

/// Fights the battle and returns whether the town fell.
pub fn battle<R: Rng + ?Sized>(
    town: &Value,
    army: &Army,
    defense: i64,
    scopes: &mut ScopeStack,
    rng: &mut R,
    console: &mut impl Console,
) -> Result<Value, InterpreterError> {
    narrate!(
        console,
        "Town '{}' has defense {}. Available army: {}",
        town,
        defense,
        army.strength
    );

    if army.strength > defense {
        narrate!(console, "'{}' has been conquered!", town);
        return Ok(Value::Bool(true));
    }

    let lucky = if army.strength == defense {
        narrate!(console, "Evenly matched! Fate will decide...");
        if rng.gen::<f64>() < 0.5 {
            narrate!(console, "'{}' has been conquered in a close battle!", town);
            return Ok(Value::Bool(true));
        }
        true
    } else {
        false
    };

    let lost = losses(army.strength, defense);
    let remaining = army.strength - lost;
    if let Some((name, frame)) = &army.origin {
        scopes.set_in_frame(*frame, name.clone(), Value::Int(remaining));
    }

    narrate!(
        console,
        "'{}' resisted the attack{}. The army lost {} soldier(s) and now has {}.",
        town,
        if lucky { " by luck" } else { "" },
        lost,
        remaining
    );
    Ok(Value::Bool(false))
}
