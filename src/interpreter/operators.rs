//! Operator semantics shared by the evaluator and the built-ins.

use super::error::InterpreterError;
use crate::ast::{BinaryOp, UnaryOp};
use crate::value::Value;
use std::rc::Rc;

fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> InterpreterError {
    InterpreterError::type_error(format!(
        "operation '{}' is not valid between {} and {}",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}

fn overflow(op: &str) -> InterpreterError {
    InterpreterError::invalid_operation(format!("integer overflow in '{}'", op))
}

/// Applies a binary operator to two already evaluated operands.
pub fn apply_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, InterpreterError> {
    match op {
        BinaryOp::Add => arithmetic(op, left, right, i64::checked_add, |a, b| a + b),
        BinaryOp::Sub => arithmetic(op, left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(op, left, right, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => {
            if !left.is_numeric() || !right.is_numeric() {
                return Err(mismatch(op, left, right));
            }
            divide(left, right)
        }
        BinaryOp::Mod => floor_mod(left, right),
        BinaryOp::Concat => match (left, right) {
            (Value::Str(a), Value::Str(b)) => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(Value::Str(Rc::from(joined)))
            }
            _ => Err(InterpreterError::type_error(format!(
                "'unir' is only allowed between strings, found {} and {}",
                left.type_name(),
                right.type_name()
            ))),
        },
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        BinaryOp::Greater | BinaryOp::Less | BinaryOp::GreaterEq | BinaryOp::LessEq => {
            compare(op, left, right).map(Value::Bool)
        }
        // Both sides are already evaluated; these pick an operand, they do not coerce.
        BinaryOp::And => Ok(if left.is_truthy() { right.clone() } else { left.clone() }),
        BinaryOp::Or => Ok(if left.is_truthy() { left.clone() } else { right.clone() }),
    }
}

fn arithmetic(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, InterpreterError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b).map(Value::Int).ok_or_else(|| overflow(op.symbol())),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => Err(mismatch(op, left, right)),
        },
    }
}

/// True division: the quotient is always a float, even for two integers
/// that divide exactly. A zero divisor is an error, never inf or NaN.
pub fn divide(left: &Value, right: &Value) -> Result<Value, InterpreterError> {
    match (left.as_number(), right.as_number()) {
        (Some(_), Some(b)) if b == 0.0 => Err(InterpreterError::division_by_zero()),
        (Some(a), Some(b)) => Ok(Value::Float(a / b)),
        _ => Err(mismatch(BinaryOp::Div, left, right)),
    }
}

/// Floored modulo: a non-zero result takes the sign of the divisor.
pub fn floor_mod(left: &Value, right: &Value) -> Result<Value, InterpreterError> {
    match (left, right) {
        (_, Value::Int(0)) => Err(InterpreterError::division_by_zero()),
        (Value::Int(a), Value::Int(b)) => {
            // i64::MIN % -1 is the only case checked_rem refuses, and its remainder is 0.
            let rem = a.checked_rem(*b).unwrap_or(0);
            if rem != 0 && (rem < 0) != (*b < 0) {
                Ok(Value::Int(rem + b))
            } else {
                Ok(Value::Int(rem))
            }
        }
        _ => match (left.as_number(), right.as_number()) {
            (Some(_), Some(b)) if b == 0.0 => Err(InterpreterError::division_by_zero()),
            (Some(a), Some(b)) => {
                let rem = a % b;
                if rem != 0.0 && (rem < 0.0) != (b < 0.0) {
                    Ok(Value::Float(rem + b))
                } else {
                    Ok(Value::Float(rem))
                }
            }
            _ => Err(mismatch(BinaryOp::Mod, left, right)),
        },
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, InterpreterError> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return Err(mismatch(op, left, right)),
        },
    };
    // NaN is unordered: every ordering test on it is false.
    let Some(ordering) = ordering else {
        return Ok(false);
    };
    Ok(match op {
        BinaryOp::Greater => ordering.is_gt(),
        BinaryOp::Less => ordering.is_lt(),
        BinaryOp::GreaterEq => ordering.is_ge(),
        BinaryOp::LessEq => ordering.is_le(),
        _ => return Err(mismatch(op, left, right)),
    })
}

pub fn apply_unary(op: UnaryOp, operand: &Value) -> Result<Value, InterpreterError> {
    match (op, operand) {
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
        (UnaryOp::Neg, Value::Int(n)) => n.checked_neg().map(Value::Int).ok_or_else(|| overflow("menos")),
        (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Neg, value) => Err(InterpreterError::type_error(format!(
            "unary operator 'menos' is not valid for {}",
            value.type_name()
        ))),
    }
}
