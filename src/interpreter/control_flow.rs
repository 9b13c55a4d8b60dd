use crate::value::Value;

/// How a statement finished. `Return` travels up until a decree call
/// boundary catches it.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Next(Value),
    Return(Value),
}

/// How a whole top-level run finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed,
    /// A `yield` escaped every call; the run stopped there.
    TopLevelYield(Value),
}
