use crate::diagnostic::Diagnostic;

#[derive(Debug, Clone, PartialEq)]
pub enum InterpreterError {
    UndefinedVariable { name: String },
    UndefinedFunction { name: String },
    ArityMismatch { name: String, expected: usize, found: usize },
    TypeError { message: String },
    DivisionByZero,
    InvalidOperation { message: String },
    Io { message: String },
}

impl InterpreterError {
    pub fn undefined_variable(name: impl Into<String>) -> Self {
        Self::UndefinedVariable { name: name.into() }
    }

    pub fn undefined_function(name: impl Into<String>) -> Self {
        Self::UndefinedFunction { name: name.into() }
    }

    pub fn arity_mismatch(name: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::ArityMismatch {
            name: name.into(),
            expected,
            found,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError { message: message.into() }
    }

    pub fn division_by_zero() -> Self {
        Self::DivisionByZero
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation { message: message.into() }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io { message: message.into() }
    }

    /// Convert to a diagnostic for pretty printing
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::UndefinedVariable { name } => Diagnostic::error(format!("undefined variable `{}`", name))
                .with_code("E0201")
                .with_help(format!("assign it first: `{} devote ...;`", name)),
            Self::UndefinedFunction { name } => Diagnostic::error(format!("decree `{}` is not defined", name))
                .with_code("E0202")
                .with_note("decrees are registered when their declaration runs"),
            Self::ArityMismatch { name, expected, found } => Diagnostic::error(format!(
                "decree `{}` expects {} argument{}, but received {}",
                name,
                expected,
                if *expected == 1 { "" } else { "s" },
                found
            ))
            .with_code("E0203"),
            Self::TypeError { message } => Diagnostic::error(format!("type error: {}", message)).with_code("E0204"),
            Self::DivisionByZero => Diagnostic::error("division by zero").with_code("E0205"),
            Self::InvalidOperation { message } => {
                Diagnostic::error(format!("invalid operation: {}", message)).with_code("E0206")
            }
            Self::Io { message } => Diagnostic::error(format!("input failed: {}", message)).with_code("E0207"),
        }
    }
}

impl std::fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpreterError::UndefinedVariable { name } => write!(f, "Variable '{}' is not defined", name),
            InterpreterError::UndefinedFunction { name } => write!(f, "Decree '{}' is not defined", name),
            InterpreterError::ArityMismatch { name, expected, found } => write!(
                f,
                "Decree '{}' expects {} arguments, but received {}",
                name, expected, found
            ),
            InterpreterError::TypeError { message } => write!(f, "Type error: {}", message),
            InterpreterError::DivisionByZero => write!(f, "Division by zero"),
            InterpreterError::InvalidOperation { message } => write!(f, "Invalid operation: {}", message),
            InterpreterError::Io { message } => write!(f, "Error while reading input: {}", message),
        }
    }
}

impl std::error::Error for InterpreterError {}

impl From<std::io::Error> for InterpreterError {
    fn from(err: std::io::Error) -> Self {
        InterpreterError::io(err.to_string())
    }
}
