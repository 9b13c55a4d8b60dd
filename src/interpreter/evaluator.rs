use super::builtins::{self, Army};
use super::console::Console;
use super::control_flow::{ControlFlow, Outcome};
use super::environment::{Frame, ScopeStack};
use super::error::InterpreterError;
use super::operators::{apply_binary, apply_unary};
use super::parser::parse;
use super::stack::guarded;
use crate::ast::{Block, Node};
use crate::diagnostic::Diagnostic;
use crate::value::Value;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::rc::Rc;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Nested decree calls allowed before the run is aborted.
    pub max_call_depth: usize,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Tree-walking evaluator. Owns the console and the random source; the scope
/// stack is handed in per run so a host can keep or discard it.
pub struct Interpreter<C: Console> {
    console: C,
    rng: Box<dyn RngCore>,
    options: InterpreterOptions,
    call_depth: usize,
}

impl<C: Console> Interpreter<C> {
    pub fn new(console: C) -> Self {
        Self {
            console,
            rng: Box::new(StdRng::from_entropy()),
            options: InterpreterOptions::default(),
            call_depth: 0,
        }
    }

    /// Makes `parias` and `conquistar` reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_options(mut self, options: InterpreterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Runs a whole program. A `yield` that escapes every call ends the run
    /// early and is reported as [`Outcome::TopLevelYield`], not as an error.
    pub fn run(&mut self, program: &Block, scopes: &mut ScopeStack) -> Result<Outcome, InterpreterError> {
        self.call_depth = 0;
        match self.execute_block(program, scopes)? {
            ControlFlow::Next(_) => Ok(Outcome::Completed),
            ControlFlow::Return(value) => Ok(Outcome::TopLevelYield(value)),
        }
    }

    fn execute_block(&mut self, block: &Block, scopes: &mut ScopeStack) -> Result<ControlFlow, InterpreterError> {
        for statement in &block.statements {
            if let ControlFlow::Return(value) = self.execute(statement, scopes)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::Next(Value::Void))
    }

    /// Runs one statement. Deep recursion moves onto a heap-allocated stack
    /// segment, so only `max_call_depth` bounds how far decrees can recurse.
    pub fn execute(&mut self, node: &Node, scopes: &mut ScopeStack) -> Result<ControlFlow, InterpreterError> {
        guarded(|| self.execute_node(node, scopes))
    }

    fn execute_node(&mut self, node: &Node, scopes: &mut ScopeStack) -> Result<ControlFlow, InterpreterError> {
        match node {
            Node::Assignment { name, value } => {
                let value = self.evaluate(value, scopes)?;
                scopes.assign(name.clone(), value);
                Ok(ControlFlow::Next(Value::Void))
            }
            Node::Print(args) => {
                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg, scopes))
                    .collect::<Result<Vec<_>, _>>()?;
                self.console.write_line(&builtins::print_line(&values))?;
                Ok(ControlFlow::Next(Value::Void))
            }
            Node::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, scopes)?.is_truthy() {
                    self.execute_block(then_branch, scopes)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch, scopes)
                } else {
                    Ok(ControlFlow::Next(Value::Void))
                }
            }
            Node::While { condition, body } => {
                while self.evaluate(condition, scopes)?.is_truthy() {
                    if let ControlFlow::Return(value) = self.execute_block(body, scopes)? {
                        return Ok(ControlFlow::Return(value));
                    }
                }
                Ok(ControlFlow::Next(Value::Void))
            }
            Node::For {
                init,
                condition,
                update,
                body,
            } => {
                self.execute(init, scopes)?;
                while self.evaluate(condition, scopes)?.is_truthy() {
                    if let ControlFlow::Return(value) = self.execute_block(body, scopes)? {
                        return Ok(ControlFlow::Return(value));
                    }
                    self.execute(update, scopes)?;
                }
                Ok(ControlFlow::Next(Value::Void))
            }
            Node::FunctionDef(def) => {
                scopes.define_global(def.name.clone(), Value::Function(def.clone()));
                Ok(ControlFlow::Next(Value::Void))
            }
            Node::Return(value) => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, scopes)?,
                    None => Value::Void,
                };
                Ok(ControlFlow::Return(value))
            }
            expr => self.evaluate(expr, scopes).map(ControlFlow::Next),
        }
    }

    pub fn evaluate(&mut self, node: &Node, scopes: &mut ScopeStack) -> Result<Value, InterpreterError> {
        guarded(|| self.evaluate_node(node, scopes))
    }

    fn evaluate_node(&mut self, node: &Node, scopes: &mut ScopeStack) -> Result<Value, InterpreterError> {
        match node {
            Node::Literal(value) => Ok(value.clone()),
            Node::Identifier(name) => scopes
                .lookup(name)
                .cloned()
                .ok_or_else(|| InterpreterError::undefined_variable(name.as_ref())),
            Node::Binary { left, op, right } => {
                let left = self.evaluate(left, scopes)?;
                let right = self.evaluate(right, scopes)?;
                apply_binary(*op, &left, &right)
            }
            Node::Unary { op, operand } => {
                let operand = self.evaluate(operand, scopes)?;
                apply_unary(*op, &operand)
            }
            Node::Call { name, args } => self.call(name, args, scopes),
            Node::Parias { name } => builtins::levy(name, scopes, &mut *self.rng, &mut self.console),
            Node::Inquire { prompt } => {
                let prompt = self.evaluate(prompt, scopes)?;
                builtins::inquire(&prompt, &mut self.console)
            }
            Node::Conquistar { town, army, defense } => {
                let town = self.evaluate(town, scopes)?;
                let army = self.muster(army, scopes)?;
                let defense = builtins::troops(&self.evaluate(defense, scopes)?, "defense")?;
                builtins::battle(&town, &army, defense, scopes, &mut *self.rng, &mut self.console)
            }
            statement => Err(InterpreterError::invalid_operation(format!(
                "{} does not produce a value",
                statement.label()
            ))),
        }
    }

    /// Resolves the army operand of `conquistar`. A bare identifier remembers
    /// the frame its binding lives in so losses can be written back there.
    fn muster(&mut self, army: &Node, scopes: &mut ScopeStack) -> Result<Army, InterpreterError> {
        match army {
            Node::Identifier(name) => {
                let frame = scopes
                    .find_frame(name)
                    .ok_or_else(|| InterpreterError::undefined_variable(name.as_ref()))?;
                let value = scopes
                    .frame(frame)
                    .and_then(|bindings| bindings.get(name.as_ref()))
                    .ok_or_else(|| InterpreterError::undefined_variable(name.as_ref()))?;
                Ok(Army {
                    strength: builtins::troops(value, "army")?,
                    origin: Some((name.clone(), frame)),
                })
            }
            expr => {
                let value = self.evaluate(expr, scopes)?;
                Ok(Army {
                    strength: builtins::troops(&value, "army")?,
                    origin: None,
                })
            }
        }
    }

    fn call(&mut self, name: &Rc<str>, args: &[Node], scopes: &mut ScopeStack) -> Result<Value, InterpreterError> {
        let def = scopes
            .lookup_function(name)
            .ok_or_else(|| InterpreterError::undefined_function(name.as_ref()))?;
        if args.len() != def.params.len() {
            return Err(InterpreterError::arity_mismatch(name.as_ref(), def.params.len(), args.len()));
        }

        // Arguments see the caller's frame only.
        let mut frame = Frame::with_capacity(args.len());
        for (param, arg) in def.params.iter().zip(args) {
            let value = self.evaluate(arg, scopes)?;
            frame.insert(param.clone(), value);
        }

        if self.call_depth >= self.options.max_call_depth {
            return Err(InterpreterError::invalid_operation(format!(
                "maximum call depth of {} exceeded in decree '{}'",
                self.options.max_call_depth, name
            )));
        }

        self.call_depth += 1;
        let result = scopes.with_frame(frame, |scopes| self.execute_block(&def.body, scopes));
        self.call_depth -= 1;

        match result? {
            ControlFlow::Next(_) => Ok(Value::Void),
            ControlFlow::Return(value) => Ok(value),
        }
    }
}

/// How a source run ended, for hosts that report instead of propagating.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    Completed,
    Yielded(Value),
    SyntaxError,
    RuntimeError,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, RunStatus::SyntaxError | RunStatus::RuntimeError)
    }
}

/// The warning issued when a `yield` escapes to the top level.
pub fn top_level_yield_warning(value: &Value) -> Diagnostic {
    Diagnostic::warning("yield outside of a decree")
        .with_code("W0301")
        .with_note(format!("yielded value: {}", value))
        .with_note("the rest of the program was not run")
}

/// Parses and runs `source`, flattening every failure into a message.
pub fn parse_and_run<C: Console>(
    source: &str,
    interpreter: &mut Interpreter<C>,
    scopes: &mut ScopeStack,
) -> Result<Outcome, String> {
    let parsed = parse(source);
    let program = match (parsed.program, parsed.error) {
        (Some(program), _) => program,
        (None, Some(err)) => return Err(err.to_string()),
        (None, None) => return Err("syntax error".to_string()),
    };
    interpreter
        .run(&program, scopes)
        .map_err(|e| format!("Runtime error: {}", e))
}

/// Parses and runs `source`, collecting diagnostics for all three error
/// tiers plus the top-level `yield` warning.
pub fn parse_and_run_with_diagnostics<C: Console>(
    source: &str,
    interpreter: &mut Interpreter<C>,
    scopes: &mut ScopeStack,
) -> RunReport {
    let parsed = parse(source);
    let mut diagnostics = parsed.diagnostics();

    let Some(program) = parsed.program else {
        return RunReport {
            status: RunStatus::SyntaxError,
            diagnostics,
        };
    };

    let status = match interpreter.run(&program, scopes) {
        Ok(Outcome::Completed) => RunStatus::Completed,
        Ok(Outcome::TopLevelYield(value)) => {
            diagnostics.push(top_level_yield_warning(&value));
            RunStatus::Yielded(value)
        }
        Err(err) => {
            diagnostics.push(err.to_diagnostic());
            RunStatus::RuntimeError
        }
    };

    RunReport { status, diagnostics }
}
