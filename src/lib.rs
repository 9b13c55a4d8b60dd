pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod token;
pub mod value;

pub use ast::{Block, FunctionDef, Node};
pub use interpreter::{parse, Interpreter, ScopeStack};
pub use lexer::tokenize;
pub use token::{Token, TokenKind};
pub use value::Value;
