use crate::cli::{Args, ColorChoice};
use crate::interpreter::InterpreterOptions;
use std::path::PathBuf;

/// Which diagnostic dump, if any, replaces running the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dump {
    Tokens,
    Ast,
}

pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    pub persist: bool,
    pub interactive: bool,
    pub seed: Option<u64>,
    pub max_call_depth: usize,
    pub log: Option<PathBuf>,
    pub dump: Option<Dump>,
    pub json: bool,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        let dump = if args.tokens {
            Some(Dump::Tokens)
        } else if args.ast {
            Some(Dump::Ast)
        } else {
            None
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
            persist: args.persist,
            interactive: args.interactive,
            seed: args.seed,
            max_call_depth: args.max_depth,
            log: args.log.clone(),
            dump,
            json: args.json,
        }
    }

    pub fn interpreter_options(&self) -> InterpreterOptions {
        InterpreterOptions {
            max_call_depth: self.max_call_depth,
        }
    }
}
