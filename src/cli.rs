use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::interpreter::DEFAULT_MAX_CALL_DEPTH;

#[derive(Parser, Debug)]
#[command(name = "decree")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for the decree scripting language", long_about = None)]
pub struct Args {
    /// Program file to run. Without it (and without --eval) stdin is read,
    /// or an interactive session starts when stdin is a terminal.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[arg(short = 'e', long = "eval", value_name = "CODE", conflicts_with = "file")]
    pub eval: Option<String>,

    /// Start an interactive session even when stdin is not a terminal.
    #[arg(short = 'i', long = "interactive", conflicts_with_all = ["file", "eval"])]
    pub interactive: bool,

    /// Keep variables and decrees from one interactive entry to the next.
    #[arg(long = "persist")]
    pub persist: bool,

    /// Print the token stream and exit.
    #[arg(long = "tokens", group = "dump")]
    pub tokens: bool,

    /// Print the syntax tree and exit.
    #[arg(long = "ast", group = "dump")]
    pub ast: bool,

    /// Emit --tokens or --ast output as JSON.
    #[arg(long = "json", requires = "dump")]
    pub json: bool,

    /// Seed for parias and conquistar.
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,

    #[arg(long = "max-depth", value_name = "N", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    pub max_depth: usize,

    /// Copy all program output (and input typed at prompts) to this file.
    #[arg(long = "log", value_name = "FILE")]
    pub log: Option<PathBuf>,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a shell completion script.
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}
